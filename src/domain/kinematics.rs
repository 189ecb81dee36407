// Closed-form kinematics for a point mass under constant gravity.
// No integration: evaluating twice at the same `t` gives identical values,
// which lets the driver and the readouts recompute state independently.

use crate::domain::state::{KinematicState, LaunchParams};

/// Vertical acceleration, m/s^2. Simulation y grows upward, so it is negative.
pub const GRAVITY_MPS2: f64 = -9.8;

/// Horizontal position after `t` seconds of constant-velocity travel.
pub fn horizontal_position(x0: f64, vx: f64, t: f64) -> f64 {
    x0 + vx * t
}

/// Vertical position after `t` seconds under gravity.
pub fn vertical_position(y0: f64, vy0: f64, t: f64) -> f64 {
    y0 + vy0 * t + 0.5 * GRAVITY_MPS2 * t * t
}

/// Vertical velocity after `t` seconds under gravity.
pub fn vertical_velocity(vy0: f64, t: f64) -> f64 {
    vy0 + GRAVITY_MPS2 * t
}

/// Splits a launch speed and angle into axis-aligned velocity components.
pub fn velocity_components(speed_mps: f64, angle_deg: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    (speed_mps * theta.cos(), speed_mps * theta.sin())
}

/// Full kinematic state of the projectile `t` seconds after launch.
pub fn state_at(params: &LaunchParams, t: f64) -> KinematicState {
    let (vx, vy0) = velocity_components(params.speed_mps, params.angle_deg);
    KinematicState {
        t,
        x: horizontal_position(0.0, vx, t),
        y: vertical_position(params.height_m, vy0, t),
        vx,
        vy: vertical_velocity(vy0, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn vertical_position_matches_closed_form() {
        let (h, vy0) = (30.0, 34.0);
        for t in [0.0, 0.01, 0.5, 1.0, 2.75, 7.3] {
            let expected = h + vy0 * t - 4.9 * t * t;
            assert!((vertical_position(h, vy0, t) - expected).abs() < EPS);
        }
    }

    #[test]
    fn horizontal_position_is_linear_in_time() {
        let (x0, vx) = (0.0, 20.0);
        let (t1, t2) = (1.25, 4.75);
        let delta = horizontal_position(x0, vx, t2) - horizontal_position(x0, vx, t1);
        assert!((delta - vx * (t2 - t1)).abs() < EPS);
    }

    #[test]
    fn vertical_velocity_decays_at_gravity() {
        assert!((vertical_velocity(34.0, 0.0) - 34.0).abs() < EPS);
        assert!((vertical_velocity(34.0, 2.0) - (34.0 - 19.6)).abs() < EPS);
    }

    #[test]
    fn decomposition_at_axis_angles() {
        let (vx, vy) = velocity_components(40.0, 0.0);
        assert!((vx - 40.0).abs() < EPS);
        assert!(vy.abs() < EPS);

        let (vx, vy) = velocity_components(40.0, 90.0);
        // cos(90°) is not exactly zero in floating point.
        assert!(vx.abs() < 1e-12);
        assert!((vy - 40.0).abs() < EPS);
    }

    #[test]
    fn state_at_zero_matches_launch_conditions() {
        let params = LaunchParams {
            height_m: 30.0,
            speed_mps: 40.0,
            angle_deg: 60.0,
        };
        let state = state_at(&params, 0.0);
        assert_eq!(state.y, params.height_m);
        assert_eq!(state.x, 0.0);
        let (vx, vy) = velocity_components(params.speed_mps, params.angle_deg);
        assert_eq!(state.vx, vx);
        assert_eq!(state.vy, vy);
    }

    #[test]
    fn state_at_is_deterministic() {
        let params = LaunchParams {
            height_m: 12.0,
            speed_mps: 25.0,
            angle_deg: 33.0,
        };
        assert_eq!(state_at(&params, 3.21), state_at(&params, 3.21));
    }
}
