// Domain-level launch inputs and derived kinematic state.

/// Initial conditions for one projectile run.
#[derive(Debug, Clone, Copy)]
pub struct LaunchParams {
    /// Launch height above ground level, meters.
    pub height_m: f64,
    /// Initial speed along the launch direction, m/s.
    pub speed_mps: f64,
    /// Launch angle above horizontal, degrees.
    pub angle_deg: f64,
}

/// Position and velocity of the projectile at a given simulated time.
///
/// Never stored between steps; always recomputed from `LaunchParams` and `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl KinematicState {
    /// Magnitude of the velocity vector, shown in the readout.
    pub fn net_speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}
