// The flight driver: an explicit state machine advanced by scheduler ticks.

use crate::domain::kinematics;
use crate::domain::{KinematicState, LaunchParams, StepTuning};
use crate::use_cases::{ControlSignal, FrameUpdate, RunLifecycle};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

/// Driver phase persisted between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stepping,
    Paused,
    Terminated,
}

/// One projectile flight as a tickable state machine.
///
/// All stepping state lives here; the harness around it only decides how
/// long to wait between ticks. Each tick consults the control flags once,
/// so a flag flipped mid-tick is observed one tick late at worst.
pub struct FlightDriver {
    params: LaunchParams,
    time_step_s: f64,
    vy0: f64,
    t: f64,
    step: u64,
    last: KinematicState,
    state: DriverState,
}

impl FlightDriver {
    pub fn new(params: LaunchParams, time_step_s: f64) -> Self {
        let (_, vy0) = kinematics::velocity_components(params.speed_mps, params.angle_deg);
        let last = kinematics::state_at(&params, 0.0);
        Self {
            params,
            time_step_s,
            vy0,
            t: 0.0,
            step: 0,
            last,
            state: DriverState::Stepping,
        }
    }

    /// Frame describing the launch conditions, published once on entry.
    pub fn entry_frame(&self) -> FrameUpdate {
        FrameUpdate {
            step: self.step,
            state: self.last,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Advances the machine by one scheduler tick; returns the frame to
    /// publish, if this tick produced one.
    pub fn tick(&mut self, signal: ControlSignal) -> Option<FrameUpdate> {
        if self.state == DriverState::Terminated {
            return None;
        }

        if !self.airborne() {
            // Touchdown: snap to ground level, hold the last computed x.
            // The landing x is not recomputed at the exact zero-crossing, so
            // it can trail the analytic landing point by up to one step of
            // horizontal travel.
            self.last = KinematicState { y: 0.0, ..self.last };
            self.step += 1;
            self.state = DriverState::Terminated;
            return Some(FrameUpdate {
                step: self.step,
                state: self.last,
            });
        }

        if signal.restart_requested {
            // Caller-initiated early exit: repaint where the projectile is,
            // without snapping it to the ground. The flag stays set; the
            // session clears it before the next run.
            self.state = DriverState::Terminated;
            return Some(FrameUpdate {
                step: self.step,
                state: self.last,
            });
        }

        if signal.paused {
            // Simulated time holds still and nothing is recomputed.
            self.state = DriverState::Paused;
            return None;
        }

        self.state = DriverState::Stepping;
        self.last = kinematics::state_at(&self.params, self.t);
        self.step += 1;
        self.t += self.time_step_s;
        Some(FrameUpdate {
            step: self.step,
            state: self.last,
        })
    }

    fn airborne(&self) -> bool {
        kinematics::vertical_position(self.params.height_m, self.vy0, self.t) > 0.0
    }
}

/// Drives one flight from launch until touchdown or restart.
///
/// The machine above owns simulated time; this harness ties it to the
/// scheduler, sleeping the step yield between ticks (which keeps the host
/// responsive) and the pause poll while paused. Those two sleeps are the
/// only suspension points.
pub async fn flight_task(
    params: LaunchParams,
    tuning: StepTuning,
    controls: watch::Receiver<ControlSignal>,
    frame_tx: broadcast::Sender<FrameUpdate>,
    lifecycle_tx: watch::Sender<RunLifecycle>,
) {
    let mut driver = FlightDriver::new(params, tuning.time_step_s);

    info!(
        height_m = params.height_m,
        speed_mps = params.speed_mps,
        angle_deg = params.angle_deg,
        "flight started"
    );
    let _ = frame_tx.send(driver.entry_frame());
    lifecycle_tx.send_replace(RunLifecycle::Running);

    loop {
        let signal = *controls.borrow();
        let before = driver.state();
        let frame = driver.tick(signal);
        if let Some(frame) = frame {
            let _ = frame_tx.send(frame);
        }

        match driver.state() {
            DriverState::Terminated => {
                lifecycle_tx.send_replace(RunLifecycle::Finished);
                match frame {
                    Some(f) if f.state.y == 0.0 => {
                        info!(t = f.state.t, x = f.state.x, "touchdown");
                    }
                    _ => info!("flight aborted by restart"),
                }
                return;
            }
            DriverState::Paused => {
                if before != DriverState::Paused {
                    lifecycle_tx.send_replace(RunLifecycle::Paused);
                    debug!("flight paused");
                }
                tokio::time::sleep(tuning.pause_poll).await;
            }
            DriverState::Stepping => {
                if before == DriverState::Paused {
                    lifecycle_tx.send_replace(RunLifecycle::Running);
                    debug!("flight resumed");
                }
                tokio::time::sleep(tuning.step_yield).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> FlightDriver {
        FlightDriver::new(
            LaunchParams {
                height_m: 30.0,
                speed_mps: 40.0,
                angle_deg: 60.0,
            },
            0.01,
        )
    }

    #[test]
    fn paused_ticks_produce_nothing_and_hold_time() {
        let mut d = driver();
        let paused = ControlSignal {
            paused: true,
            restart_requested: false,
        };
        for _ in 0..10 {
            assert!(d.tick(paused).is_none());
            assert_eq!(d.state(), DriverState::Paused);
        }

        let frame = d.tick(ControlSignal::default()).expect("resumed tick");
        assert_eq!(frame.state.t, 0.0);
        assert_eq!(d.state(), DriverState::Stepping);
    }

    #[test]
    fn restart_repeats_the_last_frame_and_terminates() {
        let mut d = driver();
        let mut last = None;
        for _ in 0..20 {
            last = d.tick(ControlSignal::default());
        }

        let frame = d
            .tick(ControlSignal {
                paused: false,
                restart_requested: true,
            })
            .expect("restart frame");
        assert_eq!(d.state(), DriverState::Terminated);
        assert_eq!(frame.state, last.unwrap().state);
        assert!(frame.state.y > 0.0);

        // Terminated machines stay silent.
        assert!(d.tick(ControlSignal::default()).is_none());
    }

    #[test]
    fn a_grounded_launch_terminates_on_the_first_tick() {
        let mut d = FlightDriver::new(
            LaunchParams {
                height_m: 0.0,
                speed_mps: 0.0,
                angle_deg: 0.0,
            },
            0.01,
        );
        let frame = d.tick(ControlSignal::default()).expect("terminal frame");
        assert_eq!(frame.state.y, 0.0);
        assert_eq!(d.state(), DriverState::Terminated);
    }
}
