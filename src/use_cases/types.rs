// Use-case level control inputs and observer outputs for the flight loop.

use crate::domain::KinematicState;

/// External pause/restart flags read by the driver once per step.
///
/// Carried in a watch channel whose only writer is the input layer; the
/// driver holds a read-only view. A read that is one tick stale costs
/// responsiveness, never correctness.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlSignal {
    /// Freezes simulated time while set.
    pub paused: bool,
    /// One-shot early-exit request; cleared by the session, never the driver.
    pub restart_requested: bool,
}

/// Coarse run state used to gate which key affordances are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLifecycle {
    Idle,
    Running,
    Paused,
    Finished,
}

/// One computed step, broadcast to the render and readout sinks.
#[derive(Debug, Clone, Copy)]
pub struct FrameUpdate {
    pub step: u64,
    pub state: KinematicState,
}
