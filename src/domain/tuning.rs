// Stepping cadence for the flight driver (display tuning lives elsewhere).

use std::time::Duration;

/// Fixed time stepping for one flight run.
#[derive(Debug, Clone, Copy)]
pub struct StepTuning {
    /// Simulated seconds added per step.
    pub time_step_s: f64,
    /// Scheduler yield between steps; keeps the host responsive.
    pub step_yield: Duration,
    /// Flag poll interval while paused.
    pub pause_poll: Duration,
}

impl Default for StepTuning {
    fn default() -> Self {
        Self {
            time_step_s: 0.01,
            step_yield: Duration::from_millis(1),
            pause_poll: Duration::from_millis(100),
        }
    }
}
