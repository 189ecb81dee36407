// Session wiring for spawning and controlling flight runs.

use crate::domain::{LaunchParams, StepTuning};
use crate::use_cases::flight::flight_task;
use crate::use_cases::{ControlSignal, FrameUpdate, RunLifecycle};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Shared configuration applied to every run of a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Capacity for broadcast frame updates.
    pub frame_channel_capacity: usize,
    /// Stepping cadence handed to each flight run.
    pub tuning: StepTuning,
}

/// Errors returned by session operations.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A flight is already stepping or paused; one run at a time.
    AlreadyRunning,
}

/// Channel plumbing for one visualizer session.
///
/// The session holds the only writable end of the control channel; each
/// flight gets a read-only view. That keeps the single-writer/single-reader
/// contract on the shared flags without any locking.
pub struct Session {
    settings: SessionSettings,
    controls_tx: watch::Sender<ControlSignal>,
    frame_tx: broadcast::Sender<FrameUpdate>,
    lifecycle_tx: watch::Sender<RunLifecycle>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        let (controls_tx, _controls_rx) = watch::channel(ControlSignal::default());
        let (frame_tx, _frame_rx) = broadcast::channel(settings.frame_channel_capacity);
        let (lifecycle_tx, _lifecycle_rx) = watch::channel(RunLifecycle::Idle);
        Self {
            settings,
            controls_tx,
            frame_tx,
            lifecycle_tx,
        }
    }

    /// Spawns a flight run unless one is already live.
    ///
    /// The driver itself does not police concurrent runs; this gate is the
    /// calling layer's side of that contract.
    pub fn start(&self, params: LaunchParams) -> Result<JoinHandle<()>, SessionError> {
        match *self.lifecycle_tx.borrow() {
            RunLifecycle::Running | RunLifecycle::Paused => {
                return Err(SessionError::AlreadyRunning);
            }
            RunLifecycle::Idle | RunLifecycle::Finished => {}
        }

        // The restart flag is one-shot: the driver leaves it set on exit, so
        // it has to be cleared before the next run consults it.
        self.controls_tx.send_modify(|c| c.restart_requested = false);

        // Claim the lifecycle before the task is scheduled so a second
        // start cannot slip in between spawn and first poll.
        self.lifecycle_tx.send_replace(RunLifecycle::Running);

        Ok(tokio::spawn(flight_task(
            params,
            self.settings.tuning,
            self.controls_tx.subscribe(),
            self.frame_tx.clone(),
            self.lifecycle_tx.clone(),
        )))
    }

    pub fn set_paused(&self, paused: bool) {
        self.controls_tx.send_modify(|c| c.paused = paused);
    }

    /// Flips the pause flag; used by the front end's single pause key.
    pub fn toggle_pause(&self) {
        self.controls_tx.send_modify(|c| c.paused = !c.paused);
    }

    pub fn request_restart(&self) {
        self.controls_tx.send_modify(|c| c.restart_requested = true);
    }

    /// Current coarse run state.
    pub fn phase(&self) -> RunLifecycle {
        *self.lifecycle_tx.borrow()
    }

    /// Observer handle for the per-step frame broadcast.
    pub fn subscribe_frames(&self) -> broadcast::Receiver<FrameUpdate> {
        self.frame_tx.subscribe()
    }

    /// Observer handle for coarse run state changes.
    pub fn lifecycle(&self) -> watch::Receiver<RunLifecycle> {
        self.lifecycle_tx.subscribe()
    }
}
