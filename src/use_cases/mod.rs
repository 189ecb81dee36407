// Use cases layer: the flight driver and its session wiring.

pub mod flight;
pub mod session;
pub mod types;

pub use session::{Session, SessionError, SessionSettings};
pub use types::{ControlSignal, FrameUpdate, RunLifecycle};
