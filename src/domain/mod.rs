// Domain layer: closed-form kinematics and value types for one flight.

pub mod kinematics;
pub mod state;
pub mod tuning;

pub use state::{KinematicState, LaunchParams};
pub use tuning::StepTuning;
