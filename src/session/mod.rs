pub mod session;
pub mod state;

#[cfg(test)]
mod session_test;

pub use session::{PendingPrediction, Session, SessionError, SessionStatus};
pub use state::{Prediction, PredictionMode, ScoreVector, SessionState};
