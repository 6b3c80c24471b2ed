use std::io::Cursor;
use tiny_http::Response;
use tracing::debug;

use leafscan::SessionError;

use crate::state::{lock, FlashMessage, SharedState};

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

/// Runs a prediction on the current source.
///
/// The session lock is released while the classifier runs so `/status` and
/// page loads stay responsive; a source change in the meantime makes the
/// result stale and it is dropped.
pub fn handle_predict(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let begun = lock(&state).session.begin_prediction();
    let flash = match begun {
        Ok(pending) => {
            let outcome = pending.run();
            let mut st = lock(&state);
            let finished = st.session.finish_prediction(pending, outcome).err();
            finished.map(|e| flash_for(&e))
        }
        Err(e) => Some(flash_for(&e)),
    };

    if let Some(flash) = flash {
        lock(&state).flash = Some(flash);
    }
    crate::routes::redirect("/")
}

fn flash_for(err: &SessionError) -> FlashMessage {
    debug!(error = %err, "prediction not shown");
    match err {
        SessionError::NoSource => FlashMessage::error(err.to_string()),
        SessionError::Cancelled => FlashMessage::success("The source changed; prediction discarded."),
        SessionError::PredictionInFlight => FlashMessage::error("A prediction is already running."),
        other => FlashMessage::error(format!("Prediction failed: {}", other)),
    }
}
