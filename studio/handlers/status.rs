use std::io::Cursor;
use tiny_http::Response;
use tracing::warn;

use crate::state::{lock, SharedState};

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let snapshot = lock(&state).session.snapshot();
    match serde_json::to_string(&snapshot) {
        Ok(body) => crate::routes::json_response(body),
        Err(e) => {
            warn!(error = %e, "status serialization failed");
            crate::routes::json_response("{}".to_owned())
        }
    }
}
