use std::io::Cursor;
use tiny_http::{Request, Response};
use tracing::{info, warn};

use leafscan::{ImageOrigin, VisualSource};

use crate::state::{lock, FlashMessage, SharedState};
use crate::util::multipart::{extract_boundary, extract_file, extract_text_field};

// ---------------------------------------------------------------------------
// POST /source
// ---------------------------------------------------------------------------

/// Accepts a multipart upload (`image_file`, plus an optional `origin` field
/// set by the page script) and makes it the session's source.
pub fn handle_upload(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let flash = match read_source(request, &content_type) {
        Ok(source) => {
            let text = source.describe();
            info!(%text, "new source");
            lock(&state).session.select_source(source);
            FlashMessage::success(text)
        }
        Err(msg) => {
            warn!(%msg, "upload rejected");
            FlashMessage::error(msg)
        }
    };

    lock(&state).flash = Some(flash);
    crate::routes::redirect("/")
}

fn read_source(request: &mut Request, content_type: &str) -> Result<VisualSource, String> {
    if !content_type.starts_with("multipart/form-data") {
        return Err("Expected a multipart form upload.".to_owned());
    }
    let boundary = extract_boundary(content_type)
        .ok_or_else(|| "Missing multipart boundary.".to_owned())?;

    let mut body = Vec::new();
    request.as_reader().read_to_end(&mut body)
        .map_err(|e| format!("Could not read upload: {}", e))?;

    let file = match extract_file(&body, &boundary, "image_file") {
        Some(file) if !file.bytes.is_empty() => file,
        _ => return Err("No image file was uploaded.".to_owned()),
    };
    let origin_field = extract_text_field(&body, &boundary, "origin").unwrap_or_default();
    let origin = origin_for(origin_field.trim(), file.file_name);

    VisualSource::decode(&file.bytes, origin).map_err(|e| e.to_string())
}

fn origin_for(field: &str, file_name: Option<String>) -> ImageOrigin {
    let file_name = file_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "image".to_owned());
    match field {
        "camera" => ImageOrigin::Capture,
        "drop"   => ImageOrigin::Drop { file_name },
        _        => ImageOrigin::Upload { file_name },
    }
}

// ---------------------------------------------------------------------------
// POST /clear
// ---------------------------------------------------------------------------

pub fn handle_clear(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);
    st.session.clear();
    st.flash = None;
    drop(st);
    crate::routes::redirect("/")
}
