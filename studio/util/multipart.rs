/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
}

/// One part of a multipart body: its raw header block and its payload.
struct Part<'a> {
    headers: String,
    body:    &'a [u8],
}

fn parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";
    split_on(body, delimiter.as_bytes())
        .into_iter()
        .filter_map(|part| {
            let sep_pos = find_subsequence(part, sep)?;
            let raw = &part[sep_pos + sep.len()..];
            Some(Part {
                headers: String::from_utf8_lossy(&part[..sep_pos]).into_owned(),
                body:    raw.strip_suffix(b"\r\n").unwrap_or(raw),
            })
        })
        .collect()
}

/// Extracts a quoted `key="..."` value from a Content-Disposition header.
fn disposition_value(headers: &str, key: &str) -> Option<String> {
    let needle = format!("{}=\"", key);
    // `name="` also matches inside `filename="`; require a separator before it.
    let pos = headers
        .match_indices(&needle)
        .map(|(i, _)| i)
        .find(|&i| i == 0 || matches!(headers.as_bytes()[i - 1], b' ' | b';'))?;
    let rest = &headers[pos + needle.len()..];
    let end = rest.find('"')?;
    Some(rest[..end].to_owned())
}

/// An uploaded file: the client-side file name and its bytes.
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes:     Vec<u8>,
}

/// Extracts the file part named `field_name` from a multipart/form-data body.
pub fn extract_file(body: &[u8], boundary: &str, field_name: &str) -> Option<UploadedFile> {
    parts(body, boundary).into_iter().find_map(|part| {
        let file_name = disposition_value(&part.headers, "filename");
        let is_field  = disposition_value(&part.headers, "name").as_deref() == Some(field_name);
        if is_field && file_name.is_some() {
            Some(UploadedFile { file_name, bytes: part.body.to_vec() })
        } else {
            None
        }
    })
}

/// Extracts a plain-text (non-file) field from a multipart body.
pub fn extract_text_field(body: &[u8], boundary: &str, field_name: &str) -> Option<String> {
    parts(body, boundary).into_iter().find_map(|part| {
        let is_file  = part.headers.contains("filename=");
        let is_field = disposition_value(&part.headers, "name").as_deref() == Some(field_name);
        if is_field && !is_file {
            String::from_utf8(part.body.to_vec()).ok()
        } else {
            None
        }
    })
}
