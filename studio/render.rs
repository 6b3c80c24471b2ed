/// Template renderer for the leafscan studio.
///
/// The page is a single HTML template (`studio/assets/index.html`) with
/// placeholder tokens like `{{TOKEN}}`, embedded at compile time.  Handlers
/// pass a closure that fills the tokens they own; anything left over is
/// blanked so raw `{{TOKEN}}` strings never reach the browser.

const TEMPLATE: &str = include_str!("assets/index.html");

pub fn render_page<F>(fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    blank_remaining(fill(TEMPLATE.to_owned()))
}

/// Replaces any `{{UPPERCASE_TOKEN}}` that wasn't already substituted with an
/// empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            let abs_end = start + end + 2;
            html.replace_range(start..abs_end, "");
        } else {
            break;
        }
    }
    html
}

/// Escapes markup, plus braces so user text can never form a `{{TOKEN}}`.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
     .replace('{', "&#123;")
     .replace('}', "&#125;")
}
