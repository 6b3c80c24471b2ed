use std::io::Cursor;
use tiny_http::Response;

use leafscan::rank::advice::is_warning;
use leafscan::rank::format_percent;
use leafscan::{Prediction, SessionState};

use crate::render::{html_escape, render_page};
use crate::state::{lock, FlashKind, FlashMessage, SharedState};

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

pub fn handle_get(state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut st = lock(&state);
    let flash    = st.take_flash();
    let session  = &st.session;
    let top_k    = session.config().top_k;
    let status   = session.status_text();
    let model    = session.model_info();
    let source   = session.source_info().unwrap_or_else(|| "No image selected.".to_owned());
    let results  = session.last_prediction().map(|p| format_prediction(p, top_k)).unwrap_or_default();
    let disabled = matches!(session.state(), SessionState::Idle | SessionState::Predicting);
    drop(st);

    let page = render_page(|html| {
        html.replace("{{STATUS}}", &html_escape(status))
            .replace("{{MODEL_INFO}}", &html_escape(&model))
            .replace("{{SOURCE_INFO}}", &html_escape(&source))
            .replace("{{FLASH}}", &flash.map(|f| flash_html(&f)).unwrap_or_default())
            .replace("{{PREDICTIONS}}", &results)
            .replace("{{PREDICT_DISABLED}}", if disabled { "disabled" } else { "" })
    });
    crate::routes::html_response(page)
}

fn flash_html(flash: &FlashMessage) -> String {
    let class = match flash.kind {
        FlashKind::Success => "flash-ok",
        FlashKind::Error   => "flash-err",
    };
    format!(r#"<div class="flash {}">{}</div>"#, class, html_escape(&flash.text))
}

/// Ranked rows (best first, at most `top_k`) followed by the advice note.
fn format_prediction(prediction: &Prediction, top_k: usize) -> String {
    let rows: String = prediction.top(top_k).iter().enumerate().map(|(i, p)| {
        let width = (p.probability.clamp(0.0, 1.0) * 260.0) as u32;
        let dim   = if i != 0 { " dim" } else { "" };
        format!(
            r#"<tr><td class="label">{}</td><td><div class="bar-wrap"><div class="bar-fill{}" style="width:{}px"></div></div></td><td class="prob-pct">{}</td></tr>"#,
            html_escape(&p.label), dim, width, format_percent(p.probability)
        )
    }).collect();

    let hero = prediction.best()
        .map(|b| format!("Top: {} ({})", html_escape(&b.label), format_percent(b.probability)))
        .unwrap_or_default();
    let advice_class = if is_warning(prediction.advice) { "advice warn" } else { "advice" };
    let demo = if prediction.is_demo() {
        r#"<div class="demo-note">Demo output: scores are random, not a diagnosis.</div>"#
    } else {
        ""
    };

    format!(
        r#"<div class="result-card"><h2>Result</h2>
<div class="prediction-hero">{hero}</div>
<table class="prob-table">
  <thead><tr><th>Class</th><th>Confidence</th><th></th></tr></thead>
  <tbody>{rows}</tbody>
</table>
<div class="{advice_class}">{advice}</div>{demo}</div>"#,
        hero = hero,
        rows = rows,
        advice_class = advice_class,
        advice = html_escape(prediction.advice),
        demo = demo,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use leafscan::{advise, rank, PredictionMode};

    fn prediction(mode: PredictionMode) -> Prediction {
        let ranked = rank(&[0.1, 0.7, 0.2], &["Healthy", "Cordana", "<x>"]);
        let advice = advise(&ranked[0].label);
        Prediction { ranked, advice, mode }
    }

    #[test]
    fn rows_are_limited_and_best_first() {
        let html = format_prediction(&prediction(PredictionMode::Model), 2);
        assert!(html.contains("Top: Cordana (70.0%)"));
        assert_eq!(html.matches("<tr><td class=\"label\">").count(), 2);
        assert!(html.find("Cordana").unwrap() < html.find("&lt;x&gt;").unwrap());
        assert!(!html.contains("Healthy"));
        assert!(!html.contains("demo-note"));
    }

    #[test]
    fn demo_output_is_flagged() {
        let html = format_prediction(&prediction(PredictionMode::Demo), 5);
        assert!(html.contains("demo-note"));
    }
}
