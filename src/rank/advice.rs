pub const HEALTHY: &str =
    "Leaf looks healthy. Keep monitoring and maintain good field hygiene.";
pub const BLACK_SIGATOKA: &str =
    "Consider removing infected leaves and improving airflow; consult local guidance.";
pub const CORDANA: &str =
    "Prune affected parts and avoid overhead irrigation; consider fungicide per guidance.";
pub const FUSARIUM_WILT: &str =
    "Isolate affected plants; sanitize tools; check resistant cultivars.";
pub const VERIFY_WITH_EXPERT: &str = "Verify results with an expert before acting.";

/// Guidance text for the top-ranked class. Unknown classes get the generic
/// "verify with an expert" message.
pub fn advise(top_label: &str) -> &'static str {
    match top_label {
        "Healthy" => HEALTHY,
        "Black Sigatoka" => BLACK_SIGATOKA,
        "Cordana" => CORDANA,
        "Fusarium Wilt" => FUSARIUM_WILT,
        _ => VERIFY_WITH_EXPERT,
    }
}

/// True when the message is a warning rather than good news.
pub fn is_warning(message: &str) -> bool {
    !matches!(message, HEALTHY | VERIFY_WITH_EXPERT)
}
