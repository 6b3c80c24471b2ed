use serde::Serialize;

/// A class name paired with its probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPrediction {
    pub label: String,
    pub probability: f64,
}

/// Pairs every label with its score and sorts by probability, highest first.
///
/// - A label with no score at its index gets probability 0.0.
/// - Scores beyond the last label are ignored.
/// - NaN and infinite scores are treated as 0.0.
/// - Equal probabilities keep label order (the sort is stable).
pub fn rank<L: AsRef<str>>(scores: &[f64], labels: &[L]) -> Vec<RankedPrediction> {
    let mut ranked: Vec<RankedPrediction> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            // `+ 0.0` folds -0.0 into 0.0 so both compare as equal below.
            let p = scores.get(i).copied().filter(|p| p.is_finite()).unwrap_or(0.0) + 0.0;
            RankedPrediction { label: label.as_ref().to_owned(), probability: p }
        })
        .collect();
    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    ranked
}

/// The first `k` entries of a ranked list (fewer if the list is shorter).
pub fn top_k(ranked: &[RankedPrediction], k: usize) -> &[RankedPrediction] {
    &ranked[..k.min(ranked.len())]
}

/// Formats a probability as a percentage with one decimal, e.g. `"61.3%"`.
pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}
