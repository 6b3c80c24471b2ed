use rand::Rng;

/// Random scores for demo mode: one uniform draw per class, normalized so the
/// vector sums to 1.0. Carries no predictive meaning.
pub fn synthetic_scores<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    let raw: Vec<f64> = (0..count).map(|_| rng.gen::<f64>()).collect();
    let sum: f64 = raw.iter().sum();
    if sum <= 0.0 {
        // Every draw came out as exactly zero; fall back to uniform.
        return vec![1.0 / count as f64; count];
    }
    raw.into_iter().map(|v| v / sum).collect()
}
