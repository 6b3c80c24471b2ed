use thiserror::Error;

use crate::preprocess::InputTensor;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("could not read model file '{path}': {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("model file '{path}' is not a valid model: {source}")]
    Parse { path: String, #[source] source: serde_json::Error },
    #[error("invalid model: {0}")]
    InvalidModel(String),
    #[error("input mismatch: model expects {expected} values, got {got}")]
    InputMismatch { expected: usize, got: usize },
}

/// What the numbers returned by `Classifier::predict` mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Unnormalized; softmax is applied before ranking.
    Logits,
    /// Already a probability distribution.
    Probabilities,
}

/// An image classifier over `[1, S, S, 3]` inputs.
pub trait Classifier: Send + Sync {
    /// Display name, e.g. for the model info line.
    fn name(&self) -> &str;

    /// Number of output classes.
    fn class_count(&self) -> usize;

    /// Class names carried by the model itself, if any.
    fn labels(&self) -> Option<&[String]> {
        None
    }

    fn score_kind(&self) -> ScoreKind {
        ScoreKind::Logits
    }

    /// Raw scores, one per class.
    fn predict(&self, input: &InputTensor) -> Result<Vec<f64>, ClassifierError>;
}
