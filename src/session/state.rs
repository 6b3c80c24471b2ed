use serde::Serialize;

use crate::rank::{top_k, RankedPrediction};

/// Where the session is in the select -> predict -> display cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No source selected.
    Idle,
    /// A still image or a live camera feed is ready to classify.
    SourceReady,
    /// A prediction has started and not finished yet.
    Predicting,
    /// The latest prediction is being shown.
    Displaying,
}

/// Whether predictions come from a real model or from random scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    Model,
    Demo,
}

/// Scores produced for one pending prediction, already normalized.
#[derive(Debug, Clone)]
pub struct ScoreVector {
    pub scores: Vec<f64>,
    pub mode: PredictionMode,
}

/// Outcome of a completed prediction.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub ranked: Vec<RankedPrediction>,
    pub advice: &'static str,
    pub mode: PredictionMode,
}

impl Prediction {
    pub fn best(&self) -> Option<&RankedPrediction> {
        self.ranked.first()
    }

    pub fn top(&self, k: usize) -> &[RankedPrediction] {
        top_k(&self.ranked, k)
    }

    pub fn is_demo(&self) -> bool {
        self.mode == PredictionMode::Demo
    }
}
