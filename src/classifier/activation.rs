use serde::{Deserialize, Serialize};
use std::f64::consts::E;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    /// Vector-valued; applied over the whole layer output by `apply`.
    Softmax,
    Tanh,
    LeakyReLU { alpha: f64 },
}

impl ActivationFunction {
    /// Applies the activation to a layer's pre-activation values in place.
    pub fn apply(&self, z: &mut [f64]) {
        match self {
            ActivationFunction::Softmax => {
                let probs = softmax(z);
                z.copy_from_slice(&probs);
            }
            ActivationFunction::Sigmoid => z.iter_mut().for_each(|x| *x = 1.0 / (1.0 + E.powf(-*x))),
            ActivationFunction::ReLU => z.iter_mut().for_each(|x| *x = x.max(0.0)),
            ActivationFunction::Identity => {}
            ActivationFunction::Tanh => z.iter_mut().for_each(|x| *x = x.tanh()),
            ActivationFunction::LeakyReLU { alpha } => {
                z.iter_mut().for_each(|x| if *x < 0.0 { *x *= alpha })
            }
        }
    }
}

/// Numerically stable softmax: exp(x - max) / sum.
///
/// An empty slice yields an empty vector.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
