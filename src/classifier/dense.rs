use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::activation::ActivationFunction;
use crate::classifier::classifier::{Classifier, ClassifierError, ScoreKind};
use crate::classifier::metadata::ModelMetadata;
use crate::preprocess::InputTensor;

/// One fully connected layer.
///
/// `weights` has one row per input value and one column per neuron, so the
/// layer output is `input · weights + biases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
    pub activation: ActivationFunction,
}

impl DenseLayer {
    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    pub fn size(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut z = self.biases.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            if *x == 0.0 {
                continue;
            }
            for (zj, w) in z.iter_mut().zip(row) {
                *zj += x * w;
            }
        }
        self.activation.apply(&mut z);
        z
    }
}

/// A feed-forward network of dense layers stored as a JSON file.
///
/// The flattened `[1, S, S, 3]` tensor is fed to the first layer; the last
/// layer's width is the class count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseClassifier {
    #[serde(default = "default_name")]
    pub name: String,
    pub layers: Vec<DenseLayer>,
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

fn default_name() -> String {
    "CNN".to_owned()
}

impl DenseClassifier {
    /// Builds a classifier after checking that the layers chain together.
    pub fn new(
        name: impl Into<String>,
        layers: Vec<DenseLayer>,
        metadata: Option<ModelMetadata>,
    ) -> Result<DenseClassifier, ClassifierError> {
        let model = DenseClassifier { name: name.into(), layers, metadata };
        model.validate()?;
        Ok(model)
    }

    /// Deserializes and validates a model previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<DenseClassifier, ClassifierError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let file = std::fs::File::open(path)
            .map_err(|source| ClassifierError::Io { path: shown.clone(), source })?;
        let reader = std::io::BufReader::new(file);
        let model: DenseClassifier = serde_json::from_reader(reader)
            .map_err(|source| ClassifierError::Parse { path: shown.clone(), source })?;
        model.validate()?;
        info!(
            path = %shown,
            name = %model.name,
            input_size = model.input_size(),
            classes = model.class_count(),
            "loaded dense classifier"
        );
        Ok(model)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Number of input values the first layer expects.
    pub fn input_size(&self) -> usize {
        self.layers.first().map(DenseLayer::input_size).unwrap_or(0)
    }

    fn validate(&self) -> Result<(), ClassifierError> {
        if self.layers.is_empty() {
            return Err(ClassifierError::InvalidModel("model has no layers".into()));
        }
        let mut expected_inputs = self.input_size();
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.input_size() != expected_inputs {
                return Err(ClassifierError::InvalidModel(format!(
                    "layer {} takes {} inputs but the previous layer produces {}",
                    i, layer.input_size(), expected_inputs
                )));
            }
            if layer.size() == 0 {
                return Err(ClassifierError::InvalidModel(format!("layer {} has no neurons", i)));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != layer.size()) {
                return Err(ClassifierError::InvalidModel(format!(
                    "layer {} has a weight row of width {} but {} biases",
                    i, row.len(), layer.size()
                )));
            }
            expected_inputs = layer.size();
        }
        if let Some(input) = self.metadata.as_ref().and_then(|m| m.input) {
            if input.value_count() != self.input_size() {
                return Err(ClassifierError::InvalidModel(format!(
                    "metadata declares a {}x{} RGB input ({} values) but the first layer takes {}",
                    input.width, input.height, input.value_count(), self.input_size()
                )));
            }
        }
        Ok(())
    }
}

impl Classifier for DenseClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn class_count(&self) -> usize {
        self.layers.last().map(DenseLayer::size).unwrap_or(0)
    }

    fn labels(&self) -> Option<&[String]> {
        self.metadata.as_ref().and_then(|m| m.output_labels.as_deref())
    }

    fn score_kind(&self) -> ScoreKind {
        match self.layers.last().map(|l| &l.activation) {
            Some(ActivationFunction::Softmax) => ScoreKind::Probabilities,
            _ => ScoreKind::Logits,
        }
    }

    fn predict(&self, input: &InputTensor) -> Result<Vec<f64>, ClassifierError> {
        if input.len() != self.input_size() {
            return Err(ClassifierError::InputMismatch {
                expected: self.input_size(),
                got: input.len(),
            });
        }
        let mut current: Vec<f64> = input.values().map(f64::from).collect();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        Ok(current)
    }
}
