pub mod activation;
pub mod classifier;
pub mod dense;
pub mod metadata;

pub use activation::{softmax, ActivationFunction};
pub use classifier::{Classifier, ClassifierError, ScoreKind};
pub use dense::{DenseClassifier, DenseLayer};
pub use metadata::{ImageInput, ModelMetadata};
