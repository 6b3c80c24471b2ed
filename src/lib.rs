pub mod camera;
pub mod classifier;
pub mod config;
pub mod labels;
pub mod preprocess;
pub mod rank;
pub mod session;
pub mod source;

// Convenience re-exports
pub use camera::{Camera, CameraError, CameraStream, StillCamera};
pub use classifier::{Classifier, ClassifierError, DenseClassifier};
pub use config::{AppConfig, ConfigError};
pub use labels::LabelSet;
pub use preprocess::{ImagePreprocessor, InputTensor, Letterbox, PreprocessError};
pub use rank::{advise, rank, synthetic_scores, RankedPrediction};
pub use session::{Prediction, PredictionMode, Session, SessionError, SessionState};
pub use source::{Frame, ImageOrigin, SourceError, VisualSource};
