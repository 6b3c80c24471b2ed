pub mod input_tensor;
pub mod letterbox;
pub mod preprocessor;

pub use input_tensor::InputTensor;
pub use letterbox::Letterbox;
pub use preprocessor::{ImagePreprocessor, PreprocessError};
