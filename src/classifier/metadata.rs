use serde::{Deserialize, Serialize};

/// Square RGB image input the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    pub width: u32,
    pub height: u32,
}

impl ImageInput {
    /// Number of input values once flattened as `[1, H, W, 3]`.
    pub fn value_count(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Optional annotations stored alongside the model weights.
/// All fields are Option<> so bare weight files deserialize cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub description: Option<String>,
    pub input: Option<ImageInput>,
    /// Class names for the output layer, in output order.
    pub output_labels: Option<Vec<String>>,
}
