use ndarray::Array4;

/// Classifier input: `[1, S, S, 3]` (batch, height, width, RGB), values in [0, 1].
#[derive(Debug, Clone)]
pub struct InputTensor {
    data: Array4<f32>,
}

impl InputTensor {
    pub(crate) fn new(data: Array4<f32>) -> InputTensor {
        InputTensor { data }
    }

    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }

    /// Side length `S` of the square input.
    pub fn target_size(&self) -> usize {
        self.data.shape()[1]
    }

    /// Normalized value of channel `c` at canvas position `(x, y)`.
    pub fn get(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[[0, y, x, c]]
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array4<f32> {
        self.data
    }

    /// Iterates values in row-major NHWC order (R, G, B of pixel (0,0) first).
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
