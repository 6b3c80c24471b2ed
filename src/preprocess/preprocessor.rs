use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array4;
use thiserror::Error;
use tracing::debug;

use crate::preprocess::input_tensor::InputTensor;
use crate::preprocess::letterbox::Letterbox;
use crate::source::VisualSource;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("invalid dimensions: source {width}x{height}, target {target_size}")]
    InvalidDimensions { width: u32, height: u32, target_size: u32 },
    /// The source pixels (or the canvas they were drawn onto) could not be read.
    #[error("image pixels could not be read: {0}")]
    ImageAccess(String),
}

/// Letterboxes visual sources onto a square canvas and emits normalized tensors.
///
/// The scratch canvas is kept between calls to avoid reallocating it, but it
/// is cleared to black before every draw so no pixels leak from one call into
/// the next.
#[derive(Debug, Default)]
pub struct ImagePreprocessor {
    canvas: Option<RgbImage>,
}

impl ImagePreprocessor {
    pub fn new() -> ImagePreprocessor {
        ImagePreprocessor { canvas: None }
    }

    pub fn preprocess(
        &mut self,
        source: &VisualSource,
        target_size: u32,
    ) -> Result<InputTensor, PreprocessError> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 || target_size == 0 {
            return Err(PreprocessError::InvalidDimensions { width, height, target_size });
        }

        let pixels = source.frame().view().ok_or_else(|| {
            PreprocessError::ImageAccess(format!(
                "pixel buffer does not match declared size {}x{}",
                width, height
            ))
        })?;

        let lb = Letterbox::fit(width, height, target_size);
        debug!(
            width, height, target_size,
            scale = lb.scale,
            new_width = lb.new_width,
            new_height = lb.new_height,
            offset_x = lb.offset_x,
            offset_y = lb.offset_y,
            "letterboxing source"
        );

        let canvas = self.blank_canvas(target_size);
        let (x, y) = (lb.offset_x as i64, lb.offset_y as i64);
        if (lb.new_width, lb.new_height) == (width, height) {
            imageops::replace(canvas, &pixels, x, y);
        } else {
            let scaled = imageops::resize(&pixels, lb.new_width, lb.new_height, FilterType::Triangle);
            imageops::replace(canvas, &scaled, x, y);
        }

        read_back(canvas, target_size as usize)
    }

    /// Returns the scratch canvas sized `size × size` and filled with black.
    fn blank_canvas(&mut self, size: u32) -> &mut RgbImage {
        let reusable = matches!(&self.canvas, Some(c) if c.dimensions() == (size, size));
        if !reusable {
            self.canvas = Some(RgbImage::new(size, size));
        }
        let canvas = self.canvas.get_or_insert_with(|| RgbImage::new(size, size));
        canvas.pixels_mut().for_each(|p| *p = Rgb([0, 0, 0]));
        canvas
    }
}

/// Converts the canvas to `[1, S, S, 3]` floats in [0, 1].
fn read_back(canvas: &RgbImage, size: usize) -> Result<InputTensor, PreprocessError> {
    let values: Vec<f32> = canvas.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    let data = Array4::from_shape_vec((1, size, size, 3), values)
        .map_err(|e| PreprocessError::ImageAccess(format!("canvas read-back failed: {}", e)))?;
    Ok(InputTensor::new(data))
}
