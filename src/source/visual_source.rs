use image::{DynamicImage, ImageBuffer, Rgb};
use thiserror::Error;

/// Errors raised while turning user input into a `VisualSource`.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Where a still image came from. Only used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    Upload { file_name: String },
    Drop { file_name: String },
    /// A single frame captured from the camera and frozen as a still.
    Capture,
}

/// A raw RGB8 pixel buffer with its declared dimensions.
///
/// The buffer is not validated on construction: camera drivers may hand over
/// frames whose byte count disagrees with the reported size, and that is only
/// detected when the pixels are read back (see `Frame::view`).
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Frame {
        Frame { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrows the buffer as an image view, or `None` when the byte count
    /// does not match `width * height * 3`.
    pub fn view(&self) -> Option<ImageBuffer<Rgb<u8>, &[u8]>> {
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(3)?;
        if self.data.len() != expected {
            return None;
        }
        ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
    }
}

/// Anything the user can point the classifier at.
#[derive(Debug, Clone)]
pub enum VisualSource {
    /// A decoded still image (file upload, drag-and-drop, or frozen capture).
    Image { frame: Frame, origin: ImageOrigin },
    /// One frame grabbed from a live camera stream.
    VideoFrame { frame: Frame, sequence: u64 },
}

impl VisualSource {
    /// Decodes PNG/JPEG/BMP/GIF bytes into an `Image` source.
    pub fn decode(bytes: &[u8], origin: ImageOrigin) -> Result<VisualSource, SourceError> {
        let img = image::load_from_memory(bytes)?;
        VisualSource::from_image(img, origin)
    }

    pub fn from_image(img: DynamicImage, origin: ImageOrigin) -> Result<VisualSource, SourceError> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(SourceError::Empty { width, height });
        }
        Ok(VisualSource::Image {
            frame: Frame::from_raw(width, height, rgb.into_raw()),
            origin,
        })
    }

    pub fn video_frame(frame: Frame, sequence: u64) -> VisualSource {
        VisualSource::VideoFrame { frame, sequence }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            VisualSource::Image { frame, .. } | VisualSource::VideoFrame { frame, .. } => frame,
        }
    }

    pub fn width(&self) -> u32 {
        self.frame().width()
    }

    pub fn height(&self) -> u32 {
        self.frame().height()
    }

    /// Freezes a video frame into a still image; stills are returned unchanged.
    pub fn into_still(self) -> VisualSource {
        match self {
            VisualSource::VideoFrame { frame, .. } => VisualSource::Image {
                frame,
                origin: ImageOrigin::Capture,
            },
            still => still,
        }
    }

    /// One-line description shown next to the preview.
    pub fn describe(&self) -> String {
        match self {
            VisualSource::VideoFrame { .. } => "Source: webcam".to_owned(),
            VisualSource::Image { frame, origin } => match origin {
                ImageOrigin::Upload { file_name } | ImageOrigin::Drop { file_name } => {
                    format!("Source: {} ({}\u{d7}{})", file_name, frame.width(), frame.height())
                }
                ImageOrigin::Capture => {
                    format!("Source: captured.png ({}\u{d7}{})", frame.width(), frame.height())
                }
            },
        }
    }
}
