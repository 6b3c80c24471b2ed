use thiserror::Error;

use crate::source::VisualSource;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera access denied")]
    Denied,
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("camera stream already stopped")]
    Stopped,
}

/// Something that can hand out a live camera stream.
pub trait Camera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// A live camera stream holding a hardware handle.
///
/// Implementations must release the device in `stop` and must tolerate
/// `stop` being called more than once.
pub trait CameraStream: Send {
    /// Grabs the current frame as a `VisualSource::VideoFrame`.
    fn capture(&mut self) -> Result<VisualSource, CameraError>;

    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Owns a stream and stops it when dropped, so a session can never leak the
/// device by forgetting to call `stop`.
pub struct CameraGuard {
    stream: Box<dyn CameraStream>,
}

impl CameraGuard {
    pub fn new(stream: Box<dyn CameraStream>) -> CameraGuard {
        CameraGuard { stream }
    }

    pub fn capture(&mut self) -> Result<VisualSource, CameraError> {
        if !self.stream.is_active() {
            return Err(CameraError::Stopped);
        }
        self.stream.capture()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_active()
    }
}

impl Drop for CameraGuard {
    fn drop(&mut self) {
        if self.stream.is_active() {
            self.stream.stop();
        }
    }
}

impl std::fmt::Debug for CameraGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraGuard").field("active", &self.is_active()).finish()
    }
}
