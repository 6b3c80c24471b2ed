use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::camera::camera::{Camera, CameraError, CameraStream};
use crate::source::{Frame, VisualSource};

/// A camera that replays one fixed frame.
///
/// Stands in for a real device on headless hosts and in tests. The open/stop
/// bookkeeping is shared with every stream it hands out, so callers can check
/// that streams were released.
#[derive(Debug, Clone)]
pub struct StillCamera {
    frame: Option<Frame>,
    open_streams: Arc<AtomicUsize>,
}

impl StillCamera {
    pub fn new(frame: Frame) -> StillCamera {
        StillCamera { frame: Some(frame), open_streams: Arc::new(AtomicUsize::new(0)) }
    }

    /// A camera whose permission request is always refused.
    pub fn denied() -> StillCamera {
        StillCamera { frame: None, open_streams: Arc::new(AtomicUsize::new(0)) }
    }

    /// Streams opened and not yet stopped.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }
}

impl Camera for StillCamera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        let frame = self.frame.clone().ok_or(CameraError::Denied)?;
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        debug!(open = self.open_streams(), "still camera stream opened");
        Ok(Box::new(StillStream {
            frame,
            sequence: 0,
            active: true,
            open_streams: Arc::clone(&self.open_streams),
        }))
    }
}

struct StillStream {
    frame: Frame,
    sequence: u64,
    active: bool,
    open_streams: Arc<AtomicUsize>,
}

impl CameraStream for StillStream {
    fn capture(&mut self) -> Result<VisualSource, CameraError> {
        if !self.is_active() {
            return Err(CameraError::Stopped);
        }
        self.sequence += 1;
        Ok(VisualSource::video_frame(self.frame.clone(), self.sequence))
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.open_streams.fetch_sub(1, Ordering::SeqCst);
            debug!("still camera stream stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraGuard;

    #[test]
    fn guard_releases_stream_on_drop() {
        let mut camera = StillCamera::new(Frame::from_raw(1, 1, vec![0, 0, 0]));
        let guard = CameraGuard::new(camera.open().unwrap());
        assert_eq!(camera.open_streams(), 1);
        drop(guard);
        assert_eq!(camera.open_streams(), 0);
    }

    #[test]
    fn captures_are_numbered_video_frames() {
        let mut camera = StillCamera::new(Frame::from_raw(2, 1, vec![0; 6]));
        let mut guard = CameraGuard::new(camera.open().unwrap());
        guard.capture().unwrap();
        match guard.capture().unwrap() {
            VisualSource::VideoFrame { sequence, frame } => {
                assert_eq!(sequence, 2);
                assert_eq!(frame.width(), 2);
            }
            other => panic!("expected a video frame, got {:?}", other),
        }
    }

    #[test]
    fn stopped_stream_refuses_capture() {
        let mut camera = StillCamera::new(Frame::from_raw(1, 1, vec![0, 0, 0]));
        let mut stream = camera.open().unwrap();
        stream.stop();
        stream.stop();
        assert_eq!(camera.open_streams(), 0);
        assert!(matches!(stream.capture(), Err(CameraError::Stopped)));
    }

    #[test]
    fn denied_camera_never_opens() {
        let mut camera = StillCamera::denied();
        assert!(matches!(camera.open(), Err(CameraError::Denied)));
        assert_eq!(camera.open_streams(), 0);
    }
}
