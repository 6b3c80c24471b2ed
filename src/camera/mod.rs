pub mod camera;
pub mod still;

pub use camera::{Camera, CameraError, CameraGuard, CameraStream};
pub use still::StillCamera;
