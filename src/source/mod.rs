pub mod visual_source;

pub use visual_source::{Frame, ImageOrigin, SourceError, VisualSource};
