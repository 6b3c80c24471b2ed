pub mod label_set;

pub use label_set::{LabelError, LabelSet};
