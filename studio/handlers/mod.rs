pub mod page;
pub mod predict;
pub mod source;
pub mod status;
