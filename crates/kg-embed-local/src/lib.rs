pub mod encoder;
pub mod pooling;
pub mod source;

pub use encoder::{E5_LARGE_DIMENSION, E5Encoder};
pub use source::{ModelFiles, ModelSource};
