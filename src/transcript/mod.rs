//! Transcript input and display-unit segmentation.

pub(crate) mod model;
pub(crate) mod segment;
