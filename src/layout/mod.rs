//! Caption geometry: box, per-word positions, highlight flags and emoji placement.

pub(crate) mod measure;
pub(crate) mod plan;
