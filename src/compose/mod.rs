//! Per-frame caption composition.

pub(crate) mod compositor;
