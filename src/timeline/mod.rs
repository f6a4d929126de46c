//! Time → active unit / active word selection and per-unit highlight tracking.

pub(crate) mod highlight;
pub(crate) mod select;
