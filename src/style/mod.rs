//! Caption style options and their resolution from template JSON.

pub(crate) mod color;
pub(crate) mod config;
