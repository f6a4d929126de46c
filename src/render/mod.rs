//! Painting: the painter contract, premultiplied compositing and the CPU painter.

pub(crate) mod backend;
pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod emoji;
