//! Video input through the system `ffprobe` / `ffmpeg` binaries.

pub(crate) mod probe;
pub(crate) mod process;
pub(crate) mod source;
