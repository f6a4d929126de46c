//! Encoding sinks. Sinks consume composed frames in playback order.

/// `ffmpeg`-based MP4 sink.
pub(crate) mod ffmpeg;
/// Frame sink trait and the in-memory sink.
pub(crate) mod sink;
