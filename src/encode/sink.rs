use std::path::PathBuf;

use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Audio to carry over into the output, if any.
    pub audio: Option<AudioInputConfig>,
}

impl SinkConfig {
    /// Output size as a validated canvas.
    pub fn canvas(&self) -> CaptyteResult<Canvas> {
        Canvas::new(self.width, self.height)
    }
}

/// Audio source for sinks that can mux audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioInputConfig {
    /// Media file whose first audio stream is copied into the output.
    pub source_path: PathBuf,
}

/// Sink contract for consuming composed frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CaptyteResult<()>;
    /// Push one frame in strictly increasing playback order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CaptyteResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> CaptyteResult<()>;
}

/// Admission checks every sink applies to pushed frames: started, strictly increasing
/// indices, and the configured size.
#[derive(Debug, Default)]
pub(crate) struct FrameGate {
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
}

impl FrameGate {
    pub(crate) fn open(&mut self, cfg: SinkConfig) {
        self.cfg = Some(cfg);
        self.last = None;
    }

    pub(crate) fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Stop admitting frames.
    pub(crate) fn close(&mut self) -> Option<SinkConfig> {
        self.last = None;
        self.cfg.take()
    }

    /// Accept `frame` as index `idx`, or explain why `sink` cannot take it.
    pub(crate) fn admit(
        &mut self,
        sink: &str,
        idx: FrameIndex,
        frame: &FrameRGBA,
    ) -> CaptyteResult<&SinkConfig> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(CaptyteError::media(format!("{sink} sink not started")));
        };
        if let Some(last) = self.last
            && idx <= last
        {
            return Err(CaptyteError::media(format!(
                "{sink} sink received frame {} after frame {}",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CaptyteError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last = Some(idx);
        Ok(cfg)
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    gate: FrameGate,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.gate.config()
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CaptyteResult<()> {
        self.gate.open(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CaptyteResult<()> {
        self.gate.admit("in-memory", idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CaptyteResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
