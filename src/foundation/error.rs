/// Convenience result type used across captyte.
pub type CaptyteResult<T> = Result<T, CaptyteError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Variants name the stage that failed so a CLI run can report "parse", "layout", "paint" or
/// "media" together with the frame index ([`CaptyteError::AtFrame`]).
#[derive(thiserror::Error, Debug)]
pub enum CaptyteError {
    /// Malformed transcript or template input.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid job parameters (frame rate, canvas, sink options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while laying out a display unit.
    #[error("layout error: {0}")]
    Layout(String),

    /// Errors while painting the overlay (bad colors, font or image data).
    #[error("paint error: {0}")]
    Paint(String),

    /// Frame source/sink failures, including the external `ffmpeg` processes.
    #[error("media error: {0}")]
    Media(String),

    /// A stage error annotated with the frame it happened on.
    #[error("frame {frame}: {source}")]
    AtFrame {
        /// Zero-based frame index.
        frame: u64,
        /// The underlying stage error.
        #[source]
        source: Box<CaptyteError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptyteError {
    /// Build a [`CaptyteError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`CaptyteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptyteError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`CaptyteError::Paint`] value.
    pub fn paint(msg: impl Into<String>) -> Self {
        Self::Paint(msg.into())
    }

    /// Build a [`CaptyteError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Attach a frame index. Already-annotated errors are returned unchanged.
    pub fn at_frame(self, frame: u64) -> Self {
        match self {
            Self::AtFrame { .. } => self,
            other => Self::AtFrame {
                frame,
                source: Box::new(other),
            },
        }
    }

    /// Frame index attached by [`CaptyteError::at_frame`], if any.
    pub fn frame(&self) -> Option<u64> {
        match self {
            Self::AtFrame { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
