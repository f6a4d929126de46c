//! Captyte burns word-synchronized captions into video frames.
//!
//! A run turns a timestamped transcript into display units, selects the active unit for every
//! frame, lays it out with the resolved style and paints it over the frame:
//!
//! - Parse a [`Transcript`] and resolve a [`StyleConfig`] from a template
//! - Group words into [`DisplayUnit`]s with [`segment_words`]
//! - Stream frames from a [`FrameSource`] through [`render_captions`] into a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod compose;
pub(crate) mod encode;
pub(crate) mod layout;
pub(crate) mod media;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod style;
pub(crate) mod timeline;
pub(crate) mod transcript;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8Premul};
pub use crate::foundation::error::{CaptyteError, CaptyteResult};

pub use crate::compose::compositor::Compositor;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::measure::{MonospaceMeasure, TextExtent, TextMeasure, font_px};
pub use crate::layout::plan::{
    BoxFill, EmojiPlacement, LayoutEnv, LayoutPlan, LinePlan, TextStyle, WordPlan, layout,
};
pub use crate::media::probe::{
    VideoSourceInfo, decode_video_frame_rgba8, is_ffprobe_on_path, probe_video,
};
pub use crate::media::source::{FfmpegSource, FrameSource, InMemorySource};
pub use crate::pipeline::{CaptionJob, RenderStats, render_captions};
pub use crate::render::backend::{FrameRGBA, Painter, TextDraw, TextPass};
pub use crate::render::cpu::CpuPainter;
pub use crate::render::emoji::EmojiImage;
pub use crate::style::color::Rgba8;
pub use crate::style::config::{EmojiPosition, StyleConfig, TextAlignment, TextCase};
pub use crate::timeline::highlight::HighlightState;
pub use crate::timeline::select::{Timeline, active_unit, active_word};
pub use crate::transcript::model::{Transcript, TranscriptSegment, Word};
pub use crate::transcript::segment::{DisplayUnit, SegmentPolicy, segment_words};
