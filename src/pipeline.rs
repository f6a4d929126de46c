use crate::compose::compositor::Compositor;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::media::source::FrameSource;
use crate::render::backend::Painter;
use crate::style::config::StyleConfig;
use crate::transcript::segment::DisplayUnit;

/// Everything a caption run needs besides the frame endpoints.
#[derive(Clone, Debug)]
pub struct CaptionJob {
    /// Display units in playback order.
    pub units: Vec<DisplayUnit>,
    pub style: StyleConfig,
    /// Audio to carry into the output.
    pub audio: Option<AudioInputConfig>,
}

/// Counters reported after a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames read from the source and written to the sink.
    pub frames_total: u64,
    /// Frames that received a caption.
    pub frames_captioned: u64,
    /// Display units available to the run.
    pub units: usize,
}

/// Burn captions into every frame of `source` and write them to `sink`.
///
/// Frames are processed strictly in order and numbered from zero. Any failure aborts the run
/// and is annotated with the index of the failing frame.
#[tracing::instrument(skip_all, fields(units = job.units.len()))]
pub fn render_captions(
    job: CaptionJob,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    painter: &mut dyn Painter,
) -> CaptyteResult<RenderStats> {
    let canvas = source.canvas();
    let canvas = Canvas::new(canvas.width, canvas.height)?;
    let fps = source.fps();
    let fps = Fps::new(fps.num, fps.den)?;

    let mut stats = RenderStats {
        units: job.units.len(),
        ..RenderStats::default()
    };
    let mut compositor = Compositor::from_style(job.units, job.style, fps, canvas);

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        audio: job.audio,
    })?;

    let mut idx = 0u64;
    while let Some(mut frame) = source.next_frame().map_err(|e| e.at_frame(idx))? {
        if frame.canvas() != canvas {
            return Err(CaptyteError::validation(format!(
                "source frame is {}x{}, expected {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            ))
            .at_frame(idx));
        }
        let captioned = compositor
            .compose_frame(FrameIndex(idx), &mut frame, painter)
            .map_err(|e| e.at_frame(idx))?;
        sink.push_frame(FrameIndex(idx), &frame)
            .map_err(|e| e.at_frame(idx))?;

        stats.frames_total += 1;
        if captioned {
            stats.frames_captioned += 1;
        }
        idx += 1;
    }
    sink.end()?;

    tracing::info!(
        frames = stats.frames_total,
        captioned = stats.frames_captioned,
        units = stats.units,
        "caption render finished"
    );
    Ok(stats)
}
