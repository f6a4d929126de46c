use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use captyte::{
    AudioInputConfig, CaptionJob, Canvas, Compositor, CpuPainter, DisplayUnit, FfmpegSink,
    FfmpegSinkOpts, FfmpegSource, FrameIndex, FrameRGBA, MonospaceMeasure, SegmentPolicy,
    StyleConfig, TextMeasure, Transcript, decode_video_frame_rgba8, probe_video, render_captions,
    segment_words,
};

#[derive(Parser, Debug)]
#[command(name = "captyte", version, about = "Burn word-synchronized captions into video")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the display units of a transcript as JSON.
    Units(UnitsArgs),
    /// Print the caption layout for one timestamp as JSON.
    Plan(PlanArgs),
    /// Caption a single video frame and write it as PNG.
    Frame(FrameArgs),
    /// Caption a whole video into an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Character-budget lines (`max_line_chars`, `multi_line` from the template).
    Lines,
    /// Sentences split on pauses longer than half a second.
    Sentences,
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Word-timestamped transcript JSON.
    #[arg(long)]
    transcript: PathBuf,

    /// Style template JSON.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Segmentation policy.
    #[arg(long, value_enum, default_value_t = Policy::Lines)]
    policy: Policy,
}

#[derive(Args, Debug)]
struct UnitsArgs {
    #[command(flatten)]
    caption: CaptionArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Timestamp in seconds.
    #[arg(long)]
    time: f64,

    /// Frame width in pixels.
    #[arg(long)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long)]
    height: u32,

    /// Font file; overrides the template's `font_path`.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Source video.
    #[arg(long)]
    video: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file; overrides the template's `font_path`.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Source video.
    #[arg(long)]
    video: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Font file; overrides the template's `font_path`.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Do not copy the source audio into the output.
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Units(args) => cmd_units(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

/// Resolved style plus the display units it segments into.
fn load_captions(args: &CaptionArgs) -> anyhow::Result<(StyleConfig, Vec<DisplayUnit>)> {
    let style = match &args.template {
        Some(path) => StyleConfig::from_path(path)?,
        None => StyleConfig::default(),
    };
    let transcript = Transcript::from_path(&args.transcript)?;
    let policy = match args.policy {
        Policy::Lines => SegmentPolicy::CharBudget {
            max_line_chars: style.max_line_chars,
            multi_line: style.multi_line,
        },
        Policy::Sentences => SegmentPolicy::SilenceGap,
    };
    let units = segment_words(&transcript.flatten_words(), policy);
    tracing::info!(
        words = transcript.word_count(),
        units = units.len(),
        "transcript segmented"
    );
    Ok((style, units))
}

fn font_path(style: &StyleConfig, cli_font: Option<&Path>) -> Option<PathBuf> {
    cli_font
        .map(Path::to_path_buf)
        .or_else(|| style.font_path.clone())
}

fn painter_for(style: &StyleConfig, cli_font: Option<&Path>) -> anyhow::Result<CpuPainter> {
    let path = font_path(style, cli_font)
        .context("a font is required: pass --font or set font_path in the template")?;
    Ok(CpuPainter::from_font_path(&path)?)
}

fn cmd_units(args: UnitsArgs) -> anyhow::Result<()> {
    let (_, units) = load_captions(&args.caption)?;
    println!("{}", serde_json::to_string_pretty(&units)?);
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (style, units) = load_captions(&args.caption)?;
    let canvas = Canvas::new(args.width, args.height)?;
    let mut measure: Box<dyn TextMeasure> = match font_path(&style, args.font.as_deref()) {
        Some(path) => Box::new(CpuPainter::from_font_path(&path)?),
        None => {
            tracing::warn!("no font configured, measuring with a monospace approximation");
            Box::new(MonospaceMeasure::default())
        }
    };
    // Fps only matters for frame indices; plans are addressed by time.
    let mut compositor = Compositor::from_style(units, style, captyte::Fps::new(1, 1)?, canvas);
    let plan = compositor.plan_at(args.time, canvas, measure.as_mut())?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (style, units) = load_captions(&args.caption)?;
    let mut painter = painter_for(&style, args.font.as_deref())?;
    let info = probe_video(&args.video)?;
    let canvas = info.canvas()?;
    let t = info.fps.frames_to_secs(args.frame);

    let data = decode_video_frame_rgba8(&info, t)?;
    let mut frame = FrameRGBA::new(canvas.width, canvas.height, data, true)?;
    let mut compositor = Compositor::from_style(units, style, info.fps, canvas);
    let captioned = compositor.compose_frame(FrameIndex(args.frame), &mut frame, &mut painter)?;
    tracing::info!(frame = args.frame, t, captioned, "frame composed");

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (style, units) = load_captions(&args.caption)?;
    let mut painter = painter_for(&style, args.font.as_deref())?;
    let info = probe_video(&args.video)?;
    let audio = (!args.no_audio && info.has_audio).then(|| AudioInputConfig {
        source_path: info.source_path.clone(),
    });

    let mut source = FfmpegSource::open(info)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        background: [0, 0, 0],
    });
    let job = CaptionJob {
        units,
        style,
        audio,
    };
    let stats = render_captions(job, &mut source, &mut sink, &mut painter)?;

    eprintln!(
        "wrote {} ({} frames, {} captioned)",
        args.out.display(),
        stats.frames_total,
        stats.frames_captioned
    );
    Ok(())
}
