use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Stdio};

use anyhow::Context as _;

use crate::encode::sink::{FrameGate, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::media::process::{FfmpegProcess, tool_on_path};
use crate::render::backend::FrameRGBA;
use crate::render::composite::flatten_onto_background;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Opaque color shown through transparent frame pixels.
    pub background: [u8; 3],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: [0, 0, 0],
        }
    }
}

/// Encodes captioned frames to H.264 MP4 through the system `ffmpeg`, optionally remuxing the
/// audio named in [`SinkConfig::audio`].
#[derive(Debug)]
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    gate: FrameGate,
    encoder: Option<(FfmpegProcess, ChildStdin)>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            gate: FrameGate::default(),
            encoder: None,
            opaque: Vec::new(),
        }
    }
}

impl FrameSink for FfmpegSink {
    #[tracing::instrument(level = "debug", skip_all, fields(out = %self.opts.out_path.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> CaptyteResult<()> {
        let canvas = cfg.canvas()?;
        if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
            return Err(CaptyteError::validation(format!(
                "yuv420p output needs even dimensions, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        prepare_output(&self.opts.out_path, self.opts.overwrite)?;
        if !is_ffmpeg_on_path() {
            return Err(CaptyteError::media("ffmpeg was not found on PATH"));
        }

        let args = encode_args(&cfg, &self.opts);
        let mut encoder = FfmpegProcess::spawn("encoder", args, Stdio::piped(), Stdio::null())?;
        let stdin = encoder.take_stdin()?;
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            audio = cfg.audio.is_some(),
            "encoder started"
        );
        self.opaque = vec![0; canvas.rgba8_len()];
        self.encoder = Some((encoder, stdin));
        self.gate.open(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CaptyteResult<()> {
        self.gate.admit("ffmpeg", idx, frame)?;
        let Some((_, stdin)) = self.encoder.as_mut() else {
            return Err(CaptyteError::media("ffmpeg sink has no running encoder"));
        };
        flatten_onto_background(&mut self.opaque, &frame.data, self.opts.background)?;
        stdin
            .write_all(&self.opaque)
            .map_err(|e| CaptyteError::media(format!("failed to write frame {}: {e}", idx.0)))
    }

    fn end(&mut self) -> CaptyteResult<()> {
        self.gate
            .close()
            .ok_or_else(|| CaptyteError::media("ffmpeg sink not started"))?;
        let Some((mut encoder, stdin)) = self.encoder.take() else {
            return Ok(());
        };
        // Closing stdin lets ffmpeg flush and exit.
        drop(stdin);
        encoder.wait()
    }
}

/// Full `ffmpeg` argument list for one encode.
fn encode_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args = Vec::from(
        [
            if opts.overwrite { "-y" } else { "-n" },
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .map(String::from),
    );
    args.push(format!("{}x{}", cfg.width, cfg.height));
    // `-r` before `-i` declares the raw input rate.
    args.extend(["-r".to_string(), format!("{}/{}", cfg.fps.num, cfg.fps.den)]);
    args.extend(["-i", "pipe:0"].map(String::from));

    match &cfg.audio {
        Some(audio) => {
            args.push("-i".to_string());
            args.push(audio.source_path.to_string_lossy().into_owned());
            // `1:a:0?` keeps sources without an audio stream encodable.
            args.extend(["-map", "0:v:0", "-map", "1:a:0?"].map(String::from));
        }
        None => args.push("-an".to_string()),
    }
    args.extend(["-c:v", "libx264", "-pix_fmt", "yuv420p"].map(String::from));
    if cfg.audio.is_some() {
        args.extend(["-c:a", "aac", "-shortest"].map(String::from));
    }
    args.extend(["-movflags", "+faststart"].map(String::from));
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

/// Refuse an existing output unless `overwrite`, and create the parent directory.
fn prepare_output(out_path: &Path, overwrite: bool) -> CaptyteResult<()> {
    if !overwrite && out_path.exists() {
        return Err(CaptyteError::validation(format!(
            "output file '{}' already exists (pass --overwrite to replace it)",
            out_path.display()
        )));
    }
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    tool_on_path("ffmpeg")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
