use std::collections::VecDeque;
use std::io::Read;
use std::process::{ChildStdout, Stdio};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{CaptyteError, CaptyteResult};
use crate::media::probe::VideoSourceInfo;
use crate::media::process::FfmpegProcess;
use crate::render::backend::FrameRGBA;

/// Sequential producer of same-sized frames at a fixed frame rate.
pub trait FrameSource {
    fn canvas(&self) -> Canvas;

    fn fps(&self) -> Fps;

    /// Next frame in playback order, `None` once the stream is exhausted.
    fn next_frame(&mut self) -> CaptyteResult<Option<FrameRGBA>>;
}

/// Frames held in memory, for tests and previews.
#[derive(Debug)]
pub struct InMemorySource {
    canvas: Canvas,
    fps: Fps,
    frames: VecDeque<FrameRGBA>,
}

impl InMemorySource {
    pub fn new(canvas: Canvas, fps: Fps, frames: Vec<FrameRGBA>) -> Self {
        Self {
            canvas,
            fps,
            frames: frames.into(),
        }
    }

    /// `count` identical opaque frames of one color.
    pub fn solid(canvas: Canvas, fps: Fps, count: usize, color: [u8; 3]) -> Self {
        let frame = FrameRGBA::solid(canvas, color);
        Self::new(canvas, fps, vec![frame; count])
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for InMemorySource {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fps(&self) -> Fps {
        self.fps
    }

    fn next_frame(&mut self) -> CaptyteResult<Option<FrameRGBA>> {
        Ok(self.frames.pop_front())
    }
}

/// Streams decoded RGBA frames from a spawned `ffmpeg`.
#[derive(Debug)]
pub struct FfmpegSource {
    info: VideoSourceInfo,
    canvas: Canvas,
    decoder: FfmpegProcess,
    stdout: Option<ChildStdout>,
    frames_read: u64,
}

impl FfmpegSource {
    /// Spawn the decoder for a probed video.
    pub fn open(info: VideoSourceInfo) -> CaptyteResult<Self> {
        let canvas = info.canvas()?;
        let mut args: Vec<std::ffi::OsString> = vec!["-v".into(), "error".into(), "-i".into()];
        args.push(info.source_path.clone().into_os_string());
        args.extend(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"].map(Into::into));
        let mut decoder = FfmpegProcess::spawn("decoder", args, Stdio::null(), Stdio::piped())?;
        let stdout = decoder.take_stdout()?;

        tracing::debug!(path = %info.source_path.display(), "ffmpeg decoder started");
        Ok(Self {
            info,
            canvas,
            decoder,
            stdout: Some(stdout),
            frames_read: 0,
        })
    }

    pub fn info(&self) -> &VideoSourceInfo {
        &self.info
    }

    fn finish(&mut self) -> CaptyteResult<()> {
        drop(self.stdout.take());
        self.decoder.wait()?;
        tracing::debug!(frames = self.frames_read, "ffmpeg decoder finished");
        Ok(())
    }
}

impl FrameSource for FfmpegSource {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fps(&self) -> Fps {
        self.info.fps
    }

    fn next_frame(&mut self) -> CaptyteResult<Option<FrameRGBA>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.canvas.rgba8_len()];
        let filled = read_full(stdout, &mut buf)
            .map_err(|e| CaptyteError::media(format!("failed to read from ffmpeg: {e}")))?;
        if filled == 0 {
            self.finish()?;
            return Ok(None);
        }
        if filled < buf.len() {
            return Err(CaptyteError::media(format!(
                "truncated frame from ffmpeg: got {filled} of {} bytes",
                buf.len()
            )));
        }
        self.frames_read += 1;
        FrameRGBA::new(self.canvas.width, self.canvas.height, buf, true).map(Some)
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
#[path = "../../tests/unit/media/source.rs"]
mod tests;
