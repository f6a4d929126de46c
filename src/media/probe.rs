use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{CaptyteError, CaptyteResult};

/// Stream facts of a source video.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// Container duration, `0.0` when unknown.
    pub duration_sec: f64,
    pub has_audio: bool,
}

impl VideoSourceInfo {
    pub fn canvas(&self) -> CaptyteResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Estimated number of frames from duration and fps.
    pub fn estimated_frames(&self) -> u64 {
        self.fps.secs_to_frames_floor(self.duration_sec)
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Inspect `source_path` with `ffprobe`.
#[tracing::instrument(level = "debug")]
pub fn probe_video(source_path: &Path) -> CaptyteResult<VideoSourceInfo> {
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| CaptyteError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CaptyteError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    let info = parse_probe_json(source_path, &out.stdout)?;
    tracing::debug!(
        width = info.width,
        height = info.height,
        fps = info.fps.as_f64(),
        has_audio = info.has_audio,
        "probed video"
    );
    Ok(info)
}

fn parse_probe_json(source_path: &Path, json: &[u8]) -> CaptyteResult<VideoSourceInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| CaptyteError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| CaptyteError::media("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| CaptyteError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| CaptyteError::media("missing video height from ffprobe"))?;
    let fps = Fps::parse_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .map_err(|e| CaptyteError::media(format!("invalid video r_frame_rate: {e}")))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps,
        duration_sec,
        has_audio,
    })
}

/// Decode the single frame on screen at `time_sec`.
#[tracing::instrument(level = "debug", skip(source), fields(path = %source.source_path.display()))]
pub fn decode_video_frame_rgba8(source: &VideoSourceInfo, time_sec: f64) -> CaptyteResult<Vec<u8>> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{:.9}", time_sec.max(0.0))])
        .arg("-i")
        .arg(&source.source_path)
        .args([
            "-frames:v",
            "1",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ])
        .output()
        .map_err(|e| CaptyteError::media(format!("failed to run ffmpeg for video decode: {e}")))?;
    if !out.status.success() {
        return Err(CaptyteError::media(format!(
            "ffmpeg video decode failed for '{}': {}",
            source.source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = source.canvas()?.rgba8_len();
    if out.stdout.len() < expected_len {
        return Err(CaptyteError::media(format!(
            "ffmpeg returned no video frame at {time_sec:.3}s for '{}'",
            source.source_path.display()
        )));
    }
    let mut frame = out.stdout;
    frame.truncate(expected_len);
    Ok(frame)
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    crate::media::process::tool_on_path("ffprobe")
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
