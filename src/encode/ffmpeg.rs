use std::ffi::OsString;
use std::io::{Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use serde::Serialize;

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ArabsubError, ArabsubResult};
use crate::render::frame::FrameRGBA;

/// Options for [`FfmpegOverlaySink`].
#[derive(Clone, Debug)]
pub struct FfmpegOverlayOpts {
    /// Base video the overlay is composited onto.
    pub base_video: PathBuf,
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// libx264 preset (`ultrafast` .. `veryslow`).
    pub preset: String,
}

impl FfmpegOverlayOpts {
    /// Overlay onto `base_video`, writing `out_path` with the `medium` preset.
    pub fn new(base_video: impl Into<PathBuf>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            base_video: base_video.into(),
            out_path: out_path.into(),
            overwrite: true,
            preset: "medium".to_owned(),
        }
    }

    /// Replace the encoder preset.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }
}

/// Sink that spawns the system `ffmpeg`, streams straight-alpha RGBA overlay frames to stdin and
/// composites them over the base video. Audio of the base video is copied when present.
pub struct FfmpegOverlaySink {
    opts: FfmpegOverlayOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegOverlaySink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegOverlayOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }
}

/// Command-line arguments for one overlay encode, without the program name.
pub fn overlay_args(opts: &FfmpegOverlayOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    let mut push = |s: &str| args.push(OsString::from(s));

    push(if opts.overwrite { "-y" } else { "-n" });
    push("-loglevel");
    push("error");
    push("-i");
    args.push(opts.base_video.clone().into_os_string());

    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = fps_arg(cfg.fps);
    let preset = opts.preset.clone();
    for a in [
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        &size,
        "-r",
        &rate,
        "-i",
        "pipe:0",
        "-filter_complex",
        "[0:v][1:v]overlay=0:0:eof_action=pass[outv]",
        "-map",
        "[outv]",
        "-map",
        "0:a?",
        "-c:a",
        "copy",
        "-c:v",
        "libx264",
        "-preset",
        &preset,
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ] {
        args.push(OsString::from(a));
    }
    args.push(opts.out_path.clone().into_os_string());
    args
}

fn fps_arg(fps: Fps) -> String {
    format!("{}/{}", fps.num, fps.den)
}

impl FrameSink for FfmpegOverlaySink {
    fn begin(&mut self, cfg: SinkConfig) -> ArabsubResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ArabsubError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ArabsubError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ArabsubError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if !self.opts.base_video.is_file() {
            return Err(ArabsubError::validation(format!(
                "base video '{}' does not exist",
                self.opts.base_video.display()
            )));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ArabsubError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(ArabsubError::render(
                "ffmpeg is required for video output, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(overlay_args(&self.opts, &cfg));
        tracing::debug!(?cmd, "spawning ffmpeg");

        let mut child = cmd.spawn().map_err(|e| {
            ArabsubError::render(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ArabsubError::render("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ArabsubError::render("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ArabsubResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ArabsubError::render("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ArabsubError::render(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);
        check_frame_size(cfg, frame)?;

        // ffmpeg's rgba input is straight alpha.
        let straight = frame.to_straight_rgba();

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ArabsubError::render("ffmpeg sink is already finalized"));
        };
        stdin.write_all(&straight).map_err(|e| {
            ArabsubError::render(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> ArabsubResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ArabsubError::render("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            ArabsubError::render(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ArabsubError::render("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ArabsubError::render(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ArabsubError::render(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        tracing::info!(out = %self.opts.out_path.display(), "video written");
        self.cfg = None;
        Ok(())
    }
}

/// Basic metadata about a source video file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VideoInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate of the first video stream.
    pub fps: Fps,
    /// Container duration in seconds.
    pub duration: f64,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

/// Probe source video metadata through `ffprobe`.
#[tracing::instrument(skip_all, fields(path = %source_path.display()))]
pub fn probe_video(source_path: &Path) -> ArabsubResult<VideoInfo> {
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
        .map_err(|e| ArabsubError::validation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ArabsubError::validation(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout)
}

/// Interpret `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_json(bytes: &[u8]) -> ArabsubResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        avg_frame_rate: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| ArabsubError::serde(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| ArabsubError::validation("no video stream found"))?;
    let width = video
        .width
        .ok_or_else(|| ArabsubError::validation("missing video width from ffprobe"))?;
    let height = video
        .height
        .ok_or_else(|| ArabsubError::validation("missing video height from ffprobe"))?;
    let fps = [video.r_frame_rate.as_deref(), video.avg_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(parse_frame_rate)
        .ok_or_else(|| ArabsubError::validation("missing video frame rate from ffprobe"))?;
    let duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ArabsubError::validation("missing video duration from ffprobe"))?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoInfo {
        width,
        height,
        fps,
        duration,
        has_audio,
    })
}

/// Parse an ffprobe rate such as `30000/1001` or `25`. `0/0` yields `None`.
pub fn parse_frame_rate(s: &str) -> Option<Fps> {
    match s.trim().split_once('/') {
        Some((n, d)) => Fps::new(n.trim().parse().ok()?, d.trim().parse().ok()?).ok(),
        None => Fps::from_f64(s.trim().parse().ok()?).ok(),
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ArabsubResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
