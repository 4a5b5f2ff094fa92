//! Frame-range extraction through the external `ffmpeg` binary.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use dataset_common::naming;

/// Entry-level outcome of one extraction attempt. Both non-`Extracted`
/// variants are recoverable: the orchestrator logs, counts, and moves
/// on to the next catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    Extracted,
    MissingVideo,
    FfmpegFailed,
}

/// Capability seam for frame extraction, mirroring the detector's
/// `HandPresence` seam: the orchestrator only needs "materialize this
/// frame range into this directory", so tests can script it without an
/// ffmpeg binary on the path.
pub trait FrameExtraction {
    fn extract(
        &mut self,
        video_path: &Path,
        frames_dir: &Path,
        video_id: &str,
        frame_start: i64,
        frame_end: Option<i64>,
    ) -> Result<ExtractOutcome>;
}

/// Production extractor: delegates to the external `ffmpeg` binary.
pub struct FfmpegExtractor;

impl FrameExtraction for FfmpegExtractor {
    fn extract(
        &mut self,
        video_path: &Path,
        frames_dir: &Path,
        video_id: &str,
        frame_start: i64,
        frame_end: Option<i64>,
    ) -> Result<ExtractOutcome> {
        extract_frames(video_path, frames_dir, video_id, frame_start, frame_end)
    }
}

/// Materializes the inclusive `[frame_start, frame_end]` range of
/// `video_path` as numbered JPEG files in `frames_dir`.
///
/// Selection happens in zero-based decode order (`n` in the ffmpeg
/// filter); `frame_end = None` extracts through the last frame. Output
/// files are numbered from 1 in selection order, which is what the
/// filter stage later parses back out of the filenames.
pub fn extract_frames(
    video_path: &Path,
    frames_dir: &Path,
    video_id: &str,
    frame_start: i64,
    frame_end: Option<i64>,
) -> Result<ExtractOutcome> {
    if !video_path.exists() {
        log::warn!("Video file does not exist: {video_path:?}");
        return Ok(ExtractOutcome::MissingVideo);
    }

    std::fs::create_dir_all(frames_dir)
        .with_context(|| format!("Failed to create frames dir {frames_dir:?}"))?;

    let end = match frame_end {
        Some(end) => end.to_string(),
        // "n" in the filter expression means the last decoded frame.
        None => "n".to_string(),
    };
    let select = format!("select='between(n,{frame_start},{end})'");
    let pattern = frames_dir.join(naming::temp_frame_pattern(video_id));

    log::info!(
        "Running ffmpeg for {video_id}: -i {video_path:?} -vf {select} -vsync vfr {pattern:?}"
    );

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-nostdin"])
        .arg("-i")
        .arg(video_path)
        .args(["-vf", &select])
        .args(["-vsync", "vfr"])
        .arg("-y")
        .arg(&pattern)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .context("Failed to launch ffmpeg")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!(
            "ffmpeg failed for {video_id} (status {:?}): {}",
            output.status.code(),
            stderr.trim()
        );
        return Ok(ExtractOutcome::FfmpegFailed);
    }

    log::debug!("Frames extracted to {frames_dir:?}");
    Ok(ExtractOutcome::Extracted)
}
