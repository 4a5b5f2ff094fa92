//! Crop-and-filter stage: crop each extracted frame to the signer's
//! bounding box, keep it only if a hand pose is detectable, and write
//! survivors into the gloss output directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dataset_common::crop::{self, Bbox};
use dataset_common::naming;
use dataset_common::summary::FilterStats;
use hand_ort::HandPresence;
use image::{DynamicImage, GenericImageView};

/// Processes every frame file in `frames_dir` in filename order.
///
/// All per-frame failures (unreadable image, degenerate crop, detector
/// error, unparseable filename) are logged and counted as skips; they
/// never abort the entry. Only filesystem errors around the directory
/// itself or the output write propagate to the orchestrator.
pub fn process_frames(
    frames_dir: &Path,
    gloss_dir: &Path,
    video_id: &str,
    bbox: &Bbox,
    detector: &mut dyn HandPresence,
) -> Result<FilterStats> {
    let mut frame_files: Vec<_> = fs::read_dir(frames_dir)
        .with_context(|| format!("Failed to list frames dir {frames_dir:?}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    // Lexicographic order equals ordinal order given the fixed-width
    // zero-padded filenames.
    frame_files.sort();

    fs::create_dir_all(gloss_dir)
        .with_context(|| format!("Failed to create gloss dir {gloss_dir:?}"))?;

    let mut stats = FilterStats::default();
    for frame_path in &frame_files {
        let image = match image::open(frame_path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not read frame {frame_path:?}: {e}");
                stats.skipped += 1;
                continue;
            }
        };

        let (width, height) = image.dimensions();
        let Some(rect) = crop::crop_rect(bbox, width, height) else {
            log::warn!("Degenerate crop for frame {frame_path:?} with bbox {bbox:?}");
            stats.skipped += 1;
            continue;
        };
        let cropped = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
        // The detector expects RGB channel order.
        let rgb = DynamicImage::ImageRgb8(cropped.to_rgb8());

        let has_hand = match detector.detect_hands(&rgb) {
            Ok(has_hand) => has_hand,
            Err(e) => {
                log::warn!("Hand detection failed on {frame_path:?}: {e:#}");
                stats.skipped += 1;
                continue;
            }
        };
        if !has_hand {
            log::debug!("No hand detected in {frame_path:?}, discarding");
            stats.discarded += 1;
            continue;
        }

        let ordinal = frame_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(naming::parse_ordinal);
        let Some(ordinal) = ordinal else {
            log::warn!("Could not parse frame ordinal from {frame_path:?}");
            stats.skipped += 1;
            continue;
        };

        let out_path = gloss_dir.join(naming::output_frame_name(video_id, ordinal));
        rgb.save(&out_path)
            .with_context(|| format!("Failed to save frame {out_path:?}"))?;
        log::info!("Saved frame: {out_path:?}");
        stats.saved += 1;
    }

    Ok(stats)
}
