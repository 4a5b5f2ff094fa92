//! Pipeline orchestrator: drives extract + crop/filter per catalog
//! entry, owns the scratch-directory lifecycle, and isolates per-entry
//! failures so one bad video never stops the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dataset_common::catalog;
use dataset_common::summary::RunSummary;
use hand_ort::HandPresence;

use crate::extract::{ExtractOutcome, FrameExtraction};
use crate::filter;

/// Scratch directory name under each gloss directory. A crashed run
/// may leave it behind; the next run overwrites same-named temp frames.
const TEMP_FRAMES_DIR: &str = "temp_frames";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// WLASL-style JSON catalog file.
    pub catalog: PathBuf,
    /// Folder holding source videos as `<video_id>.mp4`.
    pub video_dir: PathBuf,
    /// Output dataset root (`<dataset>/<gloss>/<video_id>_<ordinal>.jpg`).
    pub dataset_dir: PathBuf,
}

/// Runs the whole pipeline. The only fatal failure is an unreadable or
/// unparseable catalog; everything else is logged, counted, and the
/// loop continues with the next entry.
pub fn run(
    config: &PipelineConfig,
    extractor: &mut dyn FrameExtraction,
    detector: &mut dyn HandPresence,
) -> Result<RunSummary> {
    let records = catalog::load_catalog(&config.catalog)
        .with_context(|| format!("Failed to load catalog {:?}", config.catalog))?;
    let instances = catalog::extract_instances(&records);
    log::info!("Catalog yielded {} processable instances", instances.len());

    let mut summary = RunSummary::default();
    for instance in &instances {
        let video_path = config
            .video_dir
            .join(format!("{}.mp4", instance.video_id));
        let gloss_dir = config.dataset_dir.join(&instance.gloss);
        let frames_dir = gloss_dir.join(TEMP_FRAMES_DIR);

        match extractor.extract(
            &video_path,
            &frames_dir,
            &instance.video_id,
            instance.frame_start,
            instance.frame_end,
        ) {
            Ok(ExtractOutcome::MissingVideo) => summary.entries_skipped += 1,
            Ok(ExtractOutcome::FfmpegFailed) => summary.entries_failed += 1,
            Err(e) => {
                log::error!("Extraction failed for {}: {e:#}", instance.video_id);
                summary.entries_failed += 1;
            }
            Ok(ExtractOutcome::Extracted) => {
                match filter::process_frames(
                    &frames_dir,
                    &gloss_dir,
                    &instance.video_id,
                    &instance.bbox,
                    detector,
                ) {
                    Ok(stats) => {
                        log::info!(
                            "Entry {}/{}: {} saved, {} discarded, {} skipped",
                            instance.gloss,
                            instance.video_id,
                            stats.saved,
                            stats.discarded,
                            stats.skipped
                        );
                        summary.record_filtered(stats);
                    }
                    Err(e) => {
                        log::error!(
                            "Filter stage failed for {}/{}: {e:#}",
                            instance.gloss,
                            instance.video_id
                        );
                        summary.entries_failed += 1;
                    }
                }
                // Scratch is removed whether or not any frame survived.
                cleanup_scratch(&frames_dir);
            }
        }
    }

    log::info!("Run complete: {summary}");
    Ok(summary)
}

fn cleanup_scratch(frames_dir: &Path) {
    if let Err(e) = fs::remove_dir_all(frames_dir) {
        log::warn!("Failed to clean up scratch dir {frames_dir:?}: {e}");
    }
}
