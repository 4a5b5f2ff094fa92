mod extract;
mod filter;
mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use hand_ort::{HandConfig, HandDetector};
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to the WLASL-style JSON catalog.
    catalog: PathBuf,
    /// Folder containing source videos as `<video_id>.mp4`.
    videos: PathBuf,
    /// Output dataset folder; surviving frames land in one
    /// subdirectory per gloss.
    dataset: PathBuf,
    /// Hand detection onnx model file to use.
    #[arg(long, short, default_value = "_models/hand_yolov8n.onnx")]
    model: PathBuf,
    /// Confidence threshold for hand detections (0.0-1.0).
    #[arg(long, default_value = "0.45")]
    min_confidence: f32,
    /// NMS IoU threshold for removing duplicate detections (0.0-1.0).
    #[arg(long, default_value = "0.45")]
    nms_threshold: f32,
    /// Upper bound on hands counted per frame.
    #[arg(long, default_value = "2")]
    max_hands: usize,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,wlasl_prep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let hand_config = HandConfig {
        min_confidence: args.min_confidence,
        nms_threshold: args.nms_threshold,
        max_hands: args.max_hands,
    };
    let mut detector = HandDetector::new(&args.model, hand_config)?;
    log::info!("Prepared hand detector with model: {:?}", args.model);
    log::info!(
        "Detection thresholds: confidence={:.2}, nms={:.2}, max hands={}",
        hand_config.min_confidence,
        hand_config.nms_threshold,
        hand_config.max_hands
    );

    let config = pipeline::PipelineConfig {
        catalog: args.catalog,
        video_dir: args.videos,
        dataset_dir: args.dataset,
    };
    let summary = pipeline::run(&config, &mut extract::FfmpegExtractor, &mut detector)?;
    log::info!("Dataset written to {:?} ({summary})", config.dataset_dir);

    Ok(())
}
