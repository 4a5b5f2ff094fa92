//! Hand-presence detection over a YOLO-style single-class ONNX model.
//!
//! The pipeline only needs a yes/no signal per cropped frame, so the
//! public surface is the narrow [`HandPresence`] trait; landmark or box
//! output is never persisted.

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

/// Model input edge length. Hand models exported from the ultralytics
/// family take square 640x640 RGB input.
const INPUT_SIZE: u32 = 640;

/// Detection thresholds, exposed as configuration rather than baked-in
/// constants.
#[derive(Debug, Clone, Copy)]
pub struct HandConfig {
    /// Minimum candidate score to count as a hand.
    pub min_confidence: f32,
    /// IoU threshold for greedy non-max suppression of duplicates.
    pub nms_threshold: f32,
    /// Upper bound on hands counted per frame.
    pub max_hands: usize,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.45,
            nms_threshold: 0.45,
            max_hands: 2,
        }
    }
}

/// Capability seam used by the crop-and-filter stage: one image in,
/// presence flag out. Tests substitute scripted implementations.
pub trait HandPresence {
    fn detect_hands(&mut self, image: &DynamicImage) -> Result<bool>;
}

/// ONNX hand detector. Construct once and reuse across frames; calls
/// take `&mut self` so an instance is confined to a single worker.
pub struct HandDetector {
    session: Session,
    config: HandConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
    score: f32,
}

impl HandDetector {
    pub fn new(model_path: &Path, config: HandConfig) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)
            .context("Failed to load hand detection model")?;
        log::debug!("{session:?}");
        Ok(Self { session, config })
    }

    fn preprocess(&self, image: &DynamicImage) -> Array4<f32> {
        let rgb = image.to_rgb8();
        let resized = image::imageops::resize(
            &rgb,
            INPUT_SIZE,
            INPUT_SIZE,
            image::imageops::FilterType::Triangle,
        );

        let size = INPUT_SIZE as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] = pixel.0[c] as f32 / 255.0;
            }
        }
        tensor
    }
}

impl HandPresence for HandDetector {
    fn detect_hands(&mut self, image: &DynamicImage) -> Result<bool> {
        let input = self.preprocess(image);
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["images" => input_tensor])
            .context("Hand detection inference failed")?;
        let output: ndarray::ArrayViewD<f32> = outputs["output0"]
            .try_extract_array()
            .context("Failed to extract detection output")?;

        // output0 is [1, 5, N]: cx, cy, w, h, score per candidate.
        let n_det = output.shape()[2];
        let mut candidates = Vec::new();
        for i in 0..n_det {
            let score = output[[0, 4, i]];
            if score < self.config.min_confidence {
                continue;
            }
            let cx = output[[0, 0, i]];
            let cy = output[[0, 1, i]];
            let w = output[[0, 2, i]];
            let h = output[[0, 3, i]];
            candidates.push(Candidate {
                x_min: cx - w / 2.0,
                y_min: cy - h / 2.0,
                x_max: cx + w / 2.0,
                y_max: cy + h / 2.0,
                score,
            });
        }

        let hands = non_max_suppress(candidates, self.config.nms_threshold);
        let count = hands.len().min(self.config.max_hands);
        log::debug!("{count} hand(s) detected");
        Ok(count > 0)
    }
}

fn iou(a: &Candidate, b: &Candidate) -> f32 {
    let ix = (a.x_max.min(b.x_max) - a.x_min.max(b.x_min)).max(0.0);
    let iy = (a.y_max.min(b.y_max) - a.y_min.max(b.y_min)).max(0.0);
    let intersection = ix * iy;
    let area_a = (a.x_max - a.x_min).max(0.0) * (a.y_max - a.y_min).max(0.0);
    let area_b = (b.x_max - b.x_min).max(0.0) * (b.y_max - b.y_min).max(0.0);
    let union = area_a + area_b - intersection;
    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

/// Greedy non-max suppression: keep highest-scoring boxes, drop any
/// later box overlapping a kept one past `iou_threshold`.
fn non_max_suppress(mut candidates: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|k| iou(k, &candidate) < iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x_min: f32, y_min: f32, x_max: f32, y_max: f32, score: f32) -> Candidate {
        Candidate {
            x_min,
            y_min,
            x_max,
            y_max,
            score,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = boxed(0.0, 0.0, 10.0, 10.0, 0.9);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = boxed(0.0, 0.0, 10.0, 10.0, 0.9);
        let b = boxed(20.0, 20.0, 30.0, 30.0, 0.9);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn nms_drops_overlapping_duplicates() {
        let strong = boxed(0.0, 0.0, 10.0, 10.0, 0.9);
        let duplicate = boxed(1.0, 1.0, 11.0, 11.0, 0.6);
        let separate = boxed(50.0, 50.0, 60.0, 60.0, 0.7);
        let kept = non_max_suppress(vec![duplicate, strong, separate], 0.45);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].score, 0.9);
    }

    #[test]
    fn nms_keeps_lightly_overlapping_boxes() {
        let a = boxed(0.0, 0.0, 10.0, 10.0, 0.9);
        let b = boxed(8.0, 8.0, 18.0, 18.0, 0.8);
        let kept = non_max_suppress(vec![a, b], 0.45);
        assert_eq!(kept.len(), 2);
    }
}
