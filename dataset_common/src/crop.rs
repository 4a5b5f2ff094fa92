//! Bounding-box crop geometry.
//!
//! Catalog bounding boxes are given in source-frame pixel space and may
//! extend past the image on any side; the crop rectangle is clamped to
//! the image, and a zero-area result is reported as degenerate rather
//! than an error.

/// Axis-aligned bounding box in source-frame pixel coordinates,
/// top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bbox {
    pub x_min: i64,
    pub y_min: i64,
    pub width: i64,
    pub height: i64,
}

impl Bbox {
    pub fn new(x_min: i64, y_min: i64, width: i64, height: i64) -> Self {
        Self {
            x_min,
            y_min,
            width,
            height,
        }
    }

    /// Builds a bbox from the catalog's `[x_min, y_min, width, height]`
    /// array form. Anything other than exactly 4 values is rejected.
    pub fn from_slice(values: &[i64]) -> Option<Self> {
        match values {
            &[x_min, y_min, width, height] => Some(Self::new(x_min, y_min, width, height)),
            _ => None,
        }
    }
}

/// Crop rectangle fully contained in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Clamps `bbox` against an `img_width` x `img_height` image.
///
/// Negative origins are clamped to 0 and the far edges to the image
/// bounds. Returns `None` when the clamped rectangle has zero area
/// (degenerate crop), which callers treat as a per-frame skip.
pub fn crop_rect(bbox: &Bbox, img_width: u32, img_height: u32) -> Option<CropRect> {
    let x_min = bbox.x_min.clamp(0, img_width as i64);
    let y_min = bbox.y_min.clamp(0, img_height as i64);
    let x_max = (bbox.x_min + bbox.width).clamp(0, img_width as i64);
    let y_max = (bbox.y_min + bbox.height).clamp(0, img_height as i64);

    if x_max <= x_min || y_max <= y_min {
        return None;
    }

    Some(CropRect {
        x: x_min as u32,
        y: y_min as u32,
        width: (x_max - x_min) as u32,
        height: (y_max - y_min) as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_image_bbox_crops_to_full_image() {
        let rect = crop_rect(&Bbox::new(0, 0, 640, 480), 640, 480).unwrap();
        assert_eq!(
            rect,
            CropRect {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn oversized_bbox_is_clamped_to_image_bounds() {
        let rect = crop_rect(&Bbox::new(100, 100, 10_000, 10_000), 640, 480).unwrap();
        assert_eq!(rect.x + rect.width, 640);
        assert_eq!(rect.y + rect.height, 480);
    }

    #[test]
    fn negative_origin_is_clamped_to_zero() {
        let rect = crop_rect(&Bbox::new(-50, -20, 100, 100), 640, 480).unwrap();
        assert_eq!((rect.x, rect.y), (0, 0));
        assert_eq!((rect.width, rect.height), (50, 80));
    }

    #[test]
    fn zero_area_crop_is_degenerate() {
        assert_eq!(crop_rect(&Bbox::new(10, 10, 0, 50), 640, 480), None);
        // bbox entirely left of the image
        assert_eq!(crop_rect(&Bbox::new(-200, 10, 100, 50), 640, 480), None);
        // bbox entirely past the right edge
        assert_eq!(crop_rect(&Bbox::new(700, 10, 100, 50), 640, 480), None);
    }

    #[test]
    fn bbox_from_slice_requires_four_values() {
        assert!(Bbox::from_slice(&[1, 2, 3, 4]).is_some());
        assert!(Bbox::from_slice(&[1, 2, 3]).is_none());
        assert!(Bbox::from_slice(&[1, 2, 3, 4, 5]).is_none());
    }
}
