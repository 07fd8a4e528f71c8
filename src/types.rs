//! Data model shared by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// One recognised text region on one page.
///
/// The quadrilateral is always exactly four points in the detector's winding
/// order: top-left, top-right, bottom-right, bottom-left. The array type makes
/// any other point count unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub quad: [Point; 4],
    /// Recognised string; may be empty.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Detection {
    pub fn new(quad: [Point; 4], text: impl Into<String>, confidence: f64) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }

    /// The eight coordinates in point order: `x1, y1, x2, y2, x3, y3, x4, y4`.
    pub fn flat_coords(&self) -> [f64; 8] {
        let [a, b, c, d] = self.quad;
        [a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y]
    }
}

/// One rasterised page of the source PDF.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based page number parsed from the generated filename.
    pub index: u32,
    pub image_path: PathBuf,
    /// Detections in the order the detector returned them.
    pub detections: Vec<Detection>,
}

impl Page {
    pub fn new(index: u32, image_path: impl Into<PathBuf>) -> Self {
        Self {
            index,
            image_path: image_path.into(),
            detections: Vec::new(),
        }
    }
}
