//! Annotated page rendering: detection outlines and labels drawn on the page.
//!
//! The output has the same dimensions as the source page. Every detection
//! gets its quadrilateral outlined and a `"{text} {confidence}"` label drawn
//! on a filled strip just above the box (inside the box when the box touches
//! the top edge). A page with no detections renders unchanged.
//!
//! Labels need a TrueType font. A configured font must load; otherwise common
//! system locations are searched, and if nothing is found boxes are still
//! drawn but labels are skipped.

use crate::config::RunConfig;
use crate::error::PdfOcrError;
use crate::types::{Detection, Point};

use ab_glyph::{FontVec, PxScale};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Outline colours, cycled per detection so neighbouring boxes stay distinguishable.
const BOX_PALETTE: [Rgb<u8>; 6] = [
    Rgb([230, 25, 75]),
    Rgb([60, 180, 75]),
    Rgb([0, 130, 200]),
    Rgb([245, 130, 48]),
    Rgb([145, 30, 180]),
    Rgb([0, 128, 128]),
];

const LABEL_PADDING: i32 = 2;

/// Fonts tried, in order, when no font is configured.
const SYSTEM_FONT_PATHS: [&str; 6] = [
    "LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws detections onto page images.
pub struct Annotator {
    font: Option<FontVec>,
    font_scale: f32,
    box_thickness: u32,
}

impl Annotator {
    pub fn new(font: Option<FontVec>, font_scale: f32, box_thickness: u32) -> Self {
        Self {
            font,
            font_scale,
            box_thickness: box_thickness.max(1),
        }
    }

    /// Build an annotator from the run settings, loading the label font.
    ///
    /// # Errors
    /// [`PdfOcrError::FontLoad`] when `font_path` is set but unusable.
    pub fn from_config(config: &RunConfig) -> Result<Self, PdfOcrError> {
        let font = match &config.font_path {
            Some(path) => {
                let font = load_font(path)?;
                info!("Using label font: {}", path.display());
                Some(font)
            }
            None => system_font(),
        };
        Ok(Self::new(font, config.font_scale, config.box_thickness))
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render `detections` over the image at `image_path`.
    ///
    /// The source file is only read.
    pub fn render(&self, image_path: &Path, detections: &[Detection]) -> Result<RgbImage, PdfOcrError> {
        let mut img = image::open(image_path)
            .map_err(|source| PdfOcrError::ImageRead {
                path: image_path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        for (i, det) in detections.iter().enumerate() {
            let color = BOX_PALETTE[i % BOX_PALETTE.len()];
            draw_quad(&mut img, &det.quad, color, self.box_thickness);
            if let Some(font) = &self.font {
                draw_label(&mut img, det, font, self.font_scale);
            }
        }
        Ok(img)
    }

    /// Render and write the result as JPEG to `output_path`.
    pub fn render_to_file(
        &self,
        image_path: &Path,
        detections: &[Detection],
        output_path: &Path,
    ) -> Result<(), PdfOcrError> {
        let img = self.render(image_path, detections)?;
        img.save_with_format(output_path, ImageFormat::Jpeg)
            .map_err(|source| PdfOcrError::ImageWrite {
                path: output_path.to_path_buf(),
                source,
            })?;
        debug!("Annotated {} → {}", image_path.display(), output_path.display());
        Ok(())
    }
}

fn load_font(path: &Path) -> Result<FontVec, PdfOcrError> {
    let data = std::fs::read(path).map_err(|e| PdfOcrError::FontLoad {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    FontVec::try_from_vec(data).map_err(|_| PdfOcrError::FontLoad {
        path: path.to_path_buf(),
        detail: "not a valid TrueType/OpenType font".to_string(),
    })
}

fn system_font() -> Option<FontVec> {
    for candidate in SYSTEM_FONT_PATHS {
        let path = PathBuf::from(candidate);
        if let Ok(font) = load_font(&path) {
            info!("Loaded system font: {}", path.display());
            return Some(font);
        }
    }
    warn!("No label font found; annotated pages will show boxes without text");
    None
}

/// Pull `p` to within one page size of the canvas.
///
/// Detections far outside the page are still outlined where they cross it,
/// and pixel arithmetic downstream stays well inside `i32`.
fn clamp_to_canvas(p: Point, width: u32, height: u32) -> (f32, f32) {
    let margin = f64::from(width.max(height));
    (
        p.x.clamp(-margin, f64::from(width) + margin) as f32,
        p.y.clamp(-margin, f64::from(height) + margin) as f32,
    )
}

/// Outline the closed quadrilateral `a → b → c → d → a`.
///
/// Thickness is produced by drawing the outline at small pixel offsets.
fn draw_quad(img: &mut RgbImage, quad: &[Point; 4], color: Rgb<u8>, thickness: u32) {
    let (width, height) = img.dimensions();
    let corners = quad.map(|p| clamp_to_canvas(p, width, height));
    let half = (thickness as f32 - 1.0) / 2.0;
    let offsets: Vec<f32> = (0..thickness).map(|t| t as f32 - half).collect();

    for i in 0..corners.len() {
        let (ax, ay) = corners[i];
        let (bx, by) = corners[(i + 1) % corners.len()];
        for &dx in &offsets {
            for &dy in &offsets {
                draw_line_segment_mut(img, (ax + dx, ay + dy), (bx + dx, by + dy), color);
            }
        }
    }
}

fn draw_label(img: &mut RgbImage, det: &Detection, font: &FontVec, font_scale: f32) {
    let label = if det.text.is_empty() {
        format!("{:.3}", det.confidence)
    } else {
        format!("{} {:.3}", det.text, det.confidence)
    };

    let scale = PxScale::from(font_scale);
    let (w, h) = text_size(scale, font, &label);
    let (width, height) = img.dimensions();
    let (min_x, min_y) = det
        .quad
        .iter()
        .map(|&p| clamp_to_canvas(p, width, height))
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), (px, py)| {
            (x.min(px), y.min(py))
        });

    let strip_h = h as i32 + 2 * LABEL_PADDING;
    let left = min_x.round() as i32;
    let above = min_y.round() as i32 - strip_h;
    let top = if above >= 0 { above } else { min_y.round() as i32 };

    let strip = Rect::at(left, top).of_size(w.max(1) + 2 * LABEL_PADDING as u32, strip_h.max(1) as u32);
    draw_filled_rect_mut(img, strip, Rgb([255, 255, 255]));
    draw_text_mut(
        img,
        TEXT_COLOR,
        left + LABEL_PADDING,
        top + LABEL_PADDING,
        scale,
        font,
        &label,
    );
}
