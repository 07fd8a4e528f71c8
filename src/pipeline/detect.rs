//! Text detection and recognition on a single page image.
//!
//! The recognition model is a black box behind [`TextDetector`]: given an
//! image, return `(quadrilateral, text, confidence)` tuples in reading order.
//! Any engine satisfying that contract can be plugged in; tests use a fake.
//!
//! [`CommandDetector`] is the bundled engine. It runs an external program
//! once per page and reads the detector's native per-page result from the
//! last non-empty line of stdout:
//!
//! ```text
//! null                                                   (no text on page)
//! [[[[10,20],[50,20],[50,60],[10,60]], ["Hello", 0.93]], ...]
//! ```
//!
//! Unlike the rasterizer, a failing detector is fatal for the run: a page
//! with silently missing text is worse than no report at all.

use crate::config::DetectorSettings;
use crate::error::PdfOcrError;
use crate::pipeline::process::{ProcessRunner, SystemProcessRunner};
use crate::types::{Detection, Point};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs text detection + recognition on one image.
pub trait TextDetector: Send + Sync {
    /// Detect text in the image at `image`.
    ///
    /// Returns an empty vector for a page without text. Any model failure is
    /// returned as an error.
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, PdfOcrError>;
}

/// [`TextDetector`] that shells out to a recognition program.
///
/// Invocation: `program --lang <lang> --use-angle-cls <bool> [extra_args..] <image>`.
pub struct CommandDetector {
    settings: DetectorSettings,
    runner: Arc<dyn ProcessRunner>,
}

impl CommandDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self::with_runner(settings, Arc::new(SystemProcessRunner))
    }

    pub fn with_runner(settings: DetectorSettings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { settings, runner }
    }

    fn args(&self, image: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--lang".into(),
            self.settings.lang.clone().into(),
            "--use-angle-cls".into(),
            self.settings.use_angle_cls.to_string().into(),
        ];
        args.extend(self.settings.extra_args.iter().map(OsString::from));
        args.push(image.as_os_str().to_os_string());
        args
    }
}

impl TextDetector for CommandDetector {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>, PdfOcrError> {
        let program = &self.settings.program;
        let result = self
            .runner
            .run(program, &self.args(image))
            .map_err(|source| PdfOcrError::ToolUnavailable {
                program: program.clone(),
                source,
            })?;

        if !result.success {
            return Err(PdfOcrError::DetectionFailed {
                image: image.to_path_buf(),
                detail: format!(
                    "{} exited with {:?}: {}",
                    program,
                    result.exit_code,
                    result.combined_output()
                ),
            });
        }

        let detections = parse_detections(&result.stdout).map_err(|detail| {
            PdfOcrError::MalformedDetections {
                image: image.to_path_buf(),
                detail,
            }
        })?;
        debug!("{}: {} detections", image.display(), detections.len());
        Ok(detections)
    }
}

/// One line of the detector's native output: `[[[x, y] ×4], [text, score]]`.
#[derive(Deserialize)]
struct RawLine(Vec<[f64; 2]>, (String, f64));

/// Parse the detector's stdout into detections.
///
/// Only the last non-empty line is read, so engines that print progress
/// chatter before their result still work.
pub fn parse_detections(stdout: &str) -> Result<Vec<Detection>, String> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| "detector printed nothing".to_string())?;

    let raw: Option<Vec<RawLine>> =
        serde_json::from_str(line).map_err(|e| format!("invalid JSON result: {e}"))?;

    raw.unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, RawLine(points, (text, confidence)))| {
            let quad: [Point; 4] = match points.as_slice() {
                [a, b, c, d] => [(*a).into(), (*b).into(), (*c).into(), (*d).into()],
                _ => {
                    return Err(format!(
                        "detection {i}: expected 4 points, got {}",
                        points.len()
                    ))
                }
            };
            if quad.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return Err(format!("detection {i}: non-finite coordinate"));
            }
            if !(0.0..=1.0).contains(&confidence) {
                return Err(format!(
                    "detection {i}: confidence {confidence} outside [0, 1]"
                ));
            }
            Ok(Detection::new(quad, text, confidence))
        })
        .collect()
}
