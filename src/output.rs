//! Results of a pipeline run.

use crate::pipeline::process::ProcessResult;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a finished run produced.
///
/// `pdf_path` is where the assembled PDF was requested; check
/// [`OcrOutput::pdf_exists`] since the assembler's failures are not fatal.
#[derive(Debug, Clone, Serialize)]
pub struct OcrOutput {
    pub annotated_dir: PathBuf,
    pub report_path: PathBuf,
    pub pdf_path: PathBuf,
    /// One entry per processed page, ascending page order.
    pub pages: Vec<PageSummary>,
    pub rasterize: ProcessResult,
    /// `None` when there were no pages to assemble.
    pub assemble: Option<ProcessResult>,
    pub stats: RunStats,
}

impl OcrOutput {
    pub fn pdf_exists(&self) -> bool {
        self.pdf_path.is_file()
    }
}

/// Per-page outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub index: u32,
    pub image_path: PathBuf,
    pub annotated_path: PathBuf,
    pub detections: usize,
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub page_count: usize,
    pub detection_count: usize,
    pub total_duration_ms: u64,
}
