//! Pipeline controller: one input PDF in, three artifacts out.
//!
//! The run is a straight line with no branching or revisited states:
//!
//! ```text
//! INIT → RESET_WORKSPACE → RASTERIZE → (per page: DETECT → REPORT_ROW → ANNOTATE) → ASSEMBLE → DONE
//! ```
//!
//! Pages are processed one at a time in ascending page-number order. A failing
//! page aborts the run; external-tool exits are logged and tolerated (see
//! [`crate::error`]).
//!
//! Concurrent runs against the same `output_dir` are unsafe: the reset step of
//! one run deletes files another run is still using. Serialise runs, or give
//! each run its own output directory.

use crate::config::{OutputLayout, RunConfig};
use crate::error::PdfOcrError;
use crate::output::{OcrOutput, PageSummary, RunStats};
use crate::pipeline::annotate::Annotator;
use crate::pipeline::detect::{CommandDetector, TextDetector};
use crate::pipeline::process::{ProcessRunner, SystemProcessRunner};
use crate::pipeline::report::ReportBuilder;
use crate::pipeline::{assemble, input, rasterize, workspace};
use crate::types::Page;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Run the full pipeline on `input_pdf` with the system's external tools.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(OcrOutput)` once every page has been detected, reported and
/// annotated, even if the rasterizer or assembler exited non-zero (check
/// `output.rasterize`, `output.assemble` and [`OcrOutput::pdf_exists`]).
///
/// # Errors
/// Any configuration, input, detection or filesystem failure.
pub fn convert(input_pdf: impl AsRef<Path>, config: &RunConfig) -> Result<OcrOutput, PdfOcrError> {
    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner);
    let detector = CommandDetector::with_runner(config.detector.clone(), Arc::clone(&runner));
    let annotator = Annotator::from_config(config)?;
    convert_with(input_pdf, config, runner.as_ref(), &detector, &annotator)
}

/// Run the full pipeline with injected collaborators.
///
/// `runner` executes the rasterizer and the assembler; `detector` is the
/// recognition model. Tests substitute fakes for both.
pub fn convert_with(
    input_pdf: impl AsRef<Path>,
    config: &RunConfig,
    runner: &dyn ProcessRunner,
    detector: &dyn TextDetector,
    annotator: &Annotator,
) -> Result<OcrOutput, PdfOcrError> {
    let total_start = Instant::now();
    config.validate()?;

    // ── INIT ─────────────────────────────────────────────────────────────
    let pdf_path = input::resolve_input(input_pdf.as_ref())?;
    let layout = config.layout(&pdf_path);
    info!("Starting OCR run: {}", pdf_path.display());
    debug!("Output layout: {:?}", layout);

    // ── RESET_WORKSPACE ──────────────────────────────────────────────────
    workspace::reset_dir(&layout.images_dir)?;
    workspace::reset_dir(&layout.annotated_dir)?;

    // ── RASTERIZE ────────────────────────────────────────────────────────
    let raster_result =
        rasterize::rasterize(runner, &config.rasterizer, &pdf_path, &layout.image_prefix)?;
    let pages = rasterize::discover_pages(&layout.images_dir, &config.image_file_prefix)?;
    let total_pages = pages.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total_pages);
    }

    // ── Per page: DETECT → REPORT_ROW → ANNOTATE ─────────────────────────
    let mut report = ReportBuilder::open(&layout.report_path, config.text_column_width)?;
    let mut summaries = Vec::with_capacity(total_pages);

    for page in pages {
        let index = page.index;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(index, total_pages);
        }

        match process_page(page, detector, &mut report, annotator, &layout) {
            Ok(summary) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(index, total_pages, summary.detections);
                }
                summaries.push(summary);
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(index, total_pages, &e.to_string());
                }
                return Err(e);
            }
        }
    }

    let report_path = report.close()?;

    // ── ASSEMBLE ─────────────────────────────────────────────────────────
    let assemble_result =
        assemble::assemble(runner, &config.assembler, &layout.annotated_dir, &layout.pdf_path)?;

    // ── DONE ─────────────────────────────────────────────────────────────
    let detection_count = summaries.iter().map(|s| s.detections).sum();
    let stats = RunStats {
        page_count: summaries.len(),
        detection_count,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(stats.page_count, stats.detection_count);
    }

    info!(
        "OCR run complete: {} pages, {} detections, {}ms",
        stats.page_count, stats.detection_count, stats.total_duration_ms
    );

    Ok(OcrOutput {
        annotated_dir: layout.annotated_dir,
        report_path,
        pdf_path: layout.pdf_path,
        pages: summaries,
        rasterize: raster_result,
        assemble: assemble_result,
        stats,
    })
}

/// DETECT → REPORT_ROW → ANNOTATE for one page.
fn process_page(
    mut page: Page,
    detector: &dyn TextDetector,
    report: &mut ReportBuilder,
    annotator: &Annotator,
    layout: &OutputLayout,
) -> Result<PageSummary, PdfOcrError> {
    debug!("Page {}: detecting {}", page.index, page.image_path.display());
    page.detections = detector.detect(&page.image_path)?;

    report.add_page(page.index, &page.detections)?;

    let annotated_path = layout.annotated_page_path(page.index);
    annotator.render_to_file(&page.image_path, &page.detections, &annotated_path)?;

    Ok(PageSummary {
        index: page.index,
        detections: page.detections.len(),
        image_path: page.image_path,
        annotated_path,
    })
}
