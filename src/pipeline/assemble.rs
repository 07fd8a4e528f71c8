//! Re-assembly of annotated pages into one PDF through an external program
//! (`img2pdf` by default).
//!
//! The tool is handed an explicit, numerically sorted file list rather than a
//! shell glob: glob expansion sorts lexicographically, which puts
//! `result_page_10.jpg` before `result_page_2.jpg` once a document passes
//! nine pages.
//!
//! Like rasterisation, a non-zero exit is logged and otherwise ignored;
//! callers check whether the output PDF exists.

use crate::error::PdfOcrError;
use crate::pipeline::pages::{collect_pages, PageFile, ANNOTATED_NAME_PATTERN};
use crate::pipeline::process::{ProcessResult, ProcessRunner};
use std::ffi::OsString;
use std::path::Path;
use tracing::{info, warn};

/// The annotated pages in `annotated_dir`, ascending by page number.
pub fn annotated_pages(annotated_dir: &Path) -> Result<Vec<PageFile>, PdfOcrError> {
    collect_pages(annotated_dir, &ANNOTATED_NAME_PATTERN)
}

/// Merge every `result_page_{n}.jpg` in `annotated_dir` into `output_pdf`.
///
/// The program is invoked as `program <page_1> <page_2> … -o <output_pdf>`.
/// Returns `Ok(None)` without invoking anything when there are no pages,
/// since an image-to-PDF tool given no inputs either fails or waits on stdin.
///
/// # Errors
/// [`PdfOcrError::ToolUnavailable`] when `program` cannot be started, or a
/// workspace error when `annotated_dir` cannot be listed.
pub fn assemble(
    runner: &dyn ProcessRunner,
    program: &str,
    annotated_dir: &Path,
    output_pdf: &Path,
) -> Result<Option<ProcessResult>, PdfOcrError> {
    let pages = annotated_pages(annotated_dir)?;
    if pages.is_empty() {
        warn!(
            "No annotated pages in {}; skipping PDF assembly",
            annotated_dir.display()
        );
        return Ok(None);
    }

    let mut args: Vec<OsString> = pages.iter().map(|p| p.path.clone().into_os_string()).collect();
    args.push("-o".into());
    args.push(output_pdf.as_os_str().to_os_string());

    info!("Assembling {} pages → {}", pages.len(), output_pdf.display());
    let result = runner
        .run(program, &args)
        .map_err(|source| PdfOcrError::ToolUnavailable {
            program: program.to_string(),
            source,
        })?;

    if !result.success {
        warn!(
            "{} exited with {:?}; '{}' may be missing or incomplete\n{}",
            program,
            result.exit_code,
            output_pdf.display(),
            result.combined_output()
        );
    }
    Ok(Some(result))
}
