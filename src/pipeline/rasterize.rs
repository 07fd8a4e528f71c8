//! PDF rasterisation through an external program (`pdftoppm` by default).
//!
//! Rendering arbitrary PDFs is its own large subsystem, so it is delegated to
//! a mature tool. The tool writes one PNG per page, `{prefix}-{n}.png`, with
//! its own choice of zero padding; page order is recovered afterwards by
//! [`discover_pages`], never by filename sort.
//!
//! A non-zero exit is a soft failure: it is logged and the pipeline carries on
//! with however many images were produced, possibly none.

use crate::error::PdfOcrError;
use crate::pipeline::pages::{collect_pages, raster_name_pattern};
use crate::pipeline::process::{display_args, os_args, ProcessResult, ProcessRunner};
use crate::types::Page;
use std::path::Path;
use tracing::{debug, info, warn};

/// Render every page of `input_pdf` to `{output_prefix}-{n}.png`.
///
/// The program is invoked as `program -png <input_pdf> <output_prefix>`.
///
/// # Errors
/// Only [`PdfOcrError::ToolUnavailable`] when `program` cannot be started.
pub fn rasterize(
    runner: &dyn ProcessRunner,
    program: &str,
    input_pdf: &Path,
    output_prefix: &Path,
) -> Result<ProcessResult, PdfOcrError> {
    let args = os_args([
        Path::new("-png").as_os_str(),
        input_pdf.as_os_str(),
        output_prefix.as_os_str(),
    ]);
    info!("Rasterising {} → {}-N.png", input_pdf.display(), output_prefix.display());

    let result = runner
        .run(program, &args)
        .map_err(|source| PdfOcrError::ToolUnavailable {
            program: program.to_string(),
            source,
        })?;

    if result.success {
        debug!("{} {} finished", program, display_args(&args));
    } else {
        warn!(
            "{} exited with {:?}; continuing with whatever pages were produced\n{}",
            program,
            result.exit_code,
            result.combined_output()
        );
    }
    Ok(result)
}

/// Find the rasterised pages in `images_dir`, in ascending page order.
///
/// Only files named `{prefix}-{digits}.png` count as pages.
pub fn discover_pages(images_dir: &Path, prefix: &str) -> Result<Vec<Page>, PdfOcrError> {
    let pattern = raster_name_pattern(prefix)?;
    let pages: Vec<Page> = collect_pages(images_dir, &pattern)?
        .into_iter()
        .map(|f| Page::new(f.index, f.path))
        .collect();
    info!("Found {} page images in {}", pages.len(), images_dir.display());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(String, Vec<OsString>)>>,
        exit_code: i32,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[OsString]) -> std::io::Result<ProcessResult> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok(if self.exit_code == 0 {
                ProcessResult::ok(program, "")
            } else {
                ProcessResult::failed(program, self.exit_code, "Syntax Error: broken xref")
            })
        }
    }

    struct MissingRunner;

    impl ProcessRunner for MissingRunner {
        fn run(&self, _program: &str, _args: &[OsString]) -> std::io::Result<ProcessResult> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        }
    }

    #[test]
    fn invokes_tool_with_png_flag_input_and_prefix() {
        let runner = RecordingRunner::default();
        rasterize(
            &runner,
            "pdftoppm",
            Path::new("/in/doc.pdf"),
            Path::new("/out/images/page"),
        )
        .unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "pdftoppm");
        assert_eq!(
            calls[0].1,
            os_args(["-png", "/in/doc.pdf", "/out/images/page"])
        );
    }

    #[test]
    fn non_zero_exit_is_soft_failure() {
        let runner = RecordingRunner {
            exit_code: 1,
            ..Default::default()
        };
        let r = rasterize(&runner, "pdftoppm", Path::new("a.pdf"), Path::new("p")).unwrap();
        assert!(!r.success);
        assert_eq!(r.exit_code, Some(1));
    }

    #[test]
    fn unavailable_tool_is_fatal() {
        let err = rasterize(&MissingRunner, "pdftoppm", Path::new("a.pdf"), Path::new("p"))
            .unwrap_err();
        assert!(matches!(err, PdfOcrError::ToolUnavailable { .. }));
    }

    #[test]
    fn discover_pages_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for n in [10, 2, 1, 11] {
            std::fs::write(dir.path().join(format!("img-{n}.png")), b"").unwrap();
        }
        std::fs::write(dir.path().join("img-final.png"), b"").unwrap();

        let pages = discover_pages(dir.path(), "img").unwrap();
        let order: Vec<u32> = pages.iter().map(|p| p.index).collect();
        assert_eq!(order, vec![1, 2, 10, 11]);
        assert!(pages.iter().all(|p| p.detections.is_empty()));
    }
}
