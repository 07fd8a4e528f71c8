//! End-to-end test against the real external tools.
//!
//! Needs `pdftoppm`, `img2pdf` and the configured detector on `PATH`, so it is
//! gated behind `E2E_ENABLED`. Point `PDF_OCR_E2E_PDF` at the document to use.
//!
//! Run with:
//!   E2E_ENABLED=1 PDF_OCR_E2E_PDF=./sample.pdf cargo test --test e2e -- --nocapture

use pdf_ocr_report::{convert, RunConfig};
use std::path::PathBuf;

/// Skip unless E2E_ENABLED is set and the PDF named by PDF_OCR_E2E_PDF exists.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let Ok(p) = std::env::var("PDF_OCR_E2E_PDF").map(PathBuf::from) else {
            println!("SKIP: set PDF_OCR_E2E_PDF to a PDF file");
            return;
        };
        if !p.is_file() {
            println!("SKIP: test file not found: {}", p.display());
            return;
        }
        p
    }};
}

#[test]
fn test_e2e_full_run() {
    let pdf = e2e_skip_unless_ready!();
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let out_dir = tempfile::tempdir().unwrap();
    let config = RunConfig::builder(out_dir.path()).build().unwrap();

    let output = convert(&pdf, &config).expect("OCR run failed");

    println!(
        "{} pages, {} detections in {}ms",
        output.stats.page_count, output.stats.detection_count, output.stats.total_duration_ms
    );
    assert!(output.rasterize.success, "{}", output.rasterize.combined_output());
    assert!(output.stats.page_count > 0);
    assert!(output.report_path.is_file());
    assert!(output.pages.iter().all(|p| p.annotated_path.is_file()));
    assert!(output.pdf_exists(), "assembled PDF missing");
}
