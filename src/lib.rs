//! # pdf-ocr-report
//!
//! Run text detection and recognition over every page of a PDF and emit three
//! artifacts:
//!
//! * annotated page images with each detected line outlined and labelled,
//! * an XLSX report with one sheet per page listing every text line, its
//!   quadrilateral and its confidence,
//! * a PDF re-assembled from the annotated pages.
//!
//! This crate orchestrates; it does not do OCR. Rasterisation, recognition and
//! PDF assembly are external programs reached through narrow interfaces
//! ([`ProcessRunner`], [`TextDetector`]), so any engine honouring the contract
//! can be swapped in.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Reset      empty the images / annotated directories
//!  ├─ 2. Rasterise  pdftoppm -png → {prefix}-{n}.png
//!  ├─ 3. Order      parse page numbers from filenames, sort numerically
//!  ├─ 4. Per page   detect → report sheet → result_page_{n}.jpg
//!  └─ 5. Assemble   img2pdf result_page_1.jpg … → {stem}_ocr.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_ocr_report::{convert, RunConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads PDF_OCR_CONFIG, or ./config.json
//!     let config = RunConfig::load()?;
//!     let output = convert("magazine.pdf", &config)?;
//!     println!("report:    {}", output.report_path.display());
//!     println!("annotated: {}", output.annotated_dir.display());
//!     println!("pdf:       {}", output.pdf_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-ocr` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DetectorSettings, OutputLayout, RunConfig, RunConfigBuilder};
pub use convert::{convert, convert_with};
pub use error::PdfOcrError;
pub use output::{OcrOutput, PageSummary, RunStats};
pub use pipeline::annotate::Annotator;
pub use pipeline::detect::{CommandDetector, TextDetector};
pub use pipeline::process::{ProcessResult, ProcessRunner, SystemProcessRunner};
pub use progress::{NoopProgressCallback, OcrProgressCallback, ProgressCallback};
pub use types::{Detection, Page, Point};
