//! Error types for the pdf-ocr-report library.
//!
//! Every variant of [`PdfOcrError`] is **fatal**: the run stops at the point
//! of failure and nothing is retried. Re-running from scratch is the only
//! recovery path, which is always safe because each run starts by resetting
//! its working directories.
//!
//! External tools that *run* but exit non-zero (the rasterizer and the
//! assembler) are deliberately not represented here. Their outcome is a
//! [`crate::pipeline::process::ProcessResult`] with `success == false`,
//! logged and recorded in [`crate::output::OcrOutput`], and the pipeline
//! carries on. A tool that cannot be *started* at all is fatal
//! ([`PdfOcrError::ToolUnavailable`]).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-ocr-report library.
#[derive(Debug, Error)]
pub enum PdfOcrError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// The settings document does not exist.
    #[error("Settings file not found: '{path}'\nCreate it or point PDF_OCR_CONFIG at an existing file.")]
    ConfigNotFound { path: PathBuf },

    /// The settings document is not valid JSON or misses a required key.
    #[error("Failed to parse settings file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings parsed but violate a constraint.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── External tool errors ──────────────────────────────────────────────
    /// An external program could not be started (usually: not on PATH).
    #[error("Failed to run '{program}': {source}\nMake sure it is installed and on your PATH.")]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // ── Detection errors ──────────────────────────────────────────────────
    /// The recognition model reported a failure for a page image.
    #[error("Text detection failed for '{image}': {detail}")]
    DetectionFailed { image: PathBuf, detail: String },

    /// The recognition model produced output that is not a valid detection list.
    #[error("Malformed detection output for '{image}': {detail}")]
    MalformedDetections { image: PathBuf, detail: String },

    // ── Filesystem errors ─────────────────────────────────────────────────
    /// Creating, listing or clearing a working directory failed.
    #[error("Failed to prepare directory '{path}': {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page image could not be opened or decoded.
    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An annotated page could not be encoded or written.
    #[error("Failed to write image '{path}': {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The spreadsheet report could not be created or saved.
    #[error("Failed to write report '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// A page was added to the report twice; sheet names must be unique.
    #[error("Page {index} already has a sheet in report '{path}'")]
    DuplicatePage { path: PathBuf, index: u32 },

    /// The report file could not be created/truncated on open.
    #[error("Failed to create report '{path}': {source}")]
    ReportCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured annotation font could not be loaded.
    #[error("Failed to load font '{path}': {detail}")]
    FontLoad { path: PathBuf, detail: String },
}
