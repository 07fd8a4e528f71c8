//! Progress-callback trait for per-page pipeline events.
//!
//! Inject an [`Arc<dyn OcrProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events as
//! the pipeline detects, reports and annotates each page. The CLI uses this to
//! drive its progress bar; the library itself never prints.
//!
//! # Example
//!
//! ```rust
//! use pdf_ocr_report::{OcrProgressCallback, RunConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     detections: AtomicUsize,
//! }
//!
//! impl OcrProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page: u32, total_pages: usize, detections: usize) {
//!         self.detections.fetch_add(detections, Ordering::SeqCst);
//!         eprintln!("page {page}/{total_pages}: {detections} lines");
//!     }
//! }
//!
//! let config = RunConfig::builder("output")
//!     .progress_callback(Arc::new(CountingCallback { detections: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes each page.
///
/// Pages are processed one at a time in ascending page order, so events for
/// one page never interleave with another. All methods default to no-ops.
pub trait OcrProgressCallback: Send + Sync {
    /// Called once after rasterisation, before the first page is processed.
    ///
    /// # Arguments
    /// * `total_pages`: number of page images that will be processed
    fn on_run_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the recognition model runs on a page.
    fn on_page_start(&self, page: u32, total_pages: usize) {
        let _ = (page, total_pages);
    }

    /// Called once a page's report sheet and annotated image are written.
    ///
    /// # Arguments
    /// * `page`: 1-based page number
    /// * `total_pages`: total pages in this run
    /// * `detections`: number of text lines found on the page
    fn on_page_complete(&self, page: u32, total_pages: usize, detections: usize) {
        let _ = (page, total_pages, detections);
    }

    /// Called when a page fails. The run aborts right after this event.
    fn on_page_error(&self, page: u32, total_pages: usize, error: &str) {
        let _ = (page, total_pages, error);
    }

    /// Called once after every page has been processed and the PDF assembled.
    fn on_run_complete(&self, total_pages: usize, total_detections: usize) {
        let _ = (total_pages, total_detections);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl OcrProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn OcrProgressCallback>;
