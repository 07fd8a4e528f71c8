//! Pipeline stages for PDF OCR reporting.
//!
//! Each submodule implements exactly one step. The controller in
//! [`crate::convert`] wires them together; nothing here calls a later stage.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ workspace ──▶ rasterize ──▶ pages ──┬─▶ detect ──▶ report
//! (%PDF)     (reset)      (pdftoppm)   (order)  │              annotate
//!                                               └────────────▶ assemble (img2pdf)
//! ```
//!
//! 1. [`input`]     validate the input file is a readable PDF
//! 2. [`workspace`] reset the images and annotated directories
//! 3. [`rasterize`] external PDF → PNG conversion, soft-fails
//! 4. [`pages`]     recover numeric page order from generated filenames
//! 5. [`detect`]    run the recognition model on one page image
//! 6. [`report`]    one XLSX sheet per page
//! 7. [`annotate`]  draw boxes and labels, write `result_page_{n}.jpg`
//! 8. [`assemble`]  external images → PDF conversion, soft-fails
//!
//! [`process`] is the shared capability for running external programs.

pub mod annotate;
pub mod assemble;
pub mod detect;
pub mod input;
pub mod pages;
pub mod process;
pub mod rasterize;
pub mod report;
pub mod workspace;
