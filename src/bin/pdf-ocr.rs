//! CLI binary for pdf-ocr-report.
//!
//! A thin shim over the library crate: load the settings document, run the
//! pipeline on the single positional PDF argument and print where the
//! artifacts landed.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_ocr_report::config::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use pdf_ocr_report::{convert, OcrProgressCallback, ProgressCallback, RunConfig};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar plus one log line per page.
/// indicatif hides the bar automatically when stderr is not a terminal.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Wall-clock start of the page currently being processed.
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Rasterising PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.page_started
            .lock()
            .ok()
            .and_then(|mut g| g.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl OcrProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("OCR");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Running OCR on {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page: u32, _total_pages: usize) {
        if let Ok(mut g) = self.page_started.lock() {
            *g = Some(Instant::now());
        }
        self.bar.set_message(format!("page {page}"));
    }

    fn on_page_complete(&self, page: u32, total_pages: usize, detections: usize) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<10}  {}",
            green("✓"),
            page,
            total_pages,
            dim(&format!("{detections:>4} lines")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page: u32, total_pages: usize, error: &str) {
        let secs = self.elapsed_secs();
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page,
            total_pages,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.abandon();
    }

    fn on_run_complete(&self, total_pages: usize, total_detections: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages, {} text lines",
            green("✔"),
            bold(&total_pages.to_string()),
            bold(&total_detections.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"SETTINGS:
  Read from $PDF_OCR_CONFIG, or ./config.json when unset:

  {
    "output_dir": "output",
    "images_dir_name": "images",
    "annotated_dir_name": "ocr_output_images",
    "image_file_prefix": "page",
    "detector": { "program": "paddleocr-json", "lang": "en" }
  }

OUTPUT (under output_dir):
  {images_dir_name}/{prefix}-N.png          rasterised pages
  {annotated_dir_name}/result_page_N.jpg    annotated pages
  {stem}.xlsx                               one sheet per page
  {stem}_ocr.pdf                            annotated pages as PDF

EXTERNAL TOOLS (must be on PATH):
  pdftoppm     PDF → PNG          (poppler-utils)
  img2pdf      JPEG → PDF
  detector     prints the page's detections as JSON on its last stdout line

ENVIRONMENT VARIABLES:
  PDF_OCR_CONFIG   Path to the settings file
  RUST_LOG         Log filter, e.g. RUST_LOG=pdf_ocr_report=debug

WARNING:
  Both working directories are emptied at the start of every run. Do not run
  two conversions against the same output_dir at the same time.
"#;

/// Run OCR over every page of a PDF and write annotated pages, an XLSX report
/// and a re-assembled PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-ocr",
    version,
    about = "Run OCR over a PDF: annotated pages, XLSX report and annotated PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file path.
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Done once, here, so the library never touches global logger state.
    // The progress bar covers routine feedback; warnings (soft tool failures)
    // still get through.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    // ── Load settings ────────────────────────────────────────────────────
    let mut config = RunConfig::load().with_context(|| {
        let source = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        format!("Failed to load settings from {source}")
    })?;

    let progress: ProgressCallback = CliProgressCallback::new();
    config.progress_callback = Some(progress);

    // ── Run ──────────────────────────────────────────────────────────────
    let output = convert(&cli.input, &config)
        .with_context(|| format!("OCR run failed for {}", cli.input.display()))?;

    if !output.rasterize.success {
        eprintln!(
            "{} rasterizer exited with {:?}; {} pages were processed",
            cyan("⚠"),
            output.rasterize.exit_code,
            output.stats.page_count
        );
    }

    println!("Annotated images: {}", output.annotated_dir.display());
    println!("Report:           {}", output.report_path.display());
    if output.pdf_exists() {
        println!("PDF:              {}", output.pdf_path.display());
    } else {
        eprintln!(
            "{} PDF was not produced: {}",
            cyan("⚠"),
            output.pdf_path.display()
        );
    }

    Ok(())
}
