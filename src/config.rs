//! Run configuration: the settings document and the output layout derived from it.
//!
//! All settings are resolved once at startup into a [`RunConfig`] and never
//! change during a run. The settings document is JSON:
//!
//! ```json
//! {
//!   "output_dir": "output",
//!   "images_dir_name": "images",
//!   "annotated_dir_name": "ocr_output_images",
//!   "image_file_prefix": "page",
//!   "detector": { "program": "paddleocr-json", "lang": "en" }
//! }
//! ```
//!
//! The first four keys are required. Everything else has a default.
//!
//! # Why validate directory names?
//! Both working directories are wiped at the start of every run. Restricting
//! them to a single plain path component under `output_dir` means a typo in
//! the settings can never point the reset at a source tree or at `/`.

use crate::error::PdfOcrError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Environment variable naming the settings document.
pub const CONFIG_ENV_VAR: &str = "PDF_OCR_CONFIG";

/// Settings document used when [`CONFIG_ENV_VAR`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Static settings for one pipeline run.
///
/// Loaded via [`RunConfig::load`] / [`RunConfig::from_file`] or built in code
/// with [`RunConfig::builder`].
#[derive(Clone, Deserialize)]
pub struct RunConfig {
    /// Root directory for every generated artifact.
    pub output_dir: PathBuf,

    /// Subdirectory of `output_dir` receiving the rasterised page PNGs.
    pub images_dir_name: String,

    /// Subdirectory of `output_dir` receiving the annotated page JPEGs.
    pub annotated_dir_name: String,

    /// Filename prefix handed to the rasterizer (`{prefix}-{n}.png`).
    pub image_file_prefix: String,

    /// PDF → PNG program. Default: `pdftoppm`.
    #[serde(default = "default_rasterizer")]
    pub rasterizer: String,

    /// Images → PDF program. Default: `img2pdf`.
    #[serde(default = "default_assembler")]
    pub assembler: String,

    /// Recognition model invocation.
    #[serde(default)]
    pub detector: DetectorSettings,

    /// TrueType font for annotation labels. `None` searches system fonts.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Label font size in pixels. Default: 18.
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// Outline thickness of detection boxes in pixels. Default: 2.
    #[serde(default = "default_box_thickness")]
    pub box_thickness: u32,

    /// Display width of the report's text column. Default: 60.
    #[serde(default = "default_text_column_width")]
    pub text_column_width: f64,

    /// Per-page progress events. Never read from the settings document.
    #[serde(skip)]
    pub progress_callback: Option<ProgressCallback>,
}

fn default_rasterizer() -> String {
    "pdftoppm".to_string()
}

fn default_assembler() -> String {
    "img2pdf".to_string()
}

fn default_font_scale() -> f32 {
    18.0
}

fn default_box_thickness() -> u32 {
    2
}

fn default_text_column_width() -> f64 {
    60.0
}

/// How the external recognition model is invoked.
///
/// The program is called once per page as
/// `program --lang <lang> --use-angle-cls <bool> [extra_args..] <image>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub program: String,
    /// Recognition language. Default: `en`.
    pub lang: String,
    /// Rotation-classification correction. Default: off.
    pub use_angle_cls: bool,
    pub extra_args: Vec<String>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            program: "paddleocr-json".to_string(),
            lang: "en".to_string(),
            use_angle_cls: false,
            extra_args: Vec::new(),
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("output_dir", &self.output_dir)
            .field("images_dir_name", &self.images_dir_name)
            .field("annotated_dir_name", &self.annotated_dir_name)
            .field("image_file_prefix", &self.image_file_prefix)
            .field("rasterizer", &self.rasterizer)
            .field("assembler", &self.assembler)
            .field("detector", &self.detector)
            .field("font_path", &self.font_path)
            .field("font_scale", &self.font_scale)
            .field("box_thickness", &self.box_thickness)
            .field("text_column_width", &self.text_column_width)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn OcrProgressCallback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a builder rooted at `output_dir` with conventional directory names.
    pub fn builder(output_dir: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder {
            config: RunConfig {
                output_dir: output_dir.into(),
                images_dir_name: "images".to_string(),
                annotated_dir_name: "ocr_output_images".to_string(),
                image_file_prefix: "page".to_string(),
                rasterizer: default_rasterizer(),
                assembler: default_assembler(),
                detector: DetectorSettings::default(),
                font_path: None,
                font_scale: default_font_scale(),
                box_thickness: default_box_thickness(),
                text_column_width: default_text_column_width(),
                progress_callback: None,
            },
        }
    }

    /// Load the settings document named by `PDF_OCR_CONFIG`, falling back to
    /// `config.json` in the working directory.
    pub fn load() -> Result<Self, PdfOcrError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_file(path)
    }

    /// Load and validate a settings document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PdfOcrError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfOcrError::ConfigNotFound {
                path: path.to_path_buf(),
            },
            _ => PdfOcrError::InvalidConfig(format!(
                "cannot read settings file '{}': {}",
                path.display(),
                e
            )),
        })?;

        let config: RunConfig =
            serde_json::from_str(&raw).map_err(|source| PdfOcrError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), PdfOcrError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(PdfOcrError::InvalidConfig(
                "output_dir must not be empty".into(),
            ));
        }
        ensure_dir_name("images_dir_name", &self.images_dir_name)?;
        ensure_dir_name("annotated_dir_name", &self.annotated_dir_name)?;
        if self.images_dir_name == self.annotated_dir_name {
            return Err(PdfOcrError::InvalidConfig(format!(
                "images_dir_name and annotated_dir_name must differ (both '{}')",
                self.images_dir_name
            )));
        }
        if self.image_file_prefix.is_empty()
            || self.image_file_prefix.contains(['/', '\\'])
        {
            return Err(PdfOcrError::InvalidConfig(format!(
                "image_file_prefix must be a non-empty file name prefix, got '{}'",
                self.image_file_prefix
            )));
        }
        for (key, program) in [
            ("rasterizer", &self.rasterizer),
            ("assembler", &self.assembler),
            ("detector.program", &self.detector.program),
        ] {
            if program.trim().is_empty() {
                return Err(PdfOcrError::InvalidConfig(format!(
                    "{key} must name a program"
                )));
            }
        }
        if self.font_scale.is_nan() || self.font_scale <= 0.0 {
            return Err(PdfOcrError::InvalidConfig(format!(
                "font_scale must be positive, got {}",
                self.font_scale
            )));
        }
        Ok(())
    }

    /// Derive every output path for one input PDF.
    pub fn layout(&self, input_pdf: &Path) -> OutputLayout {
        let stem = input_pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let images_dir = self.output_dir.join(&self.images_dir_name);
        OutputLayout {
            image_prefix: images_dir.join(&self.image_file_prefix),
            images_dir,
            annotated_dir: self.output_dir.join(&self.annotated_dir_name),
            report_path: self.output_dir.join(format!("{stem}.xlsx")),
            pdf_path: self.output_dir.join(format!("{stem}_ocr.pdf")),
        }
    }
}

fn ensure_dir_name(key: &str, name: &str) -> Result<(), PdfOcrError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(PdfOcrError::InvalidConfig(format!(
            "{key} must be a single plain directory name, got '{name}'"
        ))),
    }
}

/// Every path a run reads or writes, derived from [`RunConfig`] and the input name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Rasterised page images.
    pub images_dir: PathBuf,
    /// Prefix path handed to the rasterizer: `{images_dir}/{prefix}`.
    pub image_prefix: PathBuf,
    /// Annotated page images.
    pub annotated_dir: PathBuf,
    /// `{output_dir}/{stem}.xlsx`
    pub report_path: PathBuf,
    /// `{output_dir}/{stem}_ocr.pdf`
    pub pdf_path: PathBuf,
}

impl OutputLayout {
    /// `{annotated_dir}/result_page_{index}.jpg`
    pub fn annotated_page_path(&self, index: u32) -> PathBuf {
        self.annotated_dir.join(format!("result_page_{index}.jpg"))
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn images_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.images_dir_name = name.into();
        self
    }

    pub fn annotated_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.annotated_dir_name = name.into();
        self
    }

    pub fn image_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.image_file_prefix = prefix.into();
        self
    }

    pub fn rasterizer(mut self, program: impl Into<String>) -> Self {
        self.config.rasterizer = program.into();
        self
    }

    pub fn assembler(mut self, program: impl Into<String>) -> Self {
        self.config.assembler = program.into();
        self
    }

    pub fn detector(mut self, settings: DetectorSettings) -> Self {
        self.config.detector = settings;
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn font_scale(mut self, scale: f32) -> Self {
        self.config.font_scale = scale;
        self
    }

    pub fn box_thickness(mut self, px: u32) -> Self {
        self.config.box_thickness = px.max(1);
        self
    }

    pub fn text_column_width(mut self, width: f64) -> Self {
        self.config.text_column_width = width;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, PdfOcrError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(json: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_required_keys_and_defaults() {
        let f = write_settings(
            r#"{
                "output_dir": "/tmp/ocr",
                "images_dir_name": "images",
                "annotated_dir_name": "annotated",
                "image_file_prefix": "page"
            }"#,
        );
        let c = RunConfig::from_file(f.path()).unwrap();
        assert_eq!(c.output_dir, PathBuf::from("/tmp/ocr"));
        assert_eq!(c.rasterizer, "pdftoppm");
        assert_eq!(c.assembler, "img2pdf");
        assert_eq!(c.detector.lang, "en");
        assert!(!c.detector.use_angle_cls);
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn missing_required_key_is_parse_error() {
        let f = write_settings(
            r#"{ "output_dir": "/tmp/ocr", "images_dir_name": "images", "annotated_dir_name": "a" }"#,
        );
        let err = RunConfig::from_file(f.path()).unwrap_err();
        assert!(matches!(err, PdfOcrError::ConfigParse { .. }), "got: {err}");
        assert!(err.to_string().contains("image_file_prefix"), "got: {err}");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PdfOcrError::ConfigNotFound { .. }));
    }

    #[test]
    fn partial_detector_section_keeps_defaults() {
        let f = write_settings(
            r#"{
                "output_dir": "out",
                "images_dir_name": "images",
                "annotated_dir_name": "annotated",
                "image_file_prefix": "page",
                "detector": { "program": "my-ocr" }
            }"#,
        );
        let c = RunConfig::from_file(f.path()).unwrap();
        assert_eq!(c.detector.program, "my-ocr");
        assert_eq!(c.detector.lang, "en");
    }

    #[test]
    fn rejects_nested_or_parent_dir_names() {
        for bad in ["..", ".", "a/b", "", "/abs"] {
            let r = RunConfig::builder("out").images_dir_name(bad).build();
            assert!(r.is_err(), "accepted images_dir_name {bad:?}");
        }
    }

    #[test]
    fn rejects_identical_dir_names() {
        let r = RunConfig::builder("out")
            .images_dir_name("same")
            .annotated_dir_name("same")
            .build();
        assert!(matches!(r, Err(PdfOcrError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_prefix_with_separator() {
        let r = RunConfig::builder("out").image_file_prefix("a/b").build();
        assert!(r.is_err());
    }

    #[test]
    fn layout_derives_paths_from_stem() {
        let c = RunConfig::builder("/data/out")
            .images_dir_name("imgs")
            .annotated_dir_name("annotated")
            .image_file_prefix("p")
            .build()
            .unwrap();
        let l = c.layout(Path::new("/docs/Annual Report.pdf"));
        assert_eq!(l.images_dir, PathBuf::from("/data/out/imgs"));
        assert_eq!(l.image_prefix, PathBuf::from("/data/out/imgs/p"));
        assert_eq!(l.annotated_dir, PathBuf::from("/data/out/annotated"));
        assert_eq!(l.report_path, PathBuf::from("/data/out/Annual Report.xlsx"));
        assert_eq!(l.pdf_path, PathBuf::from("/data/out/Annual Report_ocr.pdf"));
        assert_eq!(
            l.annotated_page_path(12),
            PathBuf::from("/data/out/annotated/result_page_12.jpg")
        );
    }
}
