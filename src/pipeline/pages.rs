//! Page numbering of generated image files.
//!
//! ## Why parse instead of sort by name?
//!
//! Rasterizers number pages without consistent zero padding, so a plain
//! filename sort yields `page-1, page-10, page-11, page-12, page-2, …`.
//! Every consumer of page images (detection, the report, the assembler) goes
//! through [`PageFile`] and its numeric index instead, which guarantees the
//! final PDF and report sheets follow true page order.

use crate::error::PdfOcrError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An image file whose name carries a 1-based page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub index: u32,
    pub path: PathBuf,
}

/// Matches rasterizer output for a given prefix: `{prefix}-{digits}.png`.
pub fn raster_name_pattern(prefix: &str) -> Result<Regex, PdfOcrError> {
    Regex::new(&format!(r"^{}-(\d+)\.png$", regex::escape(prefix))).map_err(|e| {
        PdfOcrError::InvalidConfig(format!("unusable image_file_prefix '{prefix}': {e}"))
    })
}

/// Matches annotated page output: `result_page_{digits}.jpg`.
pub static ANNOTATED_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^result_page_(\d+)\.jpg$").unwrap());

/// Extract the page number from `file_name` using a pattern with one digit group.
///
/// Returns `None` when the name does not match or the number does not fit `u32`.
pub fn page_index(pattern: &Regex, file_name: &str) -> Option<u32> {
    pattern
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// List the files in `dir` whose names match `pattern`, in ascending page order.
///
/// Files that do not match are skipped (and logged at debug level). If two
/// names parse to the same page number (`page-01.png`, `page-1.png`) they are
/// ordered by name so the result stays deterministic.
pub fn collect_pages(dir: &Path, pattern: &Regex) -> Result<Vec<PageFile>, PdfOcrError> {
    let wrap = |source| PdfOcrError::Workspace {
        path: dir.to_path_buf(),
        source,
    };

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(wrap)? {
        let entry = entry.map_err(wrap)?;
        if !entry.file_type().map_err(wrap)?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            debug!("Ignoring non-UTF-8 file name in {}", dir.display());
            continue;
        };
        match page_index(pattern, name) {
            Some(index) => pages.push(PageFile {
                index,
                path: entry.path(),
            }),
            None => debug!("Ignoring {} (not a page image)", name),
        }
    }

    pages.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_raster_names() {
        let re = raster_name_pattern("page").unwrap();
        assert_eq!(page_index(&re, "page-1.png"), Some(1));
        assert_eq!(page_index(&re, "page-012.png"), Some(12));
        assert_eq!(page_index(&re, "page-.png"), None);
        assert_eq!(page_index(&re, "page-3.jpg"), None);
        assert_eq!(page_index(&re, "other-3.png"), None);
        assert_eq!(page_index(&re, "page-3a.png"), None);
    }

    #[test]
    fn prefix_is_matched_literally() {
        let re = raster_name_pattern("scan.v2").unwrap();
        assert_eq!(page_index(&re, "scan.v2-4.png"), Some(4));
        assert_eq!(page_index(&re, "scanXv2-4.png"), None);
    }

    #[test]
    fn prefix_may_contain_digits() {
        let re = raster_name_pattern("vol2").unwrap();
        assert_eq!(page_index(&re, "vol2-7.png"), Some(7));
    }

    #[test]
    fn parses_annotated_names() {
        assert_eq!(page_index(&ANNOTATED_NAME_PATTERN, "result_page_10.jpg"), Some(10));
        assert_eq!(page_index(&ANNOTATED_NAME_PATTERN, "result_page_x.jpg"), None);
    }

    #[test]
    fn collects_in_numeric_order_and_skips_strays() {
        let dir = tempfile::tempdir().unwrap();
        for n in 1..=12 {
            fs::write(dir.path().join(format!("page-{n}.png")), b"").unwrap();
        }
        fs::write(dir.path().join("page-cover.png"), b"").unwrap();
        fs::write(dir.path().join("thumbs.db"), b"").unwrap();
        fs::create_dir(dir.path().join("page-99.png")).unwrap();

        let pages = collect_pages(dir.path(), &raster_name_pattern("page").unwrap()).unwrap();
        let order: Vec<u32> = pages.iter().map(|p| p.index).collect();
        assert_eq!(order, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn empty_directory_yields_no_pages() {
        let dir = tempfile::tempdir().unwrap();
        let pages = collect_pages(dir.path(), &raster_name_pattern("page").unwrap()).unwrap();
        assert!(pages.is_empty());
    }
}
