//! Input validation: make sure the argument names a readable PDF before any
//! working directory is reset.
//!
//! Checking the `%PDF` magic bytes up front gives a meaningful error instead
//! of an empty report after the rasterizer quietly fails on a non-PDF.

use crate::error::PdfOcrError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable and starts with `%PDF`.
pub fn resolve_input(path: &Path) -> Result<PathBuf, PdfOcrError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(PdfOcrError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(PdfOcrError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfOcrError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfOcrError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_pdf_magic() {
        let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        f.write_all(b"%PDF-1.7\n%...").unwrap();
        assert_eq!(resolve_input(f.path()).unwrap(), f.path());
    }

    #[test]
    fn rejects_non_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\x89PNG\r\n").unwrap();
        let err = resolve_input(f.path()).unwrap_err();
        assert!(matches!(err, PdfOcrError::NotAPdf { .. }));
    }

    #[test]
    fn rejects_truncated_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();
        assert!(matches!(
            resolve_input(f.path()),
            Err(PdfOcrError::NotAPdf { .. })
        ));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input(&dir.path().join("nope.pdf")).unwrap_err();
        assert!(matches!(err, PdfOcrError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_input(dir.path()),
            Err(PdfOcrError::FileNotFound { .. })
        ));
    }
}
