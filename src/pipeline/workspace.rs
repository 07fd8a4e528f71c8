//! Working-directory reset.
//!
//! Every run starts from empty images/annotated directories so that stale
//! pages from a previous, longer document can never leak into the report or
//! the assembled PDF. Only pass directories dedicated to generated artifacts:
//! everything beneath the path is deleted.

use crate::error::PdfOcrError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Ensure `dir` exists and is empty.
///
/// Creates `dir` and any missing parents, then removes every file and
/// subdirectory beneath it. `dir` itself is left in place. Safe to call on a
/// path that does not exist yet.
pub fn reset_dir(dir: &Path) -> Result<(), PdfOcrError> {
    let wrap = |source| PdfOcrError::Workspace {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(wrap)?;

    let mut removed = 0usize;
    for entry in fs::read_dir(dir).map_err(wrap)? {
        let entry = entry.map_err(wrap)?;
        let path = entry.path();
        // file_type() does not follow symlinks: a link to a directory is
        // removed as a link, never recursed into.
        let file_type = entry.file_type().map_err(wrap)?;
        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|source| PdfOcrError::Workspace {
            path: path.clone(),
            source,
        })?;
        removed += 1;
    }

    debug!("Reset {} ({} entries removed)", dir.display(), removed);
    Ok(())
}
