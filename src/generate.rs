//! Page generation.
//!
//! Writes one destination page from one source page. The layout that applies
//! to a page is the `_layout.html` sitting in the page's own directory; layouts
//! in parent directories are not consulted.
//!
//! - **No layout**: the source is copied byte-for-byte.
//! - **Layout**: the source header is parsed and substituted into the layout
//!   (see [`crate::template`]), and the result overwrites the destination.
//!
//! The destination's parent directory must already exist; the walker creates
//! it before descending.
//!
//! ## Replacing outputs
//!
//! Output is written to a hidden sibling (`.<name>.pollsite-tmp`) and renamed
//! over the destination. A failed write or copy therefore never leaves a
//! truncated page carrying a fresh timestamp: the old destination (or none)
//! stays in place, is still stale, and the next pass tries again.

use crate::template;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// File name of a directory's layout.
pub const LAYOUT_FILE_NAME: &str = "_layout.html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Layout path that applies to `source`.
pub fn layout_path(source: &Path) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(LAYOUT_FILE_NAME)
}

/// Generate `dest` from `source`, applying the layout in scope if any.
pub fn generate(source: &Path, dest: &Path) -> Result<(), GenerateError> {
    info!(dest = %dest.display(), source = %source.display(), "generating");

    let layout_path = layout_path(source);
    let staging = staging_path(dest);
    let layout = match fs::read(&layout_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::copy(source, &staging).map_err(|e| {
                discard(&staging);
                GenerateError::Copy {
                    from: source.to_path_buf(),
                    to: dest.to_path_buf(),
                    source: e,
                }
            })?;
            return replace(&staging, dest);
        }
        Err(e) => {
            return Err(GenerateError::Read {
                path: layout_path,
                source: e,
            });
        }
    };

    let page = fs::read(source).map_err(|e| GenerateError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    let rendered = template::render(
        &String::from_utf8_lossy(&page),
        &String::from_utf8_lossy(&layout),
    );

    fs::write(&staging, rendered).map_err(|e| {
        discard(&staging);
        GenerateError::Write {
            path: dest.to_path_buf(),
            source: e,
        }
    })?;
    replace(&staging, dest)
}

/// Hidden sibling a page is staged in before it replaces `dest`.
fn staging_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(".pollsite-tmp");
    dest.with_file_name(name)
}

fn replace(staging: &Path, dest: &Path) -> Result<(), GenerateError> {
    fs::rename(staging, dest).map_err(|e| {
        discard(staging);
        GenerateError::Write {
            path: dest.to_path_buf(),
            source: e,
        }
    })
}

/// Best-effort removal of a half-written staging file. The original error
/// is the one reported.
fn discard(staging: &Path) {
    let _ = fs::remove_file(staging);
}
