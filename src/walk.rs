//! Source tree walking.
//!
//! One walk is one *pass*: every directory under the source root is mirrored
//! into the destination root, and every eligible page is checked for
//! staleness and regenerated if needed.
//!
//! ## Eligibility
//!
//! A file is a page when its name ends in `.html` or `.htm`, does not start
//! with `.` (editor swap files, hidden drafts) and is not `_layout.html`.
//! Everything else is ignored: it is never copied and never an error.
//!
//! ## Ordering and failures
//!
//! Entries are visited depth-first in listing order. A directory's mirror is
//! created before any of its children are processed, including directories
//! that end up with no pages. Each page is fully written before the next
//! entry is looked at. The first filesystem error aborts the pass; pages
//! regenerated earlier in the pass stay on disk and the next pass sorts out
//! the rest. A page counts as attempted before it is written, so a pass that
//! fails on a stale page still reports that the tree changed.
//!
//! Symlinks are not followed and are neither directories nor pages here.

use crate::generate::{self, GenerateError, LAYOUT_FILE_NAME};
use crate::staleness;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to check {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// A page written during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regenerated {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// What a pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Stale pages found, counted before generation starts.
    pub attempted: usize,
    /// Pages written, in the order they were written.
    pub regenerated: Vec<Regenerated>,
    /// Pages whose destination was already current.
    pub up_to_date: usize,
    /// Files skipped by the eligibility filter.
    pub ignored: usize,
    /// Directories mirrored, the root included.
    pub directories: usize,
}

impl PassReport {
    /// Whether any stale page was found, written or not.
    pub fn changed(&self) -> bool {
        self.attempted > 0
    }
}

/// Whether a file name is a page the walker generates.
pub fn is_eligible(file_name: &str) -> bool {
    (file_name.ends_with(".html") || file_name.ends_with(".htm"))
        && !file_name.starts_with('.')
        && file_name != LAYOUT_FILE_NAME
}

/// Run one pass from `src` into `dst`.
pub fn walk(src: &Path, dst: &Path) -> Result<PassReport, WalkError> {
    let mut report = PassReport::default();
    walk_into(src, dst, &mut report)?;
    Ok(report)
}

/// Run one pass, recording into `report` as pages are written.
///
/// On error `report` still holds everything done before the failure.
pub fn walk_into(src: &Path, dst: &Path, report: &mut PassReport) -> Result<(), WalkError> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let target = dst.join(relative_path(&entry));
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|source| WalkError::CreateDir {
                path: target.clone(),
                source,
            })?;
            report.directories += 1;
        } else if file_type.is_file() {
            let eligible = entry.file_name().to_str().is_some_and(is_eligible);
            if !eligible {
                report.ignored += 1;
                continue;
            }
            visit_page(entry.path(), &target, report)?;
        }
    }
    Ok(())
}

/// Path of `entry` below the walk root: its last `depth` components.
fn relative_path(entry: &DirEntry) -> PathBuf {
    let path = entry.path();
    let skip = path.components().count().saturating_sub(entry.depth());
    path.components().skip(skip).collect()
}

fn visit_page(source: &Path, dest: &Path, report: &mut PassReport) -> Result<(), WalkError> {
    let layout = generate::layout_path(source);
    let stale = staleness::needs_regeneration(source, dest, &layout).map_err(|e| {
        WalkError::Stat {
            path: source.to_path_buf(),
            source: e,
        }
    })?;

    if stale {
        report.attempted += 1;
        generate::generate(source, dest)?;
        report.regenerated.push(Regenerated {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
        });
    } else {
        report.up_to_date += 1;
    }
    Ok(())
}
