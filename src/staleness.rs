//! Staleness detection for generated pages.
//!
//! A destination page is stale when it is missing, when its source was touched
//! after it was written, or when the `_layout.html` that applies to the source
//! was touched after it was written. The layout is the only dependency edge:
//! editing it invalidates every page generated through it.
//!
//! ## Timestamps
//!
//! Every comparison uses the later of a file's change time (`ctime`) and
//! modification time (`mtime`). Tools that restore an old `mtime` (archive
//! extraction, `cp -p`, `git checkout` on some setups) still bump `ctime`, so
//! taking the max keeps those edits visible. On platforms without a `ctime`
//! only the modification time is used.
//!
//! Comparisons are strict: equal timestamps mean "current". A page written in
//! the same clock tick as its source is not regenerated on the next pass.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Decide whether `dest` must be regenerated from `source`.
///
/// `layout` is the layout path that would apply to `source`; it does not
/// have to exist. A missing destination or layout is a normal answer, not an
/// error. Every other filesystem failure (including a missing source) is
/// returned to the caller.
pub fn needs_regeneration(source: &Path, dest: &Path, layout: &Path) -> io::Result<bool> {
    let dest_time = match stat_if_exists(dest)? {
        Some(meta) => last_changed(&meta)?,
        None => return Ok(true),
    };

    let source_time = last_changed(&fs::metadata(source)?)?;
    if source_time > dest_time {
        return Ok(true);
    }

    match stat_if_exists(layout)? {
        Some(meta) => Ok(last_changed(&meta)? > dest_time),
        None => Ok(false),
    }
}

/// The later of a file's change time and modification time.
pub fn last_changed(meta: &Metadata) -> io::Result<SystemTime> {
    let modified = meta.modified()?;
    Ok(match change_time(meta) {
        Some(changed) if changed > modified => changed,
        _ => modified,
    })
}

fn stat_if_exists(path: &Path) -> io::Result<Option<Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn change_time(meta: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    let secs = u64::try_from(meta.ctime()).ok()?;
    let nanos = u32::try_from(meta.ctime_nsec()).ok()?;
    UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_meta: &Metadata) -> Option<SystemTime> {
    None
}
