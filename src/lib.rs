//! # pollsite
//!
//! A polling static site generator. It mirrors the HTML pages of a source
//! tree into a destination tree, pours each page through the `_layout.html`
//! next to it, and keeps the destination fresh by re-scanning the source on
//! an adaptive timer. There are no filesystem notifications involved: the
//! tree is simply looked at again, more often right after an edit and less
//! often while nothing happens.
//!
//! # Architecture
//!
//! ```text
//! schedule ─▶ walk ─▶ (per page) staleness ─▶ generate ─▶ template
//!    ▲                                                        │
//!    └──────────────── pass report (anything written?) ◀──────┘
//! ```
//!
//! A *pass* walks the whole source tree. Directories are mirrored, pages are
//! checked against their destination and regenerated when stale, and the
//! pass report tells the schedule whether to speed up or keep slowing down.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`staleness`] | Decides whether a page must be regenerated (source, destination, layout timestamps) |
//! | [`template`] | Parses `NAME = VALUE` page headers and substitutes `$$NAME$$` tokens into a layout |
//! | [`generate`] | Writes one page: verbatim copy, or rendered through the directory's layout |
//! | [`walk`] | One pass over the tree: eligibility filter, directory mirroring, pass report |
//! | [`schedule`] | Adaptive polling interval with a quiet-window staircase |
//! | [`site`] | [`generate_site`]: first pass, background loop, stop handle |
//! | [`config`] | Optional `config.toml` for schedule tuning |
//! | [`output`] | CLI output formatting for pass reports |
//!
//! # Pages and Layouts
//!
//! Only `.html`/`.htm` files are published; hidden files and `_layout.html`
//! itself are skipped. A page in a directory without a layout is copied
//! byte-for-byte. A page in a directory with a layout is split into header
//! parameters and `CONTENT`, and each `$$NAME$$` in the layout is replaced:
//!
//! ```text
//! _layout.html:  <h1>$$TITLE$$</h1>$$CONTENT$$
//! page.html:     TITLE = Hello
//!
//!                World
//! output:        <h1>Hello</h1>World
//! ```
//!
//! Layouts are not inherited: a subdirectory without its own `_layout.html`
//! publishes its pages verbatim.
//!
//! # Freshness
//!
//! A page is regenerated when its output is missing, or older than either the
//! page or the layout. Editing a layout therefore republishes every page in
//! its directory on the next pass. A page is staged next to its destination
//! and renamed over it, so a failed write leaves the previous output (still
//! stale) for the next pass to retry.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let handle = pollsite::generate_site(Path::new("site"), Path::new("public"), |err| {
//!     eprintln!("pass failed: {err}");
//! })?;
//! // ... serve `public/` ...
//! handle.stop();
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod config;
pub mod generate;
pub mod output;
pub mod schedule;
pub mod site;
pub mod staleness;
pub mod template;
pub mod walk;

pub use site::{SiteGenerator, SiteHandle, generate_site, generate_site_with};
pub use walk::{PassReport, WalkError};

#[cfg(test)]
pub(crate) mod test_helpers;
