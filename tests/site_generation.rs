//! End-to-end generation scenarios through the public API.

use pollsite::{generate_site, walk};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn touch_future(path: &Path, secs: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(secs))
        .unwrap();
}

struct Site {
    _tmp: TempDir,
    src: PathBuf,
    dst: PathBuf,
}

fn site(files: &[(&str, &str)]) -> Site {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("site");
    let dst = tmp.path().join("public");
    fs::create_dir_all(&src).unwrap();
    for (relative, content) in files {
        write(&src, relative, content);
    }
    Site { _tmp: tmp, src, dst }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn layout_is_applied_to_page() {
    let s = site(&[
        ("_layout.html", "<h1>$$TITLE$$</h1>$$CONTENT$$"),
        ("page.html", "TITLE = Hello\n\nWorld"),
    ]);

    walk::walk(&s.src, &s.dst).unwrap();

    assert_eq!(
        fs::read_to_string(s.dst.join("page.html")).unwrap(),
        "<h1>Hello</h1>World"
    );
}

#[test]
fn nested_page_without_layout_is_copied_and_directories_mirrored() {
    let s = site(&[("a/b/c.html", "TITLE = kept\n<p>raw</p>\n")]);

    walk::walk(&s.src, &s.dst).unwrap();

    assert!(s.dst.join("a").is_dir());
    assert!(s.dst.join("a/b").is_dir());
    assert_eq!(
        fs::read(s.dst.join("a/b/c.html")).unwrap(),
        fs::read(s.src.join("a/b/c.html")).unwrap()
    );
}

#[test]
fn ineligible_files_never_reach_destination() {
    let s = site(&[
        (".hidden.html", "secret"),
        ("notes.txt", "notes"),
        ("_layout.html", "$$CONTENT$$"),
        ("config.toml", "[schedule]\n"),
        ("index.html", "home"),
    ]);

    walk::walk(&s.src, &s.dst).unwrap();

    assert!(!s.dst.join(".hidden.html").exists());
    assert!(!s.dst.join("notes.txt").exists());
    assert!(!s.dst.join("_layout.html").exists());
    assert!(!s.dst.join("config.toml").exists());
    assert!(s.dst.join("index.html").exists());
}

#[test]
fn second_pass_is_idempotent() {
    let s = site(&[
        ("_layout.html", "<title>$$TITLE$$</title>$$CONTENT$$"),
        ("index.html", "TITLE = Home\nhello"),
        ("docs/guide.htm", "guide"),
    ]);

    let first = walk::walk(&s.src, &s.dst).unwrap();
    let second = walk::walk(&s.src, &s.dst).unwrap();

    assert_eq!(first.regenerated.len(), 2);
    assert!(second.regenerated.is_empty());
    assert_eq!(second.up_to_date, 2);
}

#[test]
fn newer_layout_triggers_regeneration_of_fresh_page() {
    let s = site(&[
        ("_layout.html", "old:$$CONTENT$$"),
        ("page.html", "body"),
    ]);
    walk::walk(&s.src, &s.dst).unwrap();

    // destination newer than the source, layout newer than the destination
    touch_future(&s.dst.join("page.html"), 30);
    fs::write(s.src.join("_layout.html"), "new:$$CONTENT$$").unwrap();
    touch_future(&s.src.join("_layout.html"), 60);

    let report = walk::walk(&s.src, &s.dst).unwrap();

    assert_eq!(report.regenerated.len(), 1);
    assert_eq!(
        fs::read_to_string(s.dst.join("page.html")).unwrap(),
        "new:body"
    );
}

#[test]
fn regeneration_overwrites_previous_substitutions() {
    let s = site(&[
        ("_layout.html", "[$$TITLE$$|$$SUBTITLE$$]"),
        ("page.html", "TITLE = one\nSUBTITLE = two\nbody"),
    ]);
    walk::walk(&s.src, &s.dst).unwrap();
    assert_eq!(
        fs::read_to_string(s.dst.join("page.html")).unwrap(),
        "[one|two]"
    );

    fs::write(s.src.join("page.html"), "TITLE = three\nbody").unwrap();
    touch_future(&s.src.join("page.html"), 60);
    walk::walk(&s.src, &s.dst).unwrap();

    assert_eq!(
        fs::read_to_string(s.dst.join("page.html")).unwrap(),
        "[three|$$SUBTITLE$$]"
    );
}

#[test]
fn generate_site_produces_output_and_stops() {
    let s = site(&[
        ("_layout.html", "<body>$$CONTENT$$</body>"),
        ("index.html", "hi"),
    ]);

    let handle = generate_site(&s.src, &s.dst, |err| panic!("unexpected error: {err}")).unwrap();
    assert_eq!(
        fs::read_to_string(s.dst.join("index.html")).unwrap(),
        "<body>hi</body>"
    );
    assert!(!handle.is_finished());
    handle.stop();
}
