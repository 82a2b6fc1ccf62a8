//! Page header parsing and layout substitution.
//!
//! A source page may start with `NAME = VALUE` lines. Everything after the
//! header becomes the reserved `CONTENT` parameter:
//!
//! ```text
//! TITLE = My Web Page
//! AUTHOR = James Patterson
//!
//! <p>Body text…</p>
//! ```
//!
//! The layout refers to parameters with `$$NAME$$` tokens:
//!
//! ```text
//! <h1>$$TITLE$$</h1>
//! $$CONTENT$$
//! ```
//!
//! ## Header grammar
//!
//! The parser works one line at a time:
//!
//! 1. Drop any blank (whitespace-only) lines at the front.
//! 2. If no line terminator is left, stop: a final unterminated line is content.
//! 3. Split the line on its first `=`. The trimmed left side must consist of
//!    ASCII letters, digits, `-`, `.` or `_` (it may be empty). Otherwise stop.
//! 4. Record `name → value` (value trimmed) and consume the line.
//!
//! Whatever is left, starting with the line that stopped the parser, is stored
//! verbatim as `CONTENT`. Parsing never fails; a malformed header line simply
//! becomes the first line of the content.
//!
//! ## Substitution order
//!
//! Parameters are applied in header order with `CONTENT` last. Each parameter
//! replaces every occurrence of its token in a single left-to-right pass over
//! the current text, so a value that contains its own token cannot loop. A
//! value inserted by an earlier parameter is part of the text the later
//! parameters see: `A = $$B$$` followed by `B = x` renders `$$A$$` as `x`,
//! while a header value containing `$$TITLE$$` inserted through `$$CONTENT$$`
//! stays literal because `TITLE` was already applied.

/// Reserved parameter holding the page body after the header.
pub const CONTENT_KEY: &str = "CONTENT";

/// Ordered parameters parsed from a page header.
///
/// Order is first-occurrence order of the header lines; a repeated name keeps
/// its original position and takes the later value. [`CONTENT_KEY`] is always
/// the last entry once a page has been parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a parameter, keeping first-occurrence order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The page body, if this set came from [`parse_page`].
    pub fn content(&self) -> Option<&str> {
        self.get(CONTENT_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameters in substitution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Set the body as the trailing `CONTENT` entry, replacing any header
    /// line that used the reserved name.
    fn set_content(&mut self, content: &str) {
        self.entries.retain(|(n, _)| n != CONTENT_KEY);
        self.entries
            .push((CONTENT_KEY.to_string(), content.to_string()));
    }
}

/// Parse a page into its header parameters plus `CONTENT`.
pub fn parse_page(text: &str) -> ParameterSet {
    let mut params = ParameterSet::new();
    let mut rest = text;

    loop {
        rest = skip_blank_lines(rest);
        let Some((line, after)) = split_first_line(rest) else {
            break;
        };
        let Some((name, value)) = parse_header_line(line) else {
            break;
        };
        params.insert(name, value);
        rest = after;
    }

    params.set_content(rest);
    params
}

/// Match a single `NAME = VALUE` line (without its terminator).
///
/// Returns the trimmed name and value, or `None` when the line is not a
/// header line.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once('=')?;
    let name = name.trim();
    if !name.chars().all(is_name_char) {
        return None;
    }
    Some((name, value.trim()))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')
}

/// Split off the first line. `None` if the text has no line terminator.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
fn split_first_line(text: &str) -> Option<(&str, &str)> {
    let end = text.find(['\n', '\r'])?;
    let terminator = if text[end..].starts_with("\r\n") { 2 } else { 1 };
    Some((&text[..end], &text[end + terminator..]))
}

fn skip_blank_lines(mut text: &str) -> &str {
    while let Some((line, after)) = split_first_line(text) {
        if !line.trim().is_empty() {
            break;
        }
        text = after;
    }
    text
}

/// The placeholder token for a parameter name.
pub fn token(name: &str) -> String {
    format!("$${name}$$")
}

/// Substitute every parameter into `layout`.
///
/// Tokens without a matching parameter are left in place.
pub fn substitute(params: &ParameterSet, layout: &str) -> String {
    let mut out = layout.to_string();
    for (name, value) in params.iter() {
        let tok = token(name);
        if out.contains(&tok) {
            out = out.replace(&tok, value);
        }
    }
    out
}

/// Parse `page` and render it through `layout`.
pub fn render(page: &str, layout: &str) -> String {
    substitute(&parse_page(page), layout)
}
