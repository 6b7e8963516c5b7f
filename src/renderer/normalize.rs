//! Line break normalisation for rendered fragments and whole documents.
//!
//! Raw newlines in the tree are incidental source formatting. Only a blank
//! line (or a fragment that is nothing but a newline) is a real break, and it
//! is written as an explicit [`BREAK`] marker.

use regex::Regex;
use std::sync::LazyLock;

/// The break marker.
pub const BREAK: &str = "<br>";

/// Two or more newlines.
static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Two or more break markers.
static BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:<br>){2,}").unwrap());

/// Break markers at the start of a fragment.
static LEADING_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:<br>)+").unwrap());

/// A heading end tag followed by a break marker.
static HEADING_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(</h[2-6]>)<br>").unwrap());

/// A section heading tag.
static HEADING_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?h([2-6])>").unwrap());

/// A heading end tag with nothing after it.
static FINAL_HEADING_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</h([2-6])>\s*\z").unwrap());

/// Joins the fragments rendered for a single node.
///
/// A fragment that is exactly a newline becomes a break; inside a fragment,
/// a run of newlines becomes a single break and any other newline is deleted.
/// In the joined result, runs of breaks collapse to one and leading breaks are
/// removed.
pub fn join_fragments<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for part in parts {
        let part = part.as_ref();
        if part == "\n" {
            out += BREAK;
        } else if memchr::memchr(b'\n', part.as_bytes()).is_none() {
            out += part;
        } else {
            let part = NEWLINES.replace_all(part, BREAK);
            out.extend(part.split('\n'));
        }
    }

    let out = BREAKS.replace_all(&out, BREAK);
    LEADING_BREAKS.replace(&out, "").into_owned()
}

/// Cleans up a fully rendered document.
///
/// 1. Runs of breaks collapse to one.
/// 2. A break straight after a heading end tag is removed.
/// 3. A heading at the very end of the document, whose section body was
///    entirely dropped during rendering, is removed.
pub fn postprocess(text: &str) -> String {
    let text = BREAKS.replace_all(text, BREAK);
    let text = HEADING_BREAK.replace_all(&text, "${1}");
    match final_heading_start(&text) {
        Some(start) => text[..start].to_string(),
        None => text.into_owned(),
    }
}

/// Returns the start of the heading which ends the document, if there is
/// one. The heading body may not contain another heading tag, so this is
/// always the last start tag in the document.
fn final_heading_start(text: &str) -> Option<usize> {
    let end = FINAL_HEADING_END.captures(text)?;
    let end_start = end.get(0)?.start();
    let start = HEADING_TAG.captures_iter(&text[..end_start]).last()?;
    let start_tag = start.get(0)?;
    let is_match = !start_tag.as_str().starts_with("</")
        && start.get(1).map(|level| level.as_str()) == end.get(1).map(|level| level.as_str());
    is_match.then_some(start_tag.start())
}
