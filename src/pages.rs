//! Per-page rendering.
//!
//! A page record carries the tree produced by the external parser plus enough
//! metadata to decide whether the page is article content at all. Rendering
//! failures are confined to the page that caused them.

use crate::{
    renderer::{self, Renderer},
    wikitext::Node,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt, sync::LazyLock, time::Instant};

/// The content model of ordinary wiki pages.
pub const WIKITEXT_MODEL: &str = "wikitext";

/// The template namespace prefix.
const TEMPLATE_NAMESPACE: &str = "Template:";

/// An indented table, which the external parser handles badly.
static INDENTED_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s):\{\|.*?\|\}").unwrap());

/// A parsed page.
#[derive(Clone, Debug, Deserialize)]
pub struct Page {
    /// The page title.
    pub title: String,
    /// The page content model.
    #[serde(default = "default_model")]
    pub model: String,
    /// The redirect target, if the page is a redirect.
    #[serde(default)]
    pub redirect_to: Option<String>,
    /// The parsed page body, if the page has one.
    #[serde(default)]
    pub root: Option<Node>,
}

fn default_model() -> String {
    WIKITEXT_MODEL.to_string()
}

/// The reason a page was not rendered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SkipReason {
    /// The page is not wikitext (e.g. a script or stylesheet).
    NotWikitext,
    /// The page is a template.
    Template,
    /// The page is a redirect.
    Redirect,
    /// The page has no body.
    Empty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NotWikitext => "not wikitext",
            SkipReason::Template => "template page",
            SkipReason::Redirect => "redirect",
            SkipReason::Empty => "no content",
        })
    }
}

/// A successfully rendered page.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RenderedPage {
    /// The page title.
    pub title: String,
    /// The flattened page text.
    pub text: String,
}

/// A page which could not be rendered.
#[derive(Debug, thiserror::Error)]
#[error("failed to render '{title}': {source}")]
pub struct PageError {
    /// The page title.
    pub title: String,
    /// The render failure.
    pub source: renderer::Error,
}

impl Page {
    /// Returns the reason this page should not be rendered, if any.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.model != WIKITEXT_MODEL {
            Some(SkipReason::NotWikitext)
        } else if self.title.starts_with(TEMPLATE_NAMESPACE) {
            Some(SkipReason::Template)
        } else if self.redirect_to.is_some() {
            Some(SkipReason::Redirect)
        } else if self.root.is_none() {
            Some(SkipReason::Empty)
        } else {
            None
        }
    }
}

/// Renders a page into its final text.
///
/// Returns `Ok(None)` if the page is skipped. On error, nothing of the page is
/// returned.
pub fn render_page(
    page: &Page,
    renderer: &mut Renderer<'_>,
) -> Result<Option<RenderedPage>, PageError> {
    if let Some(reason) = page.skip_reason() {
        log::trace!("Skipping '{}': {reason}", page.title);
        return Ok(None);
    }
    let Some(root) = &page.root else {
        return Ok(None);
    };

    let time = Instant::now();
    let text = renderer
        .render_document(root)
        .map_err(|source| PageError {
            title: page.title.clone(),
            source,
        })?;
    log::debug!("Rendered '{}' in {:.2?}", page.title, time.elapsed());

    Ok(Some(RenderedPage {
        title: page.title.clone(),
        text,
    }))
}

/// Removes indented tables (`:{| … |}`) from raw page source. This runs before
/// the source is handed to the parser.
pub fn strip_indented_tables(source: &str) -> Cow<'_, str> {
    INDENTED_TABLE.replace_all(source, "")
}
