//! Page tree rendering.
//!
//! A page tree is flattened into a lightly tagged markup string: headings,
//! lists, emphasis, and link text survive as a small set of HTML tags, while
//! tables, references, media, and most templates are dropped. The output is
//! meant for conversion to Markdown, not for display.
//!
//! Rendering is a depth-first walk. Every node produces a list of fragments,
//! which are joined by [`normalize::join_fragments`] before being handed to the
//! parent. Once the whole tree is rendered, [`normalize::postprocess`] cleans
//! up the document as a whole.

use crate::{
    config::{CONFIG, Configuration},
    wikitext::{Content, Group, HeadingLevel, Node, NodeKind},
};
use core::fmt::{self, Write as _};
use regex::Regex;
use std::sync::LazyLock;

pub use catalog::{Signature, TemplateCatalog};
pub use normalize::{BREAK, join_fragments, postprocess};
pub use template::TemplateError;

mod catalog;
mod normalize;
mod template;
#[cfg(test)]
mod tests;

/// A rendering error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A write to a buffer failed.
    #[error("fmt error: {0}")]
    Fmt(#[from] fmt::Error),

    /// The tree contained a node kind the renderer does not know how to
    /// handle. This means the parser and the renderer disagree about the
    /// tree format, so the whole page is abandoned.
    #[error("unimplemented node kind {0}")]
    UnknownKind(String),
}

/// The standard result type used by all fallible renderer functions.
pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// Inline citations, which are always removed together with their content.
static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ref\b[^>]*?/>|<ref\b.*?</ref>").unwrap());

/// Removes inline citations from text.
pub fn strip_citations(text: &str) -> std::borrow::Cow<'_, str> {
    CITATION.replace_all(text, "")
}

/// A per-node rendering override.
///
/// The handler is consulted before every node is rendered. Returning `Some`
/// replaces the node with the returned content, which is rendered in its
/// place (and may itself contain nodes, which are offered to the handler
/// again). Returning `None` renders the node normally.
pub trait NodeHandler {
    /// Returns replacement content for the node, if any.
    fn handle(&self, node: &Node) -> Option<Vec<Content>>;
}

impl<F> NodeHandler for F
where
    F: Fn(&Node) -> Option<Vec<Content>>,
{
    fn handle(&self, node: &Node) -> Option<Vec<Content>> {
        self(node)
    }
}

/// Renders a page tree to flattened markup using the built-in configuration.
///
/// The result has not been post-processed; use [`Renderer::render_document`]
/// for a finished page.
pub fn render(node: &Node, handler: Option<&dyn NodeHandler>) -> Result<String> {
    let mut renderer = Renderer::new(&CONFIG);
    if let Some(handler) = handler {
        renderer = renderer.with_handler(handler);
    }
    renderer.render_node(node)
}

/// A page tree renderer.
pub struct Renderer<'a> {
    /// The renderer configuration.
    config: &'a Configuration,
    /// The per-node override hook.
    handler: Option<&'a dyn NodeHandler>,
    /// Template signature collector for diagnostics.
    catalog: Option<&'a mut TemplateCatalog>,
}

impl<'a> Renderer<'a> {
    /// Creates a new renderer.
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            handler: None,
            catalog: None,
        }
    }

    /// Sets the per-node override hook.
    #[must_use]
    pub fn with_handler(mut self, handler: &'a dyn NodeHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Records template signatures into the given catalog while rendering.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &'a mut TemplateCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Renders a whole page and post-processes the result.
    pub fn render_document(&mut self, root: &Node) -> Result<String> {
        let text = self.render_node(root)?;
        Ok(postprocess(&text))
    }

    /// Renders a run of content.
    pub fn render_contents(&mut self, contents: &[Content]) -> Result<String> {
        let mut out = String::new();
        for content in contents {
            out += &self.render_content(content)?;
        }
        Ok(out)
    }

    /// Renders a single piece of content.
    pub fn render_content(&mut self, content: &Content) -> Result<String> {
        match content {
            Content::Text(text) => Ok(render_text(text)),
            Content::Node(node) => self.render_node(node),
        }
    }

    /// Renders a run of argument groups, concatenated.
    fn render_groups(&mut self, groups: &[Group]) -> Result<String> {
        let mut out = String::new();
        for group in groups {
            out += &self.render_contents(group)?;
        }
        Ok(out)
    }

    /// Renders a single node.
    pub fn render_node(&mut self, node: &Node) -> Result<String> {
        if let Some(handler) = self.handler
            && let Some(replacement) = handler.handle(node)
        {
            // A handler which hands back the node it was given is declining
            // to replace it.
            if !matches!(replacement.as_slice(), [Content::Node(same)] if same == node) {
                return self.render_contents(&replacement);
            }
        }

        let mut parts = Vec::<String>::new();
        match &node.kind {
            NodeKind::Heading(level) => self.render_heading(&mut parts, node, *level)?,
            NodeKind::HorizontalLine => parts.push(BREAK.to_string()),
            NodeKind::List => self.render_list(&mut parts, node)?,
            NodeKind::ListItem => self.render_list_item(&mut parts, node)?,
            NodeKind::PreformattedBlock => {
                parts.push("<pre>".into());
                parts.push(self.render_contents(&node.children)?);
                parts.push("</pre>".into());
            }
            NodeKind::PreformattedInline | NodeKind::Root => {
                parts.push(self.render_contents(&node.children)?);
            }
            NodeKind::Link => self.render_link(&mut parts, node)?,
            NodeKind::Template | NodeKind::ParserFunctionCall => {
                template::dispatch(self, node, &mut parts)?;
            }
            NodeKind::TemplateArgument => {
                parts.push("{{{".into());
                let mut args = Vec::with_capacity(node.groups().len());
                for group in node.groups() {
                    args.push(self.render_contents(group)?);
                }
                parts.push(args.join("|"));
                parts.push("}}}".into());
            }
            NodeKind::Url
            | NodeKind::Table
            | NodeKind::TableCaption
            | NodeKind::TableRow
            | NodeKind::TableHeaderCell
            | NodeKind::TableCell => {}
            NodeKind::MagicWord => {
                parts.push(format!("\n{}\n", node.args.as_text().unwrap_or_default()));
            }
            NodeKind::HtmlElement => self.render_html(&mut parts, node)?,
            NodeKind::Bold => {
                parts.push("<b>".into());
                parts.push(self.render_contents(&node.children)?);
                parts.push("</b>".into());
            }
            NodeKind::Italic => {
                parts.push("<i>".into());
                parts.push(self.render_contents(&node.children)?);
                parts.push("</i>".into());
            }
            NodeKind::Unknown(kind) => return Err(Error::UnknownKind(kind.clone())),
        }

        Ok(join_fragments(&parts))
    }

    /// Renders a section heading and its body, unless the section only holds
    /// notes or references.
    fn render_heading(
        &mut self,
        parts: &mut Vec<String>,
        node: &Node,
        level: HeadingLevel,
    ) -> Result {
        let title = self.render_groups(node.groups())?;
        if self.config.is_elided_heading(&title) {
            log::trace!("Dropping section '{}'", title.trim());
            return Ok(());
        }

        let tag = level.tag_name();
        parts.push(format!("<{tag}>{title}</{tag}>"));
        parts.push(self.render_contents(&node.children)?);
        Ok(())
    }

    /// Renders a list. The list type comes from the marker of the first item.
    fn render_list(&mut self, parts: &mut Vec<String>, node: &Node) -> Result {
        let marker = node
            .children
            .first()
            .and_then(Content::as_node)
            .and_then(|item| item.args.as_text());
        let tag = match marker {
            Some("**") => "ol",
            _ => "ul",
        };
        parts.push(format!("<{tag}>{}</{tag}>", self.render_contents(&node.children)?));
        Ok(())
    }

    /// Renders a list item. Definition terms are not wrapped.
    fn render_list_item(&mut self, parts: &mut Vec<String>, node: &Node) -> Result {
        let is_term = node.args.as_text() == Some(";");
        if !is_term {
            parts.push("<li>".into());
        }
        for child in &node.children {
            let child = self.render_content(child)?;
            if child != "\n" && child != BREAK {
                parts.push(child);
            }
        }
        if !is_term {
            parts.push("</li>".into());
        }
        Ok(())
    }

    /// Renders an internal link as an anchor around its display text. Links
    /// to media and categories are dropped.
    fn render_link(&mut self, parts: &mut Vec<String>, node: &Node) -> Result {
        let groups = node.groups();
        let target = match groups.first() {
            Some(target) => self.render_contents(target)?,
            None => String::new(),
        };
        if target.trim().is_empty() || self.config.is_skipped_link(&target) {
            return Ok(());
        }

        if let Some(text) = groups.iter().rev().find(|group| !is_blank(group)) {
            parts.push(format!(r#"<a href="">{}</a>"#, self.render_contents(text)?));
            parts.push(self.render_contents(&node.children)?);
        }
        Ok(())
    }

    /// Renders an HTML element, except for citations.
    fn render_html(&mut self, parts: &mut Vec<String>, node: &Node) -> Result {
        let tag = node.args.as_text().unwrap_or_default().trim();
        if tag.is_empty() {
            log::warn!("HTML element without a tag name: {node}");
            parts.push(self.render_contents(&node.children)?);
            return Ok(());
        } else if tag.eq_ignore_ascii_case("ref") {
            return Ok(());
        }

        let mut start = format!("<{tag}");
        for (name, value) in &node.attrs {
            write!(
                start,
                r#" {name}="{}""#,
                html_escape::encode_double_quoted_attribute(value)
            )?;
        }

        if !node.children.is_empty() {
            start.push('>');
            parts.push(start);
            parts.push(self.render_contents(&node.children)?);
            parts.push(format!("</{tag}>"));
        } else if self.config.is_void_tag(tag) {
            start.push('>');
            parts.push(start);
        } else {
            start.push_str(" />");
            parts.push(start);
        }
        Ok(())
    }
}

/// Renders a text leaf.
///
/// Wikilink brackets are broken up with an empty `<noinclude/>` so that the
/// output cannot be mistaken for new link markup later, and inline citations
/// are removed.
fn render_text(text: &str) -> String {
    let text = strip_citations(text);
    let bytes = text.as_bytes();
    if memchr::memmem::find(bytes, b"[[").is_none() && memchr::memmem::find(bytes, b"]]").is_none()
    {
        return text.into_owned();
    }
    text.replace("[[", "[<noinclude/>[")
        .replace("]]", "]<noinclude/>]")
}

/// Returns true if an argument group has no content other than whitespace.
fn is_blank(group: &[Content]) -> bool {
    group
        .iter()
        .all(|content| content.as_text().is_some_and(|text| text.trim().is_empty()))
}
