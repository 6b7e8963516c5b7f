//! Parsed Wikitext page trees.
//!
//! Trees are produced by an external Wikitext parser, one per page, and are
//! handed over as JSON. The renderer only ever reads them.
//!
//! ```json
//! {"kind": "LEVEL2", "args": [["History"]], "children": ["\nSome text\n"]}
//! ```
//!
//! The `args` of a node are usually a list of argument groups, each of which
//! is a list of [`Content`]. A handful of kinds (list items, HTML elements,
//! magic words) instead carry a single plain string.

use core::fmt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod builder;
mod inspectors;

/// A single argument group: an ordered run of literal text and nested nodes.
pub type Group = Vec<Content>;

/// A piece of inline content.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// A literal text leaf.
    Text(String),
    /// A nested node.
    Node(Node),
}

impl Content {
    /// Returns the literal text, if this content is a text leaf.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Node(_) => None,
        }
    }

    /// Returns the node, if this content is a node.
    #[inline]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Content::Text(_) => None,
            Content::Node(node) => Some(node),
        }
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Node> for Content {
    fn from(value: Node) -> Self {
        Self::Node(value)
    }
}

/// The arguments of a node.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Args {
    /// A single plain string.
    ///
    /// ```wikitext
    /// ** item        <span>
    /// ^^ (ListItem)   ^^^^ (HtmlElement)
    /// ```
    Text(String),
    /// Ordered argument groups.
    ///
    /// ```wikitext
    /// {{bd|1900|1950}}
    ///   ^^ ^^^^ ^^^^
    /// ```
    Groups(Vec<Group>),
}

impl Args {
    /// Returns the argument groups, or an empty slice if the arguments are
    /// a plain string.
    #[inline]
    pub fn groups(&self) -> &[Group] {
        match self {
            Args::Text(_) => &[],
            Args::Groups(groups) => groups,
        }
    }

    /// Returns the plain string argument, if there is one.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Args::Text(text) => Some(text),
            Args::Groups(_) => None,
        }
    }

    /// Returns true if there are no arguments at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            Args::Text(text) => text.is_empty(),
            Args::Groups(groups) => groups.is_empty(),
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::Groups(Vec::new())
    }
}

/// A node of a parsed page tree.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Node {
    /// What structural role the node plays.
    pub kind: NodeKind,
    /// The node arguments. Their meaning depends on [`Self::kind`].
    #[serde(default, skip_serializing_if = "Args::is_empty")]
    pub args: Args,
    /// The child content.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Content>,
    /// HTML attributes, in source order. Only HTML elements and table cells
    /// have these.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attrs: IndexMap<String, String>,
}

impl Node {
    /// Creates a new childless node of the given kind with no arguments.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            args: <_>::default(),
            children: <_>::default(),
            attrs: <_>::default(),
        }
    }

    /// The argument groups of the node.
    #[inline]
    pub fn groups(&self) -> &[Group] {
        self.args.groups()
    }

    /// The name of a template or parser function call.
    ///
    /// This is the first element of the first argument group, which must be
    /// a literal string. Malformed calls have no name.
    pub fn macro_name(&self) -> Option<&str> {
        self.groups().first()?.first()?.as_text()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        inspectors::write_node(f, self)
    }
}

/// A conversion error for out-of-range heading levels.
#[derive(Debug, thiserror::Error)]
#[error("{0} is not a valid section heading level")]
pub struct HeadingRangeError(u8);

/// A section heading level. Wikitext headings that produce page sections are
/// levels 2 through 6; level 1 is reserved for the page title.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// `==Heading==`.
    pub const H2: Self = Self(2);
    /// `===Heading===`.
    pub const H3: Self = Self(3);
    /// `====Heading====`.
    pub const H4: Self = Self(4);
    /// `=====Heading=====`.
    pub const H5: Self = Self(5);
    /// `======Heading======`.
    pub const H6: Self = Self(6);

    /// Returns the HTML tag name corresponding to this heading level.
    pub fn tag_name(self) -> &'static str {
        const TAGS: [&str; 5] = ["h2", "h3", "h4", "h5", "h6"];
        TAGS[usize::from(self.0) - 2]
    }
}

impl From<HeadingLevel> for u8 {
    fn from(value: HeadingLevel) -> Self {
        value.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = HeadingRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (2..=6).contains(&value) {
            Ok(Self(value))
        } else {
            Err(HeadingRangeError(value))
        }
    }
}

/// The structural role of a [`Node`].
///
/// Kinds are serialised using the parser's upper-case names (`LEVEL2`,
/// `LIST_ITEM`, `HTML`, …). A name this crate does not know about is kept as
/// [`NodeKind::Unknown`] so that the tree still loads; rendering such a node
/// is an error.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    /// The root of a page.
    Root,
    /// A section heading. The title is in the single argument group, and the
    /// section body is in the children.
    Heading(HeadingLevel),
    /// A horizontal rule.
    HorizontalLine,
    /// A list. Its children are list items.
    List,
    /// A list item. The argument is the raw list marker.
    ListItem,
    /// A `<pre>` block.
    PreformattedBlock,
    /// A space-indented preformatted run.
    PreformattedInline,
    /// An internal link. The first argument group is the target; later groups
    /// are display text.
    Link,
    /// A template call.
    Template,
    /// A template parameter reference (`{{{1|default}}}`).
    TemplateArgument,
    /// A parser function call (`{{#if:…}}`).
    ParserFunctionCall,
    /// An external URL.
    Url,
    /// A table.
    Table,
    /// A table caption.
    TableCaption,
    /// A table row.
    TableRow,
    /// A table header cell.
    TableHeaderCell,
    /// A table data cell.
    TableCell,
    /// A magic word. The argument is echoed verbatim.
    MagicWord,
    /// An HTML element. The argument is the tag name.
    HtmlElement,
    /// Bold text.
    Bold,
    /// Italic text.
    Italic,
    /// A kind not supported by this crate.
    Unknown(String),
}

impl NodeKind {
    /// The serialised name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Root => "ROOT",
            NodeKind::Heading(level) => match u8::from(*level) {
                2 => "LEVEL2",
                3 => "LEVEL3",
                4 => "LEVEL4",
                5 => "LEVEL5",
                _ => "LEVEL6",
            },
            NodeKind::HorizontalLine => "HLINE",
            NodeKind::List => "LIST",
            NodeKind::ListItem => "LIST_ITEM",
            NodeKind::PreformattedBlock => "PRE",
            NodeKind::PreformattedInline => "PREFORMATTED",
            NodeKind::Link => "LINK",
            NodeKind::Template => "TEMPLATE",
            NodeKind::TemplateArgument => "TEMPLATE_ARG",
            NodeKind::ParserFunctionCall => "PARSER_FN",
            NodeKind::Url => "URL",
            NodeKind::Table => "TABLE",
            NodeKind::TableCaption => "TABLE_CAPTION",
            NodeKind::TableRow => "TABLE_ROW",
            NodeKind::TableHeaderCell => "TABLE_HEADER_CELL",
            NodeKind::TableCell => "TABLE_CELL",
            NodeKind::MagicWord => "MAGIC_WORD",
            NodeKind::HtmlElement => "HTML",
            NodeKind::Bold => "BOLD",
            NodeKind::Italic => "ITALIC",
            NodeKind::Unknown(name) => name,
        }
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ROOT" => NodeKind::Root,
            "HLINE" => NodeKind::HorizontalLine,
            "LIST" => NodeKind::List,
            "LIST_ITEM" => NodeKind::ListItem,
            "PRE" => NodeKind::PreformattedBlock,
            "PREFORMATTED" => NodeKind::PreformattedInline,
            "LINK" => NodeKind::Link,
            "TEMPLATE" => NodeKind::Template,
            "TEMPLATE_ARG" => NodeKind::TemplateArgument,
            "PARSER_FN" => NodeKind::ParserFunctionCall,
            "URL" => NodeKind::Url,
            "TABLE" => NodeKind::Table,
            "TABLE_CAPTION" => NodeKind::TableCaption,
            "TABLE_ROW" => NodeKind::TableRow,
            "TABLE_HEADER_CELL" => NodeKind::TableHeaderCell,
            "TABLE_CELL" => NodeKind::TableCell,
            "MAGIC_WORD" => NodeKind::MagicWord,
            "HTML" => NodeKind::HtmlElement,
            "BOLD" => NodeKind::Bold,
            "ITALIC" => NodeKind::Italic,
            level => level
                .strip_prefix("LEVEL")
                .and_then(|level| level.parse::<u8>().ok())
                .and_then(|level| HeadingLevel::try_from(level).ok())
                .map_or(NodeKind::Unknown(value), NodeKind::Heading),
        }
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        match value {
            NodeKind::Unknown(name) => name,
            kind => kind.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
