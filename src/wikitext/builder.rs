//! Utilities for building page trees by hand.
//!
//! Trees normally come from the external parser, but node handlers and tests
//! need to construct them directly.

use super::{Args, Content, Group, HeadingLevel, Node, NodeKind};

/// Creates a node with argument groups and children.
pub fn node(kind: NodeKind, groups: Vec<Group>, children: Vec<Content>) -> Node {
    Node {
        args: Args::Groups(groups),
        children,
        ..Node::new(kind)
    }
}

/// Creates a node with a plain string argument and children.
pub fn node_with_text(kind: NodeKind, text: &str, children: Vec<Content>) -> Node {
    Node {
        args: Args::Text(text.to_string()),
        children,
        ..Node::new(kind)
    }
}

/// Creates a node with neither arguments nor attributes.
pub fn container(kind: NodeKind, children: Vec<Content>) -> Node {
    node(kind, Vec::new(), children)
}

/// Creates a page root.
pub fn root(children: Vec<Content>) -> Node {
    container(NodeKind::Root, children)
}

/// Creates a section heading with a plain text title.
pub fn heading(level: HeadingLevel, title: &str, children: Vec<Content>) -> Node {
    node(
        NodeKind::Heading(level),
        vec![vec![title.into()]],
        children,
    )
}

/// Creates a template call where every argument is a single string.
pub fn template(name: &str, args: &[&str]) -> Node {
    call(NodeKind::Template, name, args)
}

/// Creates a template call with arbitrary argument groups.
pub fn template_with(name: &str, args: Vec<Group>) -> Node {
    let mut groups = vec![vec![name.into()]];
    groups.extend(args);
    node(NodeKind::Template, groups, Vec::new())
}

/// Creates a parser function call where every argument is a single string.
pub fn parser_fn(name: &str, args: &[&str]) -> Node {
    call(NodeKind::ParserFunctionCall, name, args)
}

/// Creates a macro call of the given kind.
fn call(kind: NodeKind, name: &str, args: &[&str]) -> Node {
    let groups = core::iter::once(name)
        .chain(args.iter().copied())
        .map(|arg| vec![arg.into()])
        .collect();
    node(kind, groups, Vec::new())
}

/// Creates an internal link with optional display text groups.
pub fn link(target: &str, display: Vec<Group>) -> Node {
    let mut groups = vec![vec![target.into()]];
    groups.extend(display);
    node(NodeKind::Link, groups, Vec::new())
}

/// Creates a list from list items.
pub fn list(items: Vec<Node>) -> Node {
    container(NodeKind::List, items.into_iter().map(Content::Node).collect())
}

/// Creates a list item with the given raw marker.
pub fn list_item(marker: &str, children: Vec<Content>) -> Node {
    node_with_text(NodeKind::ListItem, marker, children)
}

/// Creates an HTML element.
pub fn html(tag: &str, attrs: &[(&str, &str)], children: Vec<Content>) -> Node {
    Node {
        attrs: attrs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect(),
        ..node_with_text(NodeKind::HtmlElement, tag, children)
    }
}
