//! Compact debug formatting of page trees.
//!
//! The format mirrors the parser's own dump format, for example
//! `<TEMPLATE(["bd"], ["1900"]){} >`, and is used when reporting example
//! template invocations.

use super::{Args, Content, Node};
use core::fmt;

/// Writes the inspector form of a node.
pub(super) fn write_node(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    write!(f, "<{}(", node.kind)?;
    match &node.args {
        Args::Text(text) => write!(f, "{text:?}")?,
        Args::Groups(groups) => {
            for (index, group) in groups.iter().enumerate() {
                if index != 0 {
                    f.write_str(", ")?;
                }
                f.write_str("[")?;
                write_contents(f, group)?;
                f.write_str("]")?;
            }
        }
    }
    f.write_str("){")?;
    for (index, (name, value)) in node.attrs.iter().enumerate() {
        if index != 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}={value:?}")?;
    }
    f.write_str("} ")?;
    write_contents(f, &node.children)?;
    f.write_str(">")
}

/// Writes a comma-separated run of content.
fn write_contents(f: &mut fmt::Formatter<'_>, contents: &[Content]) -> fmt::Result {
    for (index, content) in contents.iter().enumerate() {
        if index != 0 {
            f.write_str(", ")?;
        }
        match content {
            Content::Text(text) => write!(f, "{text:?}")?,
            Content::Node(node) => write_node(f, node)?,
        }
    }
    Ok(())
}
