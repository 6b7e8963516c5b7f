//! Flattens parsed wiki pages into lightly tagged markup for conversion to
//! plain text or Markdown.
//!
//! The input is a page tree produced by an external wikitext parser (see
//! [`wikitext`]). [`renderer`] walks the tree and keeps only the parts of a
//! page that read as prose: headings, lists, emphasis, link text, and the
//! output of a few well-understood templates. [`pages`] wraps this for whole
//! page records.

pub mod config;
pub mod pages;
pub mod renderer;
pub mod wikitext;
