//! Renderer configuration.
//!
//! The defaults are tuned for the Chinese Wikipedia dump this tool was first
//! written for. Any of them can be replaced by a JSON configuration file.

use serde::Deserialize;
use std::{collections::HashSet, path::Path, sync::LazyLock};

/// Section headings which are dropped together with their bodies, in both
/// simplified and traditional script.
pub static ELIDED_HEADINGS: phf::Set<&str> = phf::phf_set! {
    // Footnotes
    "脚注", "腳註",
    // References
    "参考文献", "參考文獻", "参考", "參考",
    // External links
    "外部链接", "外部連結",
    // Notes
    "注释", "註釋",
};

/// Link target prefixes which never render as links.
pub const LINK_SKIP_PREFIXES: &[&str] = &["File:", "Category:"];

/// Void HTML5 tags.
pub static VOID_TAGS: phf::Set<&str> = phf::phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img",
    "input", "link", "meta", "param", "source",
    "track", "wbr",
};

/// A configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file was not valid.
    #[error("config syntax error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-supplied configuration overrides. Omitted fields use the built-in
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigurationSource {
    /// Replacement for [`ELIDED_HEADINGS`].
    pub elided_headings: Option<Vec<String>>,

    /// Replacement for [`LINK_SKIP_PREFIXES`].
    pub link_skip_prefixes: Option<Vec<String>>,

    /// Replacement for [`VOID_TAGS`].
    pub void_tags: Option<Vec<String>>,
}

/// Processed configuration data for the renderer.
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Headings whose rendered title is in this set are dropped with their
    /// section body.
    pub elided_headings: HashSet<String>,
    /// Links whose target starts with any of these prefixes are dropped.
    pub link_skip_prefixes: Vec<String>,
    /// Childless HTML elements with these names are written as a bare start
    /// tag instead of a self-closing tag.
    pub void_tags: HashSet<String>,
}

impl Configuration {
    /// Builds a configuration from the given overrides.
    #[must_use]
    pub fn new(source: ConfigurationSource) -> Self {
        Self {
            elided_headings: source.elided_headings.map_or_else(
                || ELIDED_HEADINGS.iter().map(|s| (*s).to_string()).collect(),
                |headings| headings.into_iter().collect(),
            ),
            link_skip_prefixes: source.link_skip_prefixes.unwrap_or_else(|| {
                LINK_SKIP_PREFIXES.iter().map(|s| (*s).to_string()).collect()
            }),
            void_tags: source.void_tags.map_or_else(
                || VOID_TAGS.iter().map(|s| (*s).to_string()).collect(),
                |tags| tags.into_iter().map(|tag| tag.to_ascii_lowercase()).collect(),
            ),
        }
    }

    /// Loads configuration overrides from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }

    /// Returns true if a heading with this rendered title should be dropped.
    #[inline]
    pub fn is_elided_heading(&self, title: &str) -> bool {
        self.elided_headings.contains(title.trim())
    }

    /// Returns true if a link to this target should be dropped. As with
    /// namespace names, the first letter of a prefix matches either case.
    #[inline]
    pub fn is_skipped_link(&self, target: &str) -> bool {
        let target = target.trim_start();
        self.link_skip_prefixes
            .iter()
            .any(|prefix| has_namespace_prefix(target, prefix))
    }

    /// Returns true if the given element never has an end tag.
    #[inline]
    pub fn is_void_tag(&self, name: &str) -> bool {
        self.void_tags.contains(&name.to_ascii_lowercase())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(ConfigurationSource::default())
    }
}

/// Returns true if `target` starts with `prefix`, ignoring the case of the
/// first letter.
fn has_namespace_prefix(target: &str, prefix: &str) -> bool {
    let mut target = target.chars();
    let mut prefix = prefix.chars();
    match (target.next(), prefix.next()) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(t), Some(p)) => {
            t.to_lowercase().eq(p.to_lowercase()) && target.as_str().starts_with(prefix.as_str())
        }
    }
}

/// The built-in configuration.
pub static CONFIG: LazyLock<Configuration> = LazyLock::new(Configuration::default);
