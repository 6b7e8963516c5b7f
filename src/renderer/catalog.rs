//! A catalog of template call signatures, for auditing which templates the
//! renderer drops.

use crate::wikitext::Node;
use indexmap::IndexMap;
use std::{collections::BTreeMap, io};

/// A template call signature.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Signature {
    /// The template name.
    pub name: String,
    /// The number of argument groups, including the name.
    pub arg_count: usize,
}

/// The first example call seen for each distinct template signature.
///
/// Catalogs are cheap to create, so each worker keeps its own and the results
/// are combined with [`Self::merge`].
#[derive(Debug, Default)]
pub struct TemplateCatalog(IndexMap<String, BTreeMap<usize, String>>);

impl TemplateCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a template call unless its signature is already known.
    ///
    /// Templates named only with CJK ideographs are local navigation boxes and
    /// are never recorded.
    ///
    /// Returns true if the call was recorded.
    pub fn record(&mut self, name: &str, arg_count: usize, node: &Node) -> bool {
        if is_ideographic(name) {
            return false;
        }

        if let Some(examples) = self.0.get_mut(name) {
            if examples.contains_key(&arg_count) {
                return false;
            }
            examples.insert(arg_count, node.to_string());
        } else {
            self.0.insert(
                name.to_string(),
                BTreeMap::from([(arg_count, node.to_string())]),
            );
        }
        true
    }

    /// Adds all signatures from `other` which are not already known.
    pub fn merge(&mut self, other: Self) {
        for (name, examples) in other.0 {
            let known = self.0.entry(name).or_default();
            for (arg_count, example) in examples {
                known.entry(arg_count).or_insert(example);
            }
        }
    }

    /// The number of distinct signatures.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Returns true if no signatures have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the example call for a signature.
    pub fn get(&self, name: &str, arg_count: usize) -> Option<&str> {
        self.0.get(name)?.get(&arg_count).map(String::as_str)
    }

    /// Returns all signatures and their examples, sorted by signature.
    pub fn sorted(&self) -> Vec<(Signature, &str)> {
        let mut entries = self
            .0
            .iter()
            .flat_map(|(name, examples)| {
                examples.iter().map(|(arg_count, example)| {
                    (
                        Signature {
                            name: name.clone(),
                            arg_count: *arg_count,
                        },
                        example.as_str(),
                    )
                })
            })
            .collect::<Vec<_>>();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Writes the catalog as tab-separated `name`, `arg_count`, `example`
    /// lines, sorted by signature. Control characters in names are escaped;
    /// examples are already escaped by the inspector.
    pub fn write_tsv<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        for (Signature { name, arg_count }, example) in self.sorted() {
            let name = name.escape_debug();
            writeln!(out, "{name}\t{arg_count}\t{example}")?;
        }
        out.flush()
    }
}

/// Returns true if the string is made entirely of CJK unified ideographs.
fn is_ideographic(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}
