//! Template call rendering.
//!
//! Templates are not expanded. Instead, a short list of rules recognises the
//! handful of templates whose meaning is plain text (dates, glosses, quotes,
//! citation titles) and writes that text directly. Everything else is
//! dropped, since guessing at the output of an unknown template produces
//! worse text than leaving it out.

use super::{Error, Renderer, strip_citations};
use crate::wikitext::{Group, Node, NodeKind};

/// A template rule failure. Apart from a tree the renderer cannot handle at
/// all, these never escape [`dispatch`]; the template just produces no output.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A required positional argument was not given.
    #[error("missing argument {0}")]
    MissingArgument(usize),

    /// An argument could not be rendered.
    #[error(transparent)]
    Render(#[from] Error),
}

/// The signature of a rule body.
type Apply = fn(&mut Arguments<'_, '_, '_>) -> Result<Option<String>, TemplateError>;

/// A template rendering rule.
struct Rule {
    /// The rule name, for diagnostics.
    name: &'static str,
    /// Returns true if the rule applies to a template with the given name and
    /// total number of argument groups (including the name).
    matches: fn(&str, usize) -> bool,
    /// Produces the text for the template, if any.
    apply: Apply,
}

/// Template rules, in priority order. The first matching rule wins.
static RULES: &[Rule] = &[
    // These render the quote a second time in a side box, which just
    // duplicates text.
    Rule {
        name: "quote box",
        matches: |name, _| name.starts_with("Quote box"),
        apply: |_| Ok(None),
    },
    Rule {
        name: "quote",
        matches: |name, _| matches!(name, "quote" | "cquote"),
        apply: quote,
    },
    Rule {
        name: "birth-death",
        matches: |name, _| name == "bd",
        apply: birth_death,
    },
    Rule {
        name: "language tag",
        matches: |name, _| name.starts_with("lang-") || name == "lang",
        apply: |args| args.last_non_empty(),
    },
    Rule {
        name: "linked entry",
        matches: |name, _| name == "le",
        apply: |args| match args.len() {
            2 => pair_or_last(args),
            1 => Ok(args.eval(0)?.map(str::to_string)),
            _ => Ok(None),
        },
    },
    Rule {
        name: "interlanguage link",
        matches: |name, _| name.starts_with("link-"),
        apply: |args| {
            if args.len() == 2 {
                pair_or_last(args)
            } else {
                Ok(None)
            }
        },
    },
    Rule {
        name: "citation",
        matches: |name, _| name.starts_with("Cite "),
        apply: citation_title,
    },
    Rule {
        name: "navigation",
        matches: |_, count| count == 1 || count == 2,
        apply: |args| {
            log::debug!("Dropping navigational template '{}'", args.name);
            Ok(None)
        },
    },
    Rule {
        name: "unknown",
        matches: |_, _| true,
        apply: |args| {
            log::trace!("Dropping unhandled template '{}'", args.name);
            Ok(None)
        },
    },
];

/// Lazily rendered template arguments.
pub(super) struct Arguments<'r, 'a, 'n> {
    /// The template name.
    name: &'n str,
    /// The renderer used to evaluate arguments.
    renderer: &'r mut Renderer<'a>,
    /// The argument groups, excluding the template name.
    groups: &'n [Group],
    /// Already rendered arguments.
    cache: Vec<Option<String>>,
}

impl<'r, 'a, 'n> Arguments<'r, 'a, 'n> {
    /// Creates a new argument list.
    fn new(name: &'n str, renderer: &'r mut Renderer<'a>, groups: &'n [Group]) -> Self {
        Self {
            name,
            renderer,
            groups,
            cache: vec![None; groups.len()],
        }
    }

    /// The number of arguments.
    #[inline]
    fn len(&self) -> usize {
        self.groups.len()
    }

    /// Renders the argument at the given index, if it exists.
    fn eval(&mut self, index: usize) -> Result<Option<&str>, TemplateError> {
        let groups = self.groups;
        let Some(group) = groups.get(index) else {
            return Ok(None);
        };
        if self.cache[index].is_none() {
            self.cache[index] = Some(self.renderer.render_contents(group)?);
        }
        Ok(self.cache[index].as_deref())
    }

    /// Renders all arguments which are not blank.
    fn non_empty(&mut self) -> Result<Vec<String>, TemplateError> {
        let mut out = Vec::new();
        for index in 0..self.len() {
            if let Some(value) = self.eval(index)?
                && !value.trim().is_empty()
            {
                out.push(value.to_string());
            }
        }
        Ok(out)
    }

    /// Renders the last argument which is not blank.
    fn last_non_empty(&mut self) -> Result<Option<String>, TemplateError> {
        for index in (0..self.len()).rev() {
            if let Some(value) = self.eval(index)?
                && !value.trim().is_empty()
            {
                return Ok(Some(value.to_string()));
            }
        }
        Ok(None)
    }
}

/// Renders a template or parser function call into `parts`.
///
/// Parser functions are never rendered. Template rules that fail are logged
/// and produce nothing. The exception is an unknown node kind in an argument
/// the rule rendered, which fails the whole page like it would anywhere else.
/// Arguments a rule never looks at are never rendered.
pub(super) fn dispatch(
    renderer: &mut Renderer<'_>,
    node: &Node,
    parts: &mut Vec<String>,
) -> Result<(), Error> {
    if node.kind == NodeKind::ParserFunctionCall {
        return Ok(());
    }

    let Some(name) = node.macro_name().map(str::trim).filter(|name| !name.is_empty()) else {
        log::debug!("Skipping template without a name: {node}");
        return Ok(());
    };

    let groups = node.groups();
    if let Some(catalog) = renderer.catalog.as_deref_mut() {
        catalog.record(name, groups.len(), node);
    }

    let Some(rule) = RULES.iter().find(|rule| (rule.matches)(name, groups.len())) else {
        return Ok(());
    };

    let mut args = Arguments::new(name, renderer, &groups[1..]);
    match (rule.apply)(&mut args) {
        Ok(Some(text)) => parts.push(text),
        Ok(None) => {}
        Err(TemplateError::Render(err @ Error::UnknownKind(_))) => return Err(err),
        Err(err) => {
            log::warn!("Template '{name}' failed in {} rule: {err}", rule.name);
        }
    }
    Ok(())
}

/// `{{quote|text}}`, `{{cquote|text}}`
///
/// Only the quoted text is written. Any further arguments (author, source,
/// and so on) are ignored.
fn quote(args: &mut Arguments<'_, '_, '_>) -> Result<Option<String>, TemplateError> {
    let text = args.eval(0)?.ok_or(TemplateError::MissingArgument(1))?;
    Ok(Some(format!(
        "<blockquote><p>{}</p></blockquote>",
        strip_citations(text)
    )))
}

/// `{{bd|born|died}}`
fn birth_death(args: &mut Arguments<'_, '_, '_>) -> Result<Option<String>, TemplateError> {
    Ok(match args.non_empty()?.as_slice() {
        [born, died, ..] => Some(format!("{}-{}", born.trim(), died.trim())),
        // Still alive, or date of death unknown
        [born] => Some(format!("{}-", born.trim())),
        [] => None,
    })
}

/// `{{le|name|original}}`, `{{link-xx|name|original}}`
///
/// Writes `name(original)`, or just one of the two if the other is missing or
/// they are the same.
fn pair_or_last(args: &mut Arguments<'_, '_, '_>) -> Result<Option<String>, TemplateError> {
    let first = args.eval(0)?.unwrap_or_default().trim().to_string();
    let second = args.eval(1)?.unwrap_or_default().trim();
    if !first.is_empty() && !second.is_empty() && first != second {
        Ok(Some(format!("{first}({second})")))
    } else {
        args.last_non_empty()
    }
}

/// `{{Cite book|…|title=Title|…}}`
fn citation_title(args: &mut Arguments<'_, '_, '_>) -> Result<Option<String>, TemplateError> {
    for index in 0..args.len() {
        if let Some(value) = args.eval(index)?
            && value.trim_start().starts_with("title")
        {
            return Ok(value
                .split_once('=')
                .map(|(_, title)| title.trim())
                .filter(|title| !title.is_empty())
                .map(str::to_string));
        }
    }
    Ok(None)
}
