//! Snippet template parsing.
//!
//! A [`Template`] is built once from its source text. Construction scans the
//! text for tabstop markers and records them as [`Placeholder`]s ordered by
//! tabstop number. Two marker forms are recognized:
//!
//! - bare: `$1`
//! - labeled: `${1:name}`
//!
//! Anything else, including malformed markers such as `${abc}` or an
//! unterminated `${`, is literal text.

use std::convert::Infallible;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SnippetError;
use crate::placeholder::Placeholder;
use crate::span::TextSpan;

/// Matches `${<digits>:<word>}` or `$<digits>`.
///
/// The labeled alternative is tried first so `${1:x}` is never read as a
/// literal `$` followed by text.
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{(?P<labeled>[0-9]+):(?P<name>\w+)\}|(?P<bare>[0-9]+))")
        .expect("placeholder pattern is a valid regex")
});

/// The immutable parsed form of a snippet template.
///
/// ## Examples
///
/// ```
/// use snippet_lib::Template;
///
/// let template = Template::new("Hello $1 ${2:name}!");
/// let indices: Vec<u32> = template.placeholders().iter().map(|p| p.index).collect();
/// assert_eq!(indices, vec![1, 2]);
/// assert_eq!(template.render_for_display(), "Hello  name!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TemplateSource")]
pub struct Template {
    pub(crate) text: String,
    /// Sorted ascending by `index`; ties keep their textual order.
    pub(crate) placeholders: Vec<Placeholder>,
}

/// Deserialization goes through the source text only, so the placeholder
/// list is always recomputed rather than trusted.
#[derive(Deserialize)]
struct TemplateSource {
    text: String,
}

impl From<TemplateSource> for Template {
    fn from(source: TemplateSource) -> Self {
        Template::new(source.text)
    }
}

impl Template {
    /// Parses `text` into a template.
    ///
    /// Every string is a valid template; one without markers simply has no
    /// placeholders.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let placeholders = parse_placeholders(&text);
        debug!(
            placeholders = placeholders.len(),
            bytes = text.len(),
            "Parsed snippet template"
        );

        Self { text, placeholders }
    }

    /// Parses an optional source text.
    ///
    /// ## Errors
    ///
    /// Returns [`SnippetError::MissingText`] when `text` is `None`.
    pub fn from_optional<T: Into<String>>(text: Option<T>) -> Result<Self, SnippetError> {
        text.map(Self::new).ok_or(SnippetError::MissingText)
    }

    /// Reads and parses a template file.
    ///
    /// ## Errors
    ///
    /// Returns [`SnippetError::Io`] if the file cannot be read as UTF-8.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnippetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SnippetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    /// The original source text, exactly as given.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Placeholders sorted ascending by tabstop number.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    pub fn has_placeholders(&self) -> bool {
        !self.placeholders.is_empty()
    }

    /// All placeholders sharing the tabstop number `index`, in textual order.
    pub fn placeholders_with_index(&self, index: u32) -> impl Iterator<Item = &Placeholder> {
        self.placeholders
            .iter()
            .filter(move |placeholder| placeholder.index == index)
    }

    /// Highest tabstop number in the template.
    pub fn max_index(&self) -> Option<u32> {
        self.placeholders.last().map(|placeholder| placeholder.index)
    }

    /// The exact marker text a placeholder was parsed from.
    pub fn marker_text(&self, placeholder: &Placeholder) -> Option<&str> {
        placeholder.span.slice(&self.text)
    }
}

fn parse_placeholders(text: &str) -> Vec<Placeholder> {
    let mut placeholders: Vec<Placeholder> = PLACEHOLDER_PATTERN
        .captures_iter(text)
        .filter_map(|captures| placeholder_from_captures(&captures))
        .collect();

    // `sort_by_key` is stable: equal indices stay in textual order
    placeholders.sort_by_key(|placeholder| placeholder.index);
    placeholders
}

fn placeholder_from_captures(captures: &Captures<'_>) -> Option<Placeholder> {
    let marker = captures.get(0)?;
    let (digits, name) = match (captures.name("labeled"), captures.name("bare")) {
        (Some(digits), _) => (
            digits.as_str(),
            captures.name("name").map(|name| name.as_str().to_string()),
        ),
        (None, Some(digits)) => (digits.as_str(), None),
        (None, None) => return None,
    };

    let Ok(index) = digits.parse::<u32>() else {
        debug!(
            marker = marker.as_str(),
            position = marker.start(),
            "Tabstop number out of range, leaving marker as literal text"
        );
        return None;
    };

    Some(Placeholder::new(
        index,
        name,
        TextSpan::new(marker.start(), marker.len()),
    ))
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::new(text)
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::new(text)
    }
}

impl FromStr for Template {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Template::new(text))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
