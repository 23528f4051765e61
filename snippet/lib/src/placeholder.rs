use serde::{Deserialize, Serialize};

use crate::span::TextSpan;

/// A numbered, optionally labeled tabstop found in a snippet template.
///
/// Placeholders are owned by their [`Template`](crate::Template) and are
/// never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder {
    /// Tabstop number as written in the source. Not necessarily unique or
    /// contiguous.
    pub index: u32,
    /// Display label of a `${N:label}` marker; `None` for a bare `$N`.
    pub name: Option<String>,
    /// Location of the whole marker in the original template text.
    pub span: TextSpan,
}

impl Placeholder {
    pub fn new(index: u32, name: Option<String>, span: TextSpan) -> Self {
        Self { index, name, span }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn span(&self) -> TextSpan {
        self.span
    }

    pub fn is_labeled(&self) -> bool {
        self.name.is_some()
    }
}
