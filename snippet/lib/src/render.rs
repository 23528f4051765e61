//! Placeholder substitution.
//!
//! Rendering copies the template text into a private buffer and replaces
//! every marker span with whatever the caller's callback returns. Spans are
//! recorded against the original text, so edits are applied rightmost first:
//! an edit only shifts text to its right, and everything still to be
//! processed lies to its left.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::convert::Infallible;

use tracing::trace;

use crate::placeholder::Placeholder;
use crate::template::Template;

impl Template {
    /// Renders the template, asking `callback` for each placeholder's
    /// replacement.
    ///
    /// A `None` or empty replacement deletes the marker. The callback is
    /// invoked once per placeholder; the order of those calls is not part of
    /// the contract.
    ///
    /// ## Examples
    ///
    /// ```
    /// use snippet_lib::Template;
    ///
    /// let template = Template::new("Hello $1 ${2:name}!");
    /// assert_eq!(template.render(|_, _| Some("X")), "Hello X X!");
    /// ```
    pub fn render<F, R>(&self, mut callback: F) -> String
    where
        F: FnMut(&Template, &Placeholder) -> Option<R>,
        R: AsRef<str>,
    {
        let Ok(rendered) = self.try_render(|template, placeholder| {
            Ok::<_, Infallible>(callback(template, placeholder))
        });
        rendered
    }

    /// Like [`render`](Self::render), with a fallible callback.
    ///
    /// ## Errors
    ///
    /// Stops at the first error returned by `callback` and returns it
    /// unchanged. The template itself is unaffected.
    pub fn try_render<F, R, E>(&self, mut callback: F) -> Result<String, E>
    where
        F: FnMut(&Template, &Placeholder) -> Result<Option<R>, E>,
        R: AsRef<str>,
    {
        let mut buffer = self.text.clone();

        for placeholder in self.right_to_left() {
            let replacement = callback(self, placeholder)?;
            let replacement: &str = replacement.as_ref().map_or("", AsRef::<str>::as_ref);
            trace!(
                index = placeholder.index,
                span = %placeholder.span,
                replacement,
                "Substituting placeholder"
            );
            buffer.replace_range(placeholder.span.range(), replacement);
        }

        Ok(buffer)
    }

    /// Renders human-readable preview text: labeled placeholders become
    /// their label and bare ones disappear.
    pub fn render_for_display(&self) -> String {
        self.render(|_, placeholder| placeholder.name.clone())
    }

    /// Renders by looking each placeholder's tabstop number up in `values`.
    /// Unmapped placeholders are deleted.
    pub fn render_with<S: AsRef<str>>(&self, values: &HashMap<u32, S>) -> String {
        self.render(|_, placeholder| values.get(&placeholder.index))
    }

    /// Placeholders in descending span position.
    fn right_to_left(&self) -> Vec<&Placeholder> {
        let mut ordered: Vec<&Placeholder> = self.placeholders.iter().collect();
        ordered.sort_by_key(|placeholder| Reverse(placeholder.span.position));
        ordered
    }
}
