//! Snippet template engine.
//!
//! Parses editor snippet templates containing numbered tabstop markers
//! (`$1`, `${2:name}`) and renders them by substituting each marker with
//! caller-supplied text.
//!
//! ## Examples
//!
//! ```
//! use snippet_lib::Template;
//!
//! let template = Template::new("resource ${1:name} '${2:type}' = {\n  $0\n}");
//! assert_eq!(template.placeholders()[0].index, 0);
//! assert_eq!(template.render_for_display(), "resource name 'type' = {\n  \n}");
//! ```

pub mod error;
pub mod placeholder;
mod render;
pub mod span;
pub mod template;

pub use error::SnippetError;
pub use placeholder::Placeholder;
pub use span::TextSpan;
pub use template::Template;
