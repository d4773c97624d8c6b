//! Markup rules and the trait they implement.
//!
//! A rule finds one kind of markup in a [`StyledTextBuffer`] and rewrites it
//! in place: delimiters are removed or replaced and attributes are applied
//! to what remains. Rules that don't find their markup leave the buffer
//! untouched.

mod autolink;
mod code;
mod emphasis;
mod escape;
mod header;
mod level;
mod link;
mod list;
mod quote;
mod scan;

use std::fmt;

use crate::error::Result;
use crate::text::StyledTextBuffer;

pub use autolink::AutomaticLinkRule;
pub use code::{CodeRule, DEFAULT_CODE_BACKGROUND, DEFAULT_CODE_COLOR};
pub use emphasis::{BoldRule, ItalicRule};
pub use escape::{CodeEscapeRule, EscapeRule, UnescapeRule};
pub use header::{DEFAULT_HEADER_FONT_INCREASE, DEFAULT_HEADER_MAX_LEVEL, HeaderRule};
pub use link::{DEFAULT_LINK_COLOR, LinkRule};
pub use list::ListRule;
pub use quote::QuoteRule;

/// Which built-in rule a [`MarkupRule`] is, or `Custom` for user rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    CodeEscape,
    Escape,
    Header,
    List,
    Quote,
    Link,
    AutomaticLink,
    Bold,
    Italic,
    Code,
    Unescape,
    Custom,
}

impl RuleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CodeEscape => "code-escape",
            Self::Escape => "escape",
            Self::Header => "header",
            Self::List => "list",
            Self::Quote => "quote",
            Self::Link => "link",
            Self::AutomaticLink => "automatic-link",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Code => "code",
            Self::Unescape => "unescape",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single markup transformation over a styled text buffer.
///
/// Implementations must leave malformed markup untouched and should only
/// fail for real errors (an out-of-bounds edit, or a custom rule's own
/// failure reported with [`Error::rule`](crate::Error::rule)).
pub trait MarkupRule: Send + Sync {
    /// Built-in rule identity. User rules keep the default.
    fn kind(&self) -> RuleKind {
        RuleKind::Custom
    }

    /// Name used in log records and error messages.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Rewrite every occurrence of this rule's markup in `buffer`.
    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl MarkupRule for Upper {
        fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
            let text = buffer.text().to_uppercase();
            let len = buffer.len_chars();
            buffer.replace_text(0..len, &text)
        }
    }

    #[test]
    fn custom_rule_defaults() {
        let rule = Upper;
        assert_eq!(rule.kind(), RuleKind::Custom);
        assert_eq!(rule.name(), "custom");

        let mut buffer = StyledTextBuffer::from_text("abc");
        rule.parse(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "ABC");
    }

    #[test]
    fn builtin_names() {
        assert_eq!(AutomaticLinkRule::new().name(), "automatic-link");
        assert_eq!(CodeEscapeRule::new().name(), "code-escape");
        assert_eq!(RuleKind::Unescape.to_string(), "unescape");
    }
}
