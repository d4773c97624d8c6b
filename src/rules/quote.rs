//! `>` block quotes.

use super::level::LevelSyntax;
use super::scan::apply_reversed;
use super::{MarkupRule, RuleKind};
use crate::color::Rgba;
use crate::error::Result;
use crate::style::FontTraits;
use crate::text::{Attribute, StyledTextBuffer};

fn is_quote_marker(c: char) -> bool {
    c == '>'
}

/// Rewrites `> text` lines into indented, italic quotes.
#[derive(Clone, Debug)]
pub struct QuoteRule {
    max_level: usize,
    indicator: String,
    separator: String,
    color: Option<Rgba>,
}

impl Default for QuoteRule {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_level: 0,
            indicator: "│".to_string(),
            separator: "  ".to_string(),
            color: None,
        }
    }

    /// Deepest level recognized; 0 means unlimited.
    #[must_use]
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.indicator = indicator.into();
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

impl MarkupRule for QuoteRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Quote
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let syntax = LevelSyntax {
            is_marker: is_quote_marker,
            max_level: self.max_level,
            space_required: false,
        };
        let matches = syntax.scan(&buffer.chars());
        apply_reversed(buffer, matches, |buffer, m| {
            buffer.update_font(m.content.clone(), |font| {
                font.with_traits(FontTraits::ITALIC)
            })?;
            if let Some(color) = self.color {
                buffer.apply_attribute(m.content, Attribute::ForegroundColor(color))?;
            }
            let prefix = format!("{}{} ", self.separator.repeat(m.level), self.indicator);
            buffer.replace_text(m.prefix, &prefix)
        })
    }
}
