//! `-`, `+` and `*` list items.

use super::level::LevelSyntax;
use super::scan::apply_reversed;
use super::{MarkupRule, RuleKind};
use crate::color::Rgba;
use crate::error::Result;
use crate::text::{Attribute, StyledTextBuffer};

fn is_bullet(c: char) -> bool {
    matches!(c, '*' | '+' | '-')
}

/// Rewrites list markers into indented bullets.
///
/// `- item` becomes `  • item`; each extra marker (`-- item`) indents one
/// more level.
#[derive(Clone, Debug)]
pub struct ListRule {
    max_level: usize,
    indicator: String,
    separator: String,
    color: Option<Rgba>,
}

impl Default for ListRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ListRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_level: 0,
            indicator: "•".to_string(),
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

    /// Indentation inserted once per level.
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

    fn prefix_for_level(&self, level: usize) -> String {
        format!("{}{} ", self.separator.repeat(level), self.indicator)
    }
}

impl MarkupRule for ListRule {
    fn kind(&self) -> RuleKind {
        RuleKind::List
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let syntax = LevelSyntax {
            is_marker: is_bullet,
            max_level: self.max_level,
            space_required: true,
        };
        let matches = syntax.scan(&buffer.chars());
        apply_reversed(buffer, matches, |buffer, m| {
            if let Some(color) = self.color {
                buffer.apply_attribute(m.content, Attribute::ForegroundColor(color))?;
            }
            buffer.replace_text(m.prefix, &self.prefix_for_level(m.level))
        })
    }
}
