//! Inline code spans.

use super::escape::{decode_hex, escape_marker};
use super::scan::{apply_reversed, backslashes_before, line_ranges, run_length};
use super::{MarkupRule, RuleKind};
use crate::color::Rgba;
use crate::error::Result;
use crate::style::FontTraits;
use crate::text::{Attribute, StyledTextBuffer};
use std::ops::Range;

/// Default code text color, `#E63366`.
pub const DEFAULT_CODE_COLOR: Rgba = Rgba::rgb(230.0 / 255.0, 51.0 / 255.0, 102.0 / 255.0);

/// Default code background color, `#F5F5F5`.
pub const DEFAULT_CODE_BACKGROUND: Rgba = Rgba::rgb(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0);

/// A backtick-delimited span on one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CodeSpan {
    /// Whole span including both delimiter runs.
    pub outer: Range<usize>,
    /// Contents between the delimiter runs (never empty).
    pub content: Range<usize>,
}

/// Find inline code spans: a run of `n` backticks not preceded by an odd
/// number of backslashes, closed by the next run of exactly `n` backticks on
/// the same line.
///
/// Both [`CodeEscapeRule`](super::CodeEscapeRule) and [`CodeRule`] pair
/// delimiters with this function, so they agree on which spans exist.
pub(crate) fn find_code_spans(chars: &[char]) -> Vec<CodeSpan> {
    let mut spans = Vec::new();
    for line in line_ranges(chars) {
        let mut i = line.start;
        while i < line.end {
            if chars[i] != '`' {
                i += 1;
                continue;
            }
            if backslashes_before(chars, i, line.start) % 2 == 1 {
                // Escaped backtick; the rest of the run may still open a span.
                i += 1;
                continue;
            }

            let open = run_length(chars, i, line.end, '`');
            let content_start = i + open;
            let mut j = content_start;
            let mut close = None;
            while j < line.end {
                if chars[j] == '`' {
                    let run = run_length(chars, j, line.end, '`');
                    if run == open {
                        close = Some(j);
                        break;
                    }
                    j += run;
                } else {
                    j += 1;
                }
            }

            match close {
                Some(close_start) if close_start > content_start => {
                    spans.push(CodeSpan {
                        outer: i..close_start + open,
                        content: content_start..close_start,
                    });
                    i = close_start + open;
                }
                _ => i += open,
            }
        }
    }
    spans
}

/// Resolves inline code spans hidden by the code escaping rule.
///
/// Runs after every formatting rule so code contents are never read as
/// other markup. The delimiters are removed, the contents decoded, and the
/// span gets a monospace font plus the code colors.
#[derive(Clone, Debug)]
pub struct CodeRule {
    color: Option<Rgba>,
    background: Option<Rgba>,
}

impl Default for CodeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: Some(DEFAULT_CODE_COLOR),
            background: Some(DEFAULT_CODE_BACKGROUND),
        }
    }

    /// Text color for code, or `None` to keep the surrounding color.
    #[must_use]
    pub fn with_color(mut self, color: Option<Rgba>) -> Self {
        self.color = color;
        self
    }

    /// Background color for code, or `None` for no background.
    #[must_use]
    pub fn with_background(mut self, background: Option<Rgba>) -> Self {
        self.background = background;
        self
    }
}

impl MarkupRule for CodeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Code
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let chars = buffer.chars();
        let decoded: Vec<(Range<usize>, String)> = find_code_spans(&chars)
            .into_iter()
            .filter_map(|span| {
                let literal = decode_hex(&chars[span.content])?;
                // Backslashes go back out as markers so unescaping restores
                // them verbatim instead of reading code as escapes.
                let text: String = literal
                    .chars()
                    .map(|c| {
                        if c == '\\' {
                            escape_marker(c)
                        } else {
                            c.to_string()
                        }
                    })
                    .collect();
                Some((span.outer, text))
            })
            .collect();

        apply_reversed(buffer, decoded, |buffer, (outer, text)| {
            let start = outer.start;
            let range = start..start + text.chars().count();
            buffer.replace_text(outer, &text)?;
            buffer.update_font(range.clone(), |font| {
                font.with_traits(FontTraits::MONOSPACE)
            })?;
            if let Some(color) = self.color {
                buffer.apply_attribute(range.clone(), Attribute::ForegroundColor(color))?;
            }
            if let Some(background) = self.background {
                buffer.apply_attribute(range, Attribute::BackgroundColor(background))?;
            }
            Ok(())
        })
    }
}
