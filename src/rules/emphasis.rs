//! Bold and italic emphasis.

use super::scan::{apply_until_stable, line_ranges};
use super::{MarkupRule, RuleKind};
use crate::error::Result;
use crate::style::FontTraits;
use crate::text::StyledTextBuffer;
use std::ops::Range;

/// A delimited emphasis span: `width` delimiter chars on each side of
/// `content`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Emphasis {
    content: Range<usize>,
    width: usize,
}

fn is_delimiter(c: char) -> bool {
    c == '*' || c == '_'
}

fn starts_with(chars: &[char], idx: usize, end: usize, pattern: &[char]) -> bool {
    idx + pattern.len() <= end && chars[idx..idx + pattern.len()] == *pattern
}

fn find_bold(chars: &[char]) -> Vec<Emphasis> {
    let mut found = Vec::new();
    for line in line_ranges(chars) {
        let mut i = line.start;
        while i + 2 < line.end {
            let delim = chars[i];
            let pair = [delim, delim];
            if !is_delimiter(delim)
                || !starts_with(chars, i, line.end, &pair)
                || chars[i + 2].is_whitespace()
            {
                i += 1;
                continue;
            }

            let content_start = i + 2;
            let close = (content_start + 1..line.end).find(|&j| {
                starts_with(chars, j, line.end, &pair) && !chars[j - 1].is_whitespace()
            });
            match close {
                Some(j) => {
                    found.push(Emphasis {
                        content: content_start..j,
                        width: 2,
                    });
                    i = j + 2;
                }
                None => i += 1,
            }
        }
    }
    found
}

fn find_italic(chars: &[char]) -> Vec<Emphasis> {
    let mut found = Vec::new();
    for line in line_ranges(chars) {
        let mut i = line.start;
        while i + 1 < line.end {
            let delim = chars[i];
            let intraword = delim == '_' && i > line.start && chars[i - 1].is_alphanumeric();
            if !is_delimiter(delim) || intraword || chars[i + 1].is_whitespace() {
                i += 1;
                continue;
            }

            let close = (i + 2..line.end).find(|&j| {
                let before = chars[j - 1];
                chars[j] == delim
                    && !before.is_whitespace()
                    && !is_delimiter(before)
                    && (delim != '_' || j + 1 == line.end || !chars[j + 1].is_alphanumeric())
            });
            match close {
                Some(j) => {
                    found.push(Emphasis {
                        content: i + 1..j,
                        width: 1,
                    });
                    i = j + 1;
                }
                None => i += 1,
            }
        }
    }
    found
}

fn apply_emphasis(
    buffer: &mut StyledTextBuffer,
    find: fn(&[char]) -> Vec<Emphasis>,
    traits: FontTraits,
) -> Result<()> {
    apply_until_stable(buffer, find, |buffer, span| {
        let Emphasis { content, width } = span;
        buffer.delete(content.end..content.end + width)?;
        buffer.delete(content.start - width..content.start)?;
        let start = content.start - width;
        buffer.update_font(start..start + content.len(), |font| font.with_traits(traits))
    })
}

/// `**bold**` and `__bold__`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoldRule;

impl BoldRule {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupRule for BoldRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Bold
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        apply_emphasis(buffer, find_bold, FontTraits::BOLD)
    }
}

/// `*italic*` and `_italic_`. Underscores inside a word (`snake_case`) are
/// left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItalicRule;

impl ItalicRule {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupRule for ItalicRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Italic
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        apply_emphasis(buffer, find_italic, FontTraits::ITALIC)
    }
}
