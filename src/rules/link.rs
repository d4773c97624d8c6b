//! `[text](url)` links.

use super::escape::unescape_chars;
use super::scan::apply_until_stable;
use super::{MarkupRule, RuleKind};
use crate::color::Rgba;
use crate::error::Result;
use crate::text::{Attribute, StyledTextBuffer};
use std::ops::Range;

/// Default color of link text.
pub const DEFAULT_LINK_COLOR: Rgba = Rgba::BLUE;

#[derive(Clone, Debug, PartialEq, Eq)]
struct LinkMatch {
    /// `[` through `)`.
    outer: Range<usize>,
    /// Text between the brackets.
    text: Range<usize>,
    url: String,
}

fn find_links(chars: &[char]) -> Vec<LinkMatch> {
    let mut found = Vec::new();
    let mut i = 0usize;
    while i < chars.len() {
        match (chars[i] == '[').then(|| match_link(chars, i)).flatten() {
            Some(m) => {
                i = m.outer.end;
                found.push(m);
            }
            None => i += 1,
        }
    }
    found
}

fn match_link(chars: &[char], open: usize) -> Option<LinkMatch> {
    let text_start = open + 1;
    let text_end = (text_start..chars.len())
        .find(|&j| matches!(chars[j], '[' | ']' | '\n'))
        .filter(|&j| chars[j] == ']' && j > text_start)?;

    let url_start = text_end + 2;
    if chars.get(text_end + 1) != Some(&'(') {
        return None;
    }
    let url_end = (url_start..chars.len())
        .find(|&j| chars[j] == ')' || chars[j].is_whitespace())
        .filter(|&j| chars[j] == ')' && j > url_start)?;

    Some(LinkMatch {
        outer: open..url_end + 1,
        text: text_start..text_end,
        url: unescape_chars(&chars[url_start..url_end]),
    })
}

/// Turns `[text](url)` into `text` carrying a link to `url`.
#[derive(Clone, Debug)]
pub struct LinkRule {
    color: Rgba,
}

impl Default for LinkRule {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: DEFAULT_LINK_COLOR,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

impl MarkupRule for LinkRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Link
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        apply_until_stable(buffer, find_links, |buffer, link| {
            buffer.delete(link.text.end..link.outer.end)?;
            buffer.delete(link.outer.start..link.text.start)?;
            let range = link.outer.start..link.outer.start + link.text.len();
            buffer.apply_attribute(range.clone(), Attribute::Link(link.url))?;
            buffer.apply_attribute(range, Attribute::ForegroundColor(self.color))
        })
    }
}
