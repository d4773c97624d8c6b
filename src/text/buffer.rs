//! Styled text buffer: text plus attribute ranges.
//!
//! [`StyledTextBuffer`] is the value every markup rule edits in place and the
//! value the parser hands back. Text is stored in a rope and addressed by
//! char index; attribute ranges are half-open char ranges that the buffer
//! keeps consistent with the text across every edit.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::style::Font;
use crate::text::attribute::{Attribute, AttributeKey, AttributeRange};
use crate::text::rope::RopeWrapper;
use std::fmt;
use std::ops::Range;

/// Text with attribute ranges.
///
/// Invariants maintained by every operation:
///
/// - each range satisfies `start < end <= len_chars()`;
/// - ranges sharing an [`AttributeKey`] never overlap;
/// - ranges are ordered by start offset.
#[derive(Clone, Debug, Default)]
pub struct StyledTextBuffer {
    rope: RopeWrapper,
    ranges: Vec<AttributeRange>,
}

impl StyledTextBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unstyled buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: RopeWrapper::from_str(text),
            ranges: Vec::new(),
        }
    }

    /// Builder-style [`apply_attribute`](Self::apply_attribute), handy for
    /// preparing pre-styled input.
    pub fn with_attribute(mut self, range: Range<usize>, attribute: Attribute) -> Result<Self> {
        self.apply_attribute(range, attribute)?;
        Ok(self)
    }

    /// Number of chars in the text.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// The full text.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Snapshot of the text as chars, indexed like every buffer offset.
    #[must_use]
    pub fn chars(&self) -> Vec<char> {
        self.rope.chars()
    }

    /// Copy out the text of a char range.
    pub fn slice(&self, range: Range<usize>) -> Result<String> {
        self.check_range(&range)?;
        Ok(self.rope.slice_to_string(range))
    }

    /// All attribute ranges, ordered by start offset.
    #[must_use]
    pub fn ranges(&self) -> &[AttributeRange] {
        &self.ranges
    }

    /// Ranges carrying `key`, ordered by start offset.
    pub fn ranges_for<'a>(
        &'a self,
        key: &AttributeKey,
    ) -> impl Iterator<Item = &'a AttributeRange> + use<'a> {
        let key = key.clone();
        self.ranges.iter().filter(move |r| r.attribute.has_key(&key))
    }

    fn check_range(&self, range: &Range<usize>) -> Result<()> {
        let len = self.len_chars();
        if range.start > range.end || range.end > len {
            return Err(Error::OutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    /// Set `attribute` over `range`, replacing whatever the same key held
    /// there. Empty ranges are a no-op.
    pub fn apply_attribute(&mut self, range: Range<usize>, attribute: Attribute) -> Result<()> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        self.clear_key(&range, &attribute.key());
        let at = self
            .ranges
            .partition_point(|r| r.range.start <= range.start);
        self.ranges.insert(at, AttributeRange::new(range, attribute));
        Ok(())
    }

    /// Clear `key` over `range`, truncating or splitting ranges that extend
    /// past it.
    pub fn remove_attribute(&mut self, range: Range<usize>, key: &AttributeKey) -> Result<()> {
        self.check_range(&range)?;
        if !range.is_empty() {
            self.clear_key(&range, key);
        }
        Ok(())
    }

    fn clear_key(&mut self, span: &Range<usize>, key: &AttributeKey) {
        let mut kept = Vec::with_capacity(self.ranges.len() + 1);
        for r in self.ranges.drain(..) {
            if !r.attribute.has_key(key) || !r.overlaps(span) {
                kept.push(r);
                continue;
            }
            if r.range.start < span.start {
                kept.push(AttributeRange::new(
                    r.range.start..span.start,
                    r.attribute.clone(),
                ));
            }
            if r.range.end > span.end {
                kept.push(AttributeRange::new(span.end..r.range.end, r.attribute));
            }
        }
        kept.sort_by_key(|r| r.range.start);
        self.ranges = kept;
    }

    /// Rewrite every font run inside `range` through `f`.
    ///
    /// Parts of the range without a font start from [`Font::default`]. This
    /// is how emphasis composes: bold text inside a header keeps the header
    /// size and gains the bold trait.
    pub fn update_font<F>(&mut self, range: Range<usize>, f: F) -> Result<()>
    where
        F: Fn(Font) -> Font,
    {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }

        let existing: Vec<(Range<usize>, Font)> = self
            .ranges
            .iter()
            .filter(|r| r.overlaps(&range))
            .filter_map(|r| match &r.attribute {
                Attribute::Font(font) => Some((
                    r.range.start.max(range.start)..r.range.end.min(range.end),
                    font.clone(),
                )),
                _ => None,
            })
            .collect();

        let mut runs = Vec::with_capacity(existing.len() + 1);
        let mut cursor = range.start;
        for (span, font) in existing {
            if span.start > cursor {
                runs.push((cursor..span.start, Font::default()));
            }
            cursor = span.end;
            runs.push((span, font));
        }
        if cursor < range.end {
            runs.push((cursor..range.end, Font::default()));
        }

        for (span, font) in runs {
            self.apply_attribute(span, Attribute::Font(f(font)))?;
        }
        Ok(())
    }

    /// Replace the text of `range` with `text`, remapping attribute ranges.
    ///
    /// - ranges ending at or before the edit are kept;
    /// - ranges starting at or after the edit shift by the length change;
    /// - ranges covering the whole edit (strictly containing it, for a pure
    ///   insertion) stretch over the new text;
    /// - ranges partially overlapping keep only their part outside the edit;
    /// - ranges inside the edit are dropped.
    pub fn replace_text(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        self.check_range(&range)?;
        let inserted = text.chars().count();
        if range.is_empty() && inserted == 0 {
            return Ok(());
        }

        self.rope.replace_range(range.clone(), text);
        let mut remapped: Vec<AttributeRange> = self
            .ranges
            .drain(..)
            .filter_map(|r| {
                let span = remap(&r.range, &range, inserted)?;
                (span.start < span.end).then(|| AttributeRange::new(span, r.attribute))
            })
            .collect();
        remapped.sort_by_key(|r| r.range.start);
        self.ranges = remapped;
        Ok(())
    }

    /// Insert `text` at a char index.
    pub fn insert(&mut self, at: usize, text: &str) -> Result<()> {
        self.replace_text(at..at, text)
    }

    /// Delete a char range.
    pub fn delete(&mut self, range: Range<usize>) -> Result<()> {
        self.replace_text(range, "")
    }

    /// Ranges overlapping `range`; an empty range queries the ranges
    /// containing its start.
    #[must_use]
    pub fn query(&self, range: Range<usize>) -> Vec<&AttributeRange> {
        if range.is_empty() {
            return self
                .ranges
                .iter()
                .filter(|r| r.contains(range.start))
                .collect();
        }
        self.ranges.iter().filter(|r| r.overlaps(&range)).collect()
    }

    /// Whether any part of `range` carries `key`.
    #[must_use]
    pub fn has_attribute(&self, range: Range<usize>, key: &AttributeKey) -> bool {
        self.query(range).iter().any(|r| r.attribute.has_key(key))
    }

    /// Attributes in effect at a char index.
    #[must_use]
    pub fn attributes_at(&self, index: usize) -> Vec<&Attribute> {
        self.ranges
            .iter()
            .filter(|r| r.contains(index))
            .map(|r| &r.attribute)
            .collect()
    }

    /// Font in effect at a char index.
    #[must_use]
    pub fn font_at(&self, index: usize) -> Option<&Font> {
        self.attributes_at(index).into_iter().find_map(|a| match a {
            Attribute::Font(font) => Some(font),
            _ => None,
        })
    }

    /// Foreground color in effect at a char index.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Option<Rgba> {
        self.attributes_at(index).into_iter().find_map(|a| match a {
            Attribute::ForegroundColor(color) => Some(*color),
            _ => None,
        })
    }

    /// Background color in effect at a char index.
    #[must_use]
    pub fn background_at(&self, index: usize) -> Option<Rgba> {
        self.attributes_at(index).into_iter().find_map(|a| match a {
            Attribute::BackgroundColor(color) => Some(*color),
            _ => None,
        })
    }

    /// Link target in effect at a char index.
    #[must_use]
    pub fn link_at(&self, index: usize) -> Option<&str> {
        self.attributes_at(index).into_iter().find_map(|a| match a {
            Attribute::Link(url) => Some(url.as_str()),
            _ => None,
        })
    }
}

/// Map an attribute span through an edit of `edit` replaced by `inserted`
/// chars. `None` means the span lay entirely inside the edit.
fn remap(span: &Range<usize>, edit: &Range<usize>, inserted: usize) -> Option<Range<usize>> {
    // Only called with offsets at or past `edit.end`.
    let shift = |offset: usize| offset - edit.end + edit.start + inserted;

    if span.end <= edit.start {
        Some(span.clone())
    } else if span.start >= edit.end {
        Some(shift(span.start)..shift(span.end))
    } else if span.start <= edit.start && span.end >= edit.end {
        Some(span.start..shift(span.end))
    } else if span.start < edit.start {
        Some(span.start..edit.start)
    } else if span.end > edit.end {
        Some(edit.start + inserted..shift(span.end))
    } else {
        None
    }
}

impl PartialEq for StyledTextBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges && self.rope.inner() == other.rope.inner()
    }
}

impl fmt::Display for StyledTextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.inner().chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledTextBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for StyledTextBuffer {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl From<&String> for StyledTextBuffer {
    fn from(text: &String) -> Self {
        Self::from_text(text)
    }
}
