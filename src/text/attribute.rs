//! Attribute keys, values and the ranges that carry them.

use crate::color::Rgba;
use crate::style::Font;
use std::fmt;
use std::ops::Range;

/// Identifies which attribute a range sets.
///
/// Ranges with the same key never overlap inside a
/// [`StyledTextBuffer`](super::StyledTextBuffer).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Font,
    ForegroundColor,
    BackgroundColor,
    Link,
    /// Attribute owned by a custom rule.
    Custom(String),
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Font => f.write_str("font"),
            Self::ForegroundColor => f.write_str("color"),
            Self::BackgroundColor => f.write_str("background"),
            Self::Link => f.write_str("link"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// A presentation attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Font(Font),
    ForegroundColor(Rgba),
    BackgroundColor(Rgba),
    /// Link target URL.
    Link(String),
    /// Free-form attribute applied by a custom rule.
    Custom { key: String, value: String },
}

impl Attribute {
    /// Build a custom attribute.
    #[must_use]
    pub fn custom(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Custom {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The key this value is stored under.
    #[must_use]
    pub fn key(&self) -> AttributeKey {
        match self {
            Self::Font(_) => AttributeKey::Font,
            Self::ForegroundColor(_) => AttributeKey::ForegroundColor,
            Self::BackgroundColor(_) => AttributeKey::BackgroundColor,
            Self::Link(_) => AttributeKey::Link,
            Self::Custom { key, .. } => AttributeKey::Custom(key.clone()),
        }
    }

    /// Check the key without allocating.
    #[must_use]
    pub fn has_key(&self, key: &AttributeKey) -> bool {
        match (self, key) {
            (Self::Font(_), AttributeKey::Font)
            | (Self::ForegroundColor(_), AttributeKey::ForegroundColor)
            | (Self::BackgroundColor(_), AttributeKey::BackgroundColor)
            | (Self::Link(_), AttributeKey::Link) => true,
            (Self::Custom { key: own, .. }, AttributeKey::Custom(other)) => own == other,
            _ => false,
        }
    }
}

/// An attribute applied over a half-open char range.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRange {
    /// Char range in the buffer text.
    pub range: Range<usize>,
    /// Attribute applied over the range.
    pub attribute: Attribute,
}

impl AttributeRange {
    #[must_use]
    pub fn new(range: Range<usize>, attribute: Attribute) -> Self {
        Self { range, attribute }
    }

    /// Check if this range overlaps a char span.
    #[must_use]
    pub fn overlaps(&self, span: &Range<usize>) -> bool {
        self.range.start < span.end && span.start < self.range.end
    }

    /// Check if this range contains a char index.
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        self.range.contains(&pos)
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }
}
