//! Char-indexed text storage using the ropey crate.

use ropey::Rope;
use std::ops::Range;

/// Wrapper around `ropey::Rope` addressing text by char index only.
///
/// Callers validate ranges before editing; the wrapper clamps rather than
/// panics if they do not.
#[derive(Clone, Debug, Default)]
pub struct RopeWrapper {
    rope: Rope,
}

impl RopeWrapper {
    /// Create an empty rope.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a rope from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Get the number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Copy a char range out as a `String`.
    #[must_use]
    pub fn slice_to_string(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.len_chars());
        let start = range.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Snapshot every char, for index-based scanning.
    #[must_use]
    pub fn chars(&self) -> Vec<char> {
        self.rope.chars().collect()
    }

    /// Replace a char range with `text`.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let end = range.end.min(self.len_chars());
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }

    /// Convert to string.
    #[must_use]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    /// Get access to the underlying rope.
    #[must_use]
    pub fn inner(&self) -> &Rope {
        &self.rope
    }
}

impl From<&str> for RopeWrapper {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for RopeWrapper {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
