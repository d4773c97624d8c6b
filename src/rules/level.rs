//! Line-prefix rules whose marker count is a nesting level (headers, lists,
//! quotes).

use super::scan::line_ranges;
use std::ops::Range;

/// A line opened by one or more level markers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LevelMatch {
    /// Number of markers taken, at least 1.
    pub level: usize,
    /// Markers plus the whitespace after them.
    pub prefix: Range<usize>,
    /// Rest of the line (never empty).
    pub content: Range<usize>,
}

/// Grammar of a level prefix: `^(marker{1,max_level})\s*(.+)$`, or `\s+`
/// when whitespace is required. A `max_level` of 0 means unlimited.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LevelSyntax {
    pub is_marker: fn(char) -> bool,
    pub max_level: usize,
    pub space_required: bool,
}

impl LevelSyntax {
    pub(crate) fn scan(&self, chars: &[char]) -> Vec<LevelMatch> {
        line_ranges(chars)
            .into_iter()
            .filter_map(|line| self.match_line(chars, line))
            .collect()
    }

    fn match_line(&self, chars: &[char], line: Range<usize>) -> Option<LevelMatch> {
        let mut level = 0usize;
        let mut idx = line.start;
        while idx < line.end
            && (self.is_marker)(chars[idx])
            && (self.max_level == 0 || level < self.max_level)
        {
            level += 1;
            idx += 1;
        }
        if level == 0 {
            return None;
        }

        let markers_end = idx;
        while idx < line.end && chars[idx].is_whitespace() {
            idx += 1;
        }
        if self.space_required && idx == markers_end {
            return None;
        }
        if idx == line.end {
            return None;
        }

        Some(LevelMatch {
            level,
            prefix: line.start..idx,
            content: idx..line.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn is_hash(c: char) -> bool {
        c == '#'
    }

    fn is_bullet(c: char) -> bool {
        matches!(c, '*' | '+' | '-')
    }

    const HASHES: LevelSyntax = LevelSyntax {
        is_marker: is_hash,
        max_level: 3,
        space_required: false,
    };

    const BULLETS: LevelSyntax = LevelSyntax {
        is_marker: is_bullet,
        max_level: 0,
        space_required: true,
    };

    #[test]
    fn level_counts_markers_up_to_max() {
        let matches = HASHES.scan(&chars("## Two\n#####x"));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].level, 2);
        assert_eq!(matches[0].prefix, 0..3);
        assert_eq!(matches[0].content, 3..6);
        // Markers past the maximum become content.
        assert_eq!(matches[1].level, 3);
        assert_eq!(matches[1].content, 10..13);
    }

    #[test]
    fn required_space_rejects_emphasis() {
        assert!(BULLETS.scan(&chars("**bold**")).is_empty());
        assert!(BULLETS.scan(&chars("---")).is_empty());
        let matches = BULLETS.scan(&chars("-+ nested"));
        assert_eq!(matches[0].level, 2);
        assert_eq!(matches[0].content, 3..9);
    }

    #[test]
    fn marker_only_lines_do_not_match() {
        assert!(HASHES.scan(&chars("#   ")).is_empty());
        assert!(HASHES.scan(&chars(" # indented")).is_empty());
    }
}
