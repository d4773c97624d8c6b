//! `#` headers.

use super::level::LevelSyntax;
use super::scan::apply_until_stable;
use super::{MarkupRule, RuleKind};
use crate::color::Rgba;
use crate::error::Result;
use crate::style::{Font, FontTraits};
use crate::text::{Attribute, StyledTextBuffer};

/// Deepest header level recognized by default.
pub const DEFAULT_HEADER_MAX_LEVEL: usize = 6;

/// Point-size step between adjacent header levels.
pub const DEFAULT_HEADER_FONT_INCREASE: f32 = 2.0;

/// Extra size of a level-1 header over the base font.
const LEVEL_ONE_BOOST: f32 = 4.0;

fn is_hash(c: char) -> bool {
    c == '#'
}

/// Resolves `# Title` lines into header-styled text.
///
/// The hashes and the whitespace after them are removed. The remaining line
/// gets the header font: the base font made bold, sized
/// `base + 4 - (level - 1) * font_increase`.
#[derive(Clone, Debug)]
pub struct HeaderRule {
    font: Font,
    max_level: usize,
    font_increase: f32,
    color: Option<Rgba>,
}

impl HeaderRule {
    /// Header rule deriving its sizes from the document's base font.
    #[must_use]
    pub fn new(base: &Font) -> Self {
        Self {
            font: base.clone().with_traits(FontTraits::BOLD),
            max_level: DEFAULT_HEADER_MAX_LEVEL,
            font_increase: DEFAULT_HEADER_FONT_INCREASE,
            color: None,
        }
    }

    /// Replace the header base font (used as-is, no traits added).
    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Deepest level recognized; 0 means unlimited.
    #[must_use]
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    #[must_use]
    pub fn with_font_increase(mut self, font_increase: f32) -> Self {
        self.font_increase = font_increase;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Font applied to a header of the given level (1-based).
    #[must_use]
    pub fn font_for_level(&self, level: usize) -> Font {
        let steps = level.saturating_sub(1) as f32;
        let size = (self.font.size + LEVEL_ONE_BOOST - steps * self.font_increase).max(1.0);
        self.font.clone().with_size(size)
    }
}

impl MarkupRule for HeaderRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Header
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let syntax = LevelSyntax {
            is_marker: is_hash,
            max_level: self.max_level,
            space_required: false,
        };
        apply_until_stable(buffer, |chars| syntax.scan(chars), |buffer, m| {
            buffer.apply_attribute(
                m.content.clone(),
                Attribute::Font(self.font_for_level(m.level)),
            )?;
            if let Some(color) = self.color {
                buffer.apply_attribute(m.content, Attribute::ForegroundColor(color))?;
            }
            buffer.delete(m.prefix)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_strips_hashes_and_sizes_font() {
        let rule = HeaderRule::new(&Font::system(12.0));
        let mut buffer = StyledTextBuffer::from_text("# Title\n### Small\nbody");
        rule.parse(&mut buffer).unwrap();

        assert_eq!(buffer.text(), "Title\nSmall\nbody");
        let title = buffer.font_at(0).unwrap();
        assert!(title.is_bold());
        assert!((title.size - 16.0).abs() < f32::EPSILON);
        let small = buffer.font_at(6).unwrap();
        assert!((small.size - 12.0).abs() < f32::EPSILON);
        assert!(buffer.font_at(12).is_none());
    }

    #[test]
    fn repeated_hash_prefix_is_fully_stripped() {
        let rule = HeaderRule::new(&Font::system(12.0));
        let mut buffer = StyledTextBuffer::from_text("# # Title");
        rule.parse(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "Title");
        assert!((buffer.font_at(0).unwrap().size - 16.0).abs() < f32::EPSILON);

        let before = buffer.clone();
        rule.parse(&mut buffer).unwrap();
        assert_eq!(buffer, before);
    }

    #[test]
    fn header_font_has_a_floor() {
        let rule = HeaderRule::new(&Font::system(2.0)).with_max_level(0);
        assert!((rule.font_for_level(10).size - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn header_color_is_optional() {
        let mut buffer = StyledTextBuffer::from_text("## Red");
        HeaderRule::new(&Font::default())
            .with_color(Rgba::RED)
            .parse(&mut buffer)
            .unwrap();
        assert_eq!(buffer.text(), "Red");
        assert_eq!(buffer.color_at(0), Some(Rgba::RED));
    }

    #[test]
    fn escaped_hash_is_not_a_header() {
        let mut buffer = StyledTextBuffer::from_text(r"\0023 not a header");
        HeaderRule::new(&Font::default()).parse(&mut buffer).unwrap();
        assert_eq!(buffer.text(), r"\0023 not a header");
        assert!(buffer.ranges().is_empty());
    }
}
