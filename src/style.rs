//! Font descriptors carried by [`Attribute::Font`](crate::Attribute::Font).
//!
//! - [`FontTraits`]: Bitflags for bold, italic and monospace
//! - [`Font`]: Family, point size and traits
//!
//! # Examples
//!
//! ```
//! use styledown::{Font, FontTraits};
//!
//! let body = Font::system(14.0);
//! let title = body.clone().with_size(18.0).with_traits(FontTraits::BOLD);
//!
//! // Merging traits keeps the size of the font they are merged into.
//! let emphasized = title.with_traits(FontTraits::ITALIC);
//! assert!(emphasized.is_bold() && emphasized.is_italic());
//! assert_eq!(emphasized.size, 18.0);
//! ```

use bitflags::bitflags;

bitflags! {
    /// Symbolic font traits.
    ///
    /// Traits are merged with bitwise OR so that nested emphasis accumulates.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct FontTraits: u8 {
        /// Bold weight.
        const BOLD      = 0x01;
        /// Italic/oblique slant.
        const ITALIC    = 0x02;
        /// Fixed-pitch face, used for inline code.
        const MONOSPACE = 0x04;
    }
}

/// Family name used when none is configured.
pub const SYSTEM_FAMILY: &str = "system";

/// Default point size for body text.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// A font descriptor: family, size and traits.
///
/// Font resolution is left to the rendering layer; this type only records
/// what the markup asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    /// Family name (`"system"` means the platform UI font).
    pub family: String,
    /// Point size.
    pub size: f32,
    /// Symbolic traits.
    pub traits: FontTraits,
}

impl Default for Font {
    fn default() -> Self {
        Self::system(DEFAULT_FONT_SIZE)
    }
}

impl Font {
    /// Create a font from a family name and size.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            traits: FontTraits::empty(),
        }
    }

    /// The platform UI font at the given size.
    #[must_use]
    pub fn system(size: f32) -> Self {
        Self::new(SYSTEM_FAMILY, size)
    }

    /// Return this font with a different size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Return this font with `traits` merged in.
    #[must_use]
    pub fn with_traits(mut self, traits: FontTraits) -> Self {
        self.traits |= traits;
        self
    }

    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.traits.contains(FontTraits::BOLD)
    }

    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.traits.contains(FontTraits::ITALIC)
    }

    #[must_use]
    pub fn is_monospace(&self) -> bool {
        self.traits.contains(FontTraits::MONOSPACE)
    }
}
