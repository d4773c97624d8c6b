//! Styled text storage.
//!
//! Key types:
//!
//! - [`StyledTextBuffer`]: rope-backed text plus attribute ranges
//! - [`Attribute`] / [`AttributeKey`]: what a range sets
//! - [`AttributeRange`]: an attribute over a half-open char range
//!
//! # Examples
//!
//! ```
//! use styledown::{Attribute, Rgba, StyledTextBuffer};
//!
//! let mut buffer = StyledTextBuffer::from_text("**hi** there");
//! buffer.apply_attribute(0..12, Attribute::ForegroundColor(Rgba::BLACK)).unwrap();
//!
//! // Stripping delimiters keeps ranges aligned with the text.
//! buffer.delete(4..6).unwrap();
//! buffer.delete(0..2).unwrap();
//! assert_eq!(buffer.text(), "hi there");
//! assert_eq!(buffer.ranges()[0].range, 0..8);
//! ```

mod attribute;
mod buffer;
mod rope;

pub use attribute::{Attribute, AttributeKey, AttributeRange};
pub use buffer::StyledTextBuffer;
pub use rope::RopeWrapper;
