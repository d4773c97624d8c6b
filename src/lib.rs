//! `styledown` - lightweight markup to styled text
//!
//! Converts text carrying Markdown-like markup (headers, lists, quotes,
//! links, emphasis, inline code, backslash escapes) into a
//! [`StyledTextBuffer`]: plain text plus non-overlapping attribute ranges
//! for fonts, colors and link targets.
//!
//! Parsing is an ordered pipeline of independent [`MarkupRule`]s. Rules run
//! in three phases (escaping, formatting, unescaping) and user rules can be
//! appended to the formatting phase.
//!
//! ```
//! use styledown::Parser;
//!
//! let doc = Parser::new().parse("- see [docs](https://docs.rs)").unwrap();
//! assert_eq!(doc.text(), "  • see docs");
//! assert_eq!(doc.link_at(8), Some("https://docs.rs"));
//! ```

// Crate-level lint configuration
#![warn(unsafe_code)]
#![allow(clippy::cast_possible_truncation)] // Intentional offset/hex casts
#![allow(clippy::cast_sign_loss)] // Intentional color conversions
#![allow(clippy::cast_precision_loss)] // Intentional for font and color math
#![allow(clippy::module_name_repetitions)] // Allow rules::MarkupRule etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::inherent_to_string)] // to_string methods are convenient
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::float_cmp)] // Exact sizes in tests are intentional

pub mod color;
pub mod error;
pub mod log;
pub mod parser;
pub mod registry;
pub mod rules;
pub mod style;
pub mod text;

// Re-export core types at crate root
pub use color::Rgba;
pub use error::{Error, Result};
pub use log::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use parser::{Parser, ParserBuilder, ParserOptions};
pub use registry::{BuiltinRules, Phase, RuleRegistry};
pub use style::{Font, FontTraits};
pub use text::{Attribute, AttributeKey, AttributeRange, RopeWrapper, StyledTextBuffer};

// Re-export rule types
pub use rules::{
    AutomaticLinkRule, BoldRule, CodeEscapeRule, CodeRule, EscapeRule, HeaderRule, ItalicRule,
    LinkRule, ListRule, MarkupRule, QuoteRule, RuleKind, UnescapeRule,
};
