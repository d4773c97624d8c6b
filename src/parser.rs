//! The markup parsing pipeline.
//!
//! [`Parser::parse`] turns text into a [`StyledTextBuffer`] in three phases:
//!
//! 1. **Escaping**: inline code contents and backslash escapes are rewritten
//!    so no formatting rule can match them.
//! 2. **Formatting**: headers, lists, quotes, links, automatic links, bold,
//!    italic, then any custom rules in the order they were added.
//! 3. **Unescaping**: code spans and escaped chars are restored.
//!
//! # Examples
//!
//! ```
//! use styledown::Parser;
//!
//! let parser = Parser::new();
//! let doc = parser.parse("# Notes\nSee **this** and `*that*`").unwrap();
//! assert_eq!(doc.text(), "Notes\nSee this and *that*");
//! assert!(doc.font_at(0).unwrap().is_bold());
//! assert!(doc.font_at(10).unwrap().is_bold());
//! assert!(doc.font_at(19).unwrap().is_monospace());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::log::{LogLevel, emit_log};
use crate::registry::{BuiltinRules, Phase, RuleRegistry};
use crate::rules::{
    AutomaticLinkRule, CodeRule, HeaderRule, LinkRule, ListRule, MarkupRule, QuoteRule, RuleKind,
};
use crate::style::Font;
use crate::text::{Attribute, StyledTextBuffer};

/// Parser configuration.
#[derive(Clone)]
pub struct ParserOptions {
    /// Font applied to the whole document before any rule runs.
    pub font: Font,
    /// Text color applied to the whole document before any rule runs.
    pub color: Rgba,
    /// Run the automatic link rule.
    pub automatic_link_detection: bool,
    /// Rules run after the built-in formatting rules, in order.
    pub custom_rules: Vec<Arc<dyn MarkupRule>>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            font: Font::default(),
            color: Rgba::BLACK,
            automatic_link_detection: true,
            custom_rules: Vec::new(),
        }
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let custom: Vec<&str> = self.custom_rules.iter().map(|r| r.name()).collect();
        f.debug_struct("ParserOptions")
            .field("font", &self.font)
            .field("color", &self.color)
            .field("automatic_link_detection", &self.automatic_link_detection)
            .field("custom_rules", &custom)
            .finish()
    }
}

/// Converts lightweight markup into styled text.
#[derive(Clone, Debug)]
pub struct Parser {
    font: Font,
    color: Rgba,
    automatic_link_detection: bool,
    registry: RuleRegistry,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Parser with the default font, black text and automatic links on.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    #[must_use]
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        let builtins = BuiltinRules::new(&options.font);
        Self::from_parts(options, builtins)
    }

    fn from_parts(options: ParserOptions, builtins: BuiltinRules) -> Self {
        let ParserOptions {
            font,
            color,
            automatic_link_detection,
            custom_rules,
        } = options;
        let mut registry = RuleRegistry::new(builtins);
        for rule in custom_rules {
            registry.add_custom_rule(rule);
        }
        Self {
            font,
            color,
            automatic_link_detection,
            registry,
        }
    }

    /// Parse `input` into a new styled buffer.
    ///
    /// The default font and color are applied to the whole input first,
    /// replacing any font or color an input buffer already carried. If a
    /// rule fails the error is returned and no partial result escapes.
    pub fn parse(&self, input: impl Into<StyledTextBuffer>) -> Result<StyledTextBuffer> {
        let mut buffer = input.into();
        let len = buffer.len_chars();
        buffer.apply_attribute(0..len, Attribute::Font(self.font.clone()))?;
        buffer.apply_attribute(0..len, Attribute::ForegroundColor(self.color))?;

        for phase in Phase::ALL {
            self.parse_phase(&mut buffer, phase)?;
        }
        Ok(buffer)
    }

    /// Run the rules of a single phase over `buffer`.
    ///
    /// In the formatting phase the built-in rules are repeated until a round
    /// leaves the text unchanged, since one rule consuming its delimiters can
    /// expose markup for an earlier one (`*#* a` becomes a header line).
    /// Custom rules then run once. Running the formatting phase again on the
    /// result changes nothing.
    pub fn parse_phase(&self, buffer: &mut StyledTextBuffer, phase: Phase) -> Result<()> {
        match phase {
            Phase::Formatting => {
                let builtins = self.active_rules(self.registry.builtin_formatting_rules());
                Self::run_until_stable(buffer, phase, &builtins)?;
                let custom = self.active_rules(self.registry.custom_rules());
                Self::run_rules(buffer, phase, &custom)
            }
            Phase::Escaping | Phase::Unescaping => {
                let rules = self.active_rules(&self.registry.phase_rules(phase));
                Self::run_rules(buffer, phase, &rules)
            }
        }
    }

    /// `rules` minus the ones switched off by configuration.
    fn active_rules(&self, rules: &[Arc<dyn MarkupRule>]) -> Vec<Arc<dyn MarkupRule>> {
        rules
            .iter()
            .filter(|rule| {
                let run = self.automatic_link_detection || rule.kind() != RuleKind::AutomaticLink;
                if !run {
                    emit_log(
                        LogLevel::Debug,
                        &format!("skipping {} rule: detection disabled", rule.name()),
                    );
                }
                run
            })
            .cloned()
            .collect()
    }

    fn run_rules(
        buffer: &mut StyledTextBuffer,
        phase: Phase,
        rules: &[Arc<dyn MarkupRule>],
    ) -> Result<()> {
        for rule in rules {
            if let Err(err) = rule.parse(buffer) {
                emit_log(
                    LogLevel::Error,
                    &format!("{phase} rule `{}` failed: {err}", rule.name()),
                );
                return Err(err);
            }
        }
        Ok(())
    }

    fn run_until_stable(
        buffer: &mut StyledTextBuffer,
        phase: Phase,
        rules: &[Arc<dyn MarkupRule>],
    ) -> Result<()> {
        // Every round that changes the text removes a delimiter or rewrites
        // a line prefix exposed by an earlier removal.
        let max_rounds = 3 * buffer.len_chars() + 4;
        for _ in 0..max_rounds {
            let before = buffer.text();
            Self::run_rules(buffer, phase, rules)?;
            if buffer.text() == before {
                return Ok(());
            }
        }
        emit_log(
            LogLevel::Warn,
            &format!("{phase} rules still rewriting text after {max_rounds} rounds"),
        );
        Ok(())
    }

    /// Append a rule to run after the built-in formatting rules.
    pub fn add_custom_rule(&mut self, rule: Arc<dyn MarkupRule>) {
        emit_log(
            LogLevel::Debug,
            &format!("adding custom rule `{}`", rule.name()),
        );
        self.registry.add_custom_rule(rule);
    }

    /// Remove the first registration of `rule` (by identity). Returns
    /// `false` if it was not registered.
    pub fn remove_custom_rule(&mut self, rule: &Arc<dyn MarkupRule>) -> bool {
        let removed = self.registry.remove_custom_rule(rule);
        if removed {
            emit_log(
                LogLevel::Debug,
                &format!("removed custom rule `{}`", rule.name()),
            );
        }
        removed
    }

    /// Formatting rules in execution order, custom rules included.
    ///
    /// The automatic link rule is listed even while detection is disabled.
    #[must_use]
    pub fn elements(&self) -> Vec<Arc<dyn MarkupRule>> {
        self.registry.formatting_rules()
    }

    #[must_use]
    pub fn automatic_link_detection(&self) -> bool {
        self.automatic_link_detection
    }

    pub fn set_automatic_link_detection(&mut self, enabled: bool) {
        self.automatic_link_detection = enabled;
    }

    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    #[must_use]
    pub fn color(&self) -> Rgba {
        self.color
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }
}

/// Fluent [`Parser`] configuration, including per-rule overrides.
///
/// ```
/// use styledown::{Font, Parser, QuoteRule};
///
/// let parser = Parser::builder()
///     .font(Font::system(14.0))
///     .color_hex("#333333")
///     .unwrap()
///     .quote_rule(QuoteRule::new().with_indicator(">"))
///     .automatic_link_detection(false)
///     .build();
/// assert_eq!(parser.parse("> hi").unwrap().text(), "  > hi");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParserBuilder {
    options: ParserOptions,
    header: Option<HeaderRule>,
    list: Option<ListRule>,
    quote: Option<QuoteRule>,
    link: Option<LinkRule>,
    automatic_link: Option<AutomaticLinkRule>,
    code: Option<CodeRule>,
}

impl ParserBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Document font. Also the base of the default header sizes.
    #[must_use]
    pub fn font(mut self, font: Font) -> Self {
        self.options.font = font;
        self
    }

    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.options.color = color;
        self
    }

    /// Document color from a hex string (`#RGB`, `#RRGGBB`, `#RRGGBBAA`).
    pub fn color_hex(self, hex: &str) -> Result<Self> {
        let color = Rgba::from_hex(hex).ok_or_else(|| Error::InvalidColor(hex.to_string()))?;
        Ok(self.color(color))
    }

    #[must_use]
    pub fn automatic_link_detection(mut self, enabled: bool) -> Self {
        self.options.automatic_link_detection = enabled;
        self
    }

    #[must_use]
    pub fn custom_rule(mut self, rule: Arc<dyn MarkupRule>) -> Self {
        self.options.custom_rules.push(rule);
        self
    }

    #[must_use]
    pub fn header_rule(mut self, rule: HeaderRule) -> Self {
        self.header = Some(rule);
        self
    }

    #[must_use]
    pub fn list_rule(mut self, rule: ListRule) -> Self {
        self.list = Some(rule);
        self
    }

    #[must_use]
    pub fn quote_rule(mut self, rule: QuoteRule) -> Self {
        self.quote = Some(rule);
        self
    }

    #[must_use]
    pub fn link_rule(mut self, rule: LinkRule) -> Self {
        self.link = Some(rule);
        self
    }

    #[must_use]
    pub fn automatic_link_rule(mut self, rule: AutomaticLinkRule) -> Self {
        self.automatic_link = Some(rule);
        self
    }

    #[must_use]
    pub fn code_rule(mut self, rule: CodeRule) -> Self {
        self.code = Some(rule);
        self
    }

    #[must_use]
    pub fn build(self) -> Parser {
        let mut builtins = BuiltinRules::new(&self.options.font);
        if let Some(rule) = self.header {
            builtins.header = rule;
        }
        if let Some(rule) = self.list {
            builtins.list = rule;
        }
        if let Some(rule) = self.quote {
            builtins.quote = rule;
        }
        if let Some(rule) = self.link {
            builtins.link = rule;
        }
        if let Some(rule) = self.automatic_link {
            builtins.automatic_link = rule;
        }
        if let Some(rule) = self.code {
            builtins.code = rule;
        }
        Parser::from_parts(self.options, builtins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::AttributeKey;
    use std::sync::Mutex;

    /// Records the text it sees and wraps the document in a custom attribute.
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl MarkupRule for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
            self.seen.lock().unwrap().push(buffer.text());
            Ok(())
        }
    }

    struct Failing;

    impl MarkupRule for Failing {
        fn parse(&self, _buffer: &mut StyledTextBuffer) -> Result<()> {
            Err(Error::rule("failing", "always fails"))
        }
    }

    #[test]
    fn default_font_and_color_cover_plain_text() {
        let doc = Parser::new().parse("plain").unwrap();
        assert_eq!(doc.text(), "plain");
        assert_eq!(doc.font_at(0), Some(&Font::default()));
        assert_eq!(doc.font_at(4), Some(&Font::default()));
        assert_eq!(doc.color_at(2), Some(Rgba::BLACK));
        assert_eq!(doc.ranges().len(), 2);
    }

    #[test]
    fn empty_input_parses_to_empty_buffer() {
        let doc = Parser::new().parse("").unwrap();
        assert!(doc.is_empty());
        assert!(doc.ranges().is_empty());
    }

    #[test]
    fn header_font_spans_whole_title() {
        let doc = Parser::new().parse("# Title").unwrap();
        assert_eq!(doc.text(), "Title");
        let header = HeaderRule::new(&Font::default()).font_for_level(1);
        for i in 0..5 {
            assert_eq!(doc.font_at(i), Some(&header));
        }
    }

    #[test]
    fn escaped_delimiters_stay_literal() {
        let doc = Parser::new().parse(r"\*not italic\*").unwrap();
        assert_eq!(doc.text(), "*not italic*");
        assert!(!doc.font_at(1).unwrap().is_italic());
    }

    #[test]
    fn code_hides_emphasis() {
        let doc = Parser::new().parse("`*bold*`").unwrap();
        assert_eq!(doc.text(), "*bold*");
        let font = doc.font_at(0).unwrap();
        assert!(font.is_monospace());
        assert!(!font.is_bold() && !font.is_italic());
    }

    #[test]
    fn automatic_link_toggle() {
        let mut parser = Parser::new();
        let text = "Visit https://example.com";

        let doc = parser.parse(text).unwrap();
        assert_eq!(doc.link_at(6), Some("https://example.com"));

        parser.set_automatic_link_detection(false);
        assert!(!parser.automatic_link_detection());
        let doc = parser.parse(text).unwrap();
        assert_eq!(doc.text(), text);
        assert!(!doc.has_attribute(0..doc.len_chars(), &AttributeKey::Link));

        // Explicit links still work.
        let doc = parser.parse("[x](https://a.io)").unwrap();
        assert_eq!(doc.link_at(0), Some("https://a.io"));
    }

    #[test]
    fn custom_rules_run_after_formatting_before_unescaping() {
        let recorder = Recorder::new();
        let mut parser = Parser::new();
        parser.add_custom_rule(Arc::<Recorder>::clone(&recorder));

        let doc = parser.parse(r"**a** \_b\_ `c`").unwrap();
        assert_eq!(doc.text(), "a _b_ c");
        assert_eq!(recorder.seen(), vec![r"a \005fb\005f `0063`".to_string()]);
    }

    #[test]
    fn exposed_markup_is_formatted_and_custom_rules_run_once() {
        let recorder = Recorder::new();
        let mut parser = Parser::new();
        parser.add_custom_rule(Arc::<Recorder>::clone(&recorder));

        let doc = parser.parse("*#* a").unwrap();
        assert_eq!(doc.text(), "a");
        assert!(doc.font_at(0).unwrap().is_bold());
        assert_eq!(recorder.seen(), vec!["a".to_string()]);
    }

    #[test]
    fn elements_lists_builtins_then_custom() {
        let recorder: Arc<dyn MarkupRule> = Recorder::new();
        let mut parser = Parser::new();
        parser.add_custom_rule(Arc::clone(&recorder));
        parser.set_automatic_link_detection(false);

        let elements = parser.elements();
        assert_eq!(elements.len(), 8);
        assert_eq!(elements[4].kind(), RuleKind::AutomaticLink);
        assert_eq!(elements[7].name(), "recorder");

        assert!(parser.remove_custom_rule(&recorder));
        assert!(!parser.remove_custom_rule(&recorder));
        assert_eq!(parser.elements().len(), 7);
    }

    #[test]
    fn rule_errors_propagate() {
        let mut parser = Parser::new();
        parser.add_custom_rule(Arc::new(Failing));
        let err = parser.parse("text").unwrap_err();
        assert_eq!(err, Error::rule("failing", "always fails"));
    }

    #[test]
    fn options_seed_the_parser() {
        let recorder: Arc<dyn MarkupRule> = Recorder::new();
        let parser = Parser::with_options(ParserOptions {
            font: Font::system(16.0),
            color: Rgba::RED,
            automatic_link_detection: false,
            custom_rules: vec![recorder],
        });
        assert_eq!(parser.font().size, 16.0);
        assert_eq!(parser.color(), Rgba::RED);
        assert!(!parser.automatic_link_detection());
        assert_eq!(parser.registry().custom_rules().len(), 1);

        let header = parser.parse("# Big").unwrap();
        assert_eq!(header.font_at(0).unwrap().size, 20.0);
    }

    #[test]
    fn builder_overrides_rules() {
        let parser = Parser::builder()
            .list_rule(ListRule::new().with_indicator("-"))
            .code_rule(CodeRule::new().with_background(None))
            .link_rule(LinkRule::new().with_color(Rgba::GREEN))
            .build();
        let doc = parser.parse("- [a](b) `c`").unwrap();
        assert_eq!(doc.text(), "  - a c");
        assert_eq!(doc.color_at(4), Some(Rgba::GREEN));
        assert!(doc.background_at(6).is_none());
    }

    #[test]
    fn builder_rejects_bad_hex() {
        let err = Parser::builder().color_hex("#12").unwrap_err();
        assert_eq!(err, Error::InvalidColor("#12".to_string()));
    }

    #[test]
    fn parse_phase_escaping_only() {
        let parser = Parser::new();
        let mut buffer = StyledTextBuffer::from_text(r"\# a");
        parser.parse_phase(&mut buffer, Phase::Escaping).unwrap();
        assert_eq!(buffer.text(), r"\0023 a");
        parser.parse_phase(&mut buffer, Phase::Formatting).unwrap();
        assert_eq!(buffer.text(), r"\0023 a");
        parser.parse_phase(&mut buffer, Phase::Unescaping).unwrap();
        assert_eq!(buffer.text(), "# a");
    }
}
