//! Ordered rule storage for the parsing pipeline.

use std::fmt;
use std::sync::Arc;

use crate::rules::{
    AutomaticLinkRule, BoldRule, CodeEscapeRule, CodeRule, EscapeRule, HeaderRule, ItalicRule,
    LinkRule, ListRule, MarkupRule, QuoteRule, UnescapeRule,
};
use crate::style::Font;

/// Pipeline phase. Phases always run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Hide code and escaped chars from formatting.
    Escaping,
    /// Built-in formatting rules, then custom rules.
    Formatting,
    /// Restore what escaping hid.
    Unescaping,
}

impl Phase {
    /// Every phase, in execution order.
    pub const ALL: [Self; 3] = [Self::Escaping, Self::Formatting, Self::Unescaping];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Escaping => "escaping",
            Self::Formatting => "formatting",
            Self::Unescaping => "unescaping",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configurable built-in rules, before they are fixed into a registry.
#[derive(Clone, Debug)]
pub struct BuiltinRules {
    pub header: HeaderRule,
    pub list: ListRule,
    pub quote: QuoteRule,
    pub link: LinkRule,
    pub automatic_link: AutomaticLinkRule,
    pub code: CodeRule,
}

impl BuiltinRules {
    /// Default built-ins for documents whose body text uses `font`.
    #[must_use]
    pub fn new(font: &Font) -> Self {
        Self {
            header: HeaderRule::new(font),
            list: ListRule::new(),
            quote: QuoteRule::new(),
            link: LinkRule::new(),
            automatic_link: AutomaticLinkRule::new(),
            code: CodeRule::new(),
        }
    }
}

impl Default for BuiltinRules {
    fn default() -> Self {
        Self::new(&Font::default())
    }
}

/// Rules grouped by phase.
///
/// The built-in rules and their order are fixed at construction. Only the
/// custom rules, which run at the end of the formatting phase, can change.
#[derive(Clone)]
pub struct RuleRegistry {
    escaping: Vec<Arc<dyn MarkupRule>>,
    formatting: Vec<Arc<dyn MarkupRule>>,
    unescaping: Vec<Arc<dyn MarkupRule>>,
    custom: Vec<Arc<dyn MarkupRule>>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new(builtins: BuiltinRules) -> Self {
        let BuiltinRules {
            header,
            list,
            quote,
            link,
            automatic_link,
            code,
        } = builtins;
        Self {
            escaping: vec![Arc::new(CodeEscapeRule::new()), Arc::new(EscapeRule::new())],
            formatting: vec![
                Arc::new(header),
                Arc::new(list),
                Arc::new(quote),
                Arc::new(link),
                Arc::new(automatic_link),
                Arc::new(BoldRule::new()),
                Arc::new(ItalicRule::new()),
            ],
            unescaping: vec![Arc::new(code), Arc::new(UnescapeRule::new())],
            custom: Vec::new(),
        }
    }

    /// Append a custom rule. The same rule may be added more than once.
    pub fn add_custom_rule(&mut self, rule: Arc<dyn MarkupRule>) {
        self.custom.push(rule);
    }

    /// Remove the first custom rule that is the same allocation as `rule`.
    ///
    /// Returns `false` when no such rule is registered.
    pub fn remove_custom_rule(&mut self, rule: &Arc<dyn MarkupRule>) -> bool {
        let Some(index) = self.custom.iter().position(|r| same_rule(r, rule)) else {
            return false;
        };
        self.custom.remove(index);
        true
    }

    #[must_use]
    pub fn custom_rules(&self) -> &[Arc<dyn MarkupRule>] {
        &self.custom
    }

    /// Built-in formatting rules in execution order, without custom rules.
    #[must_use]
    pub fn builtin_formatting_rules(&self) -> &[Arc<dyn MarkupRule>] {
        &self.formatting
    }

    /// Formatting rules in execution order: built-ins, then custom rules.
    #[must_use]
    pub fn formatting_rules(&self) -> Vec<Arc<dyn MarkupRule>> {
        self.formatting.iter().chain(&self.custom).cloned().collect()
    }

    /// Rules of one phase in execution order.
    #[must_use]
    pub fn phase_rules(&self, phase: Phase) -> Vec<Arc<dyn MarkupRule>> {
        match phase {
            Phase::Escaping => self.escaping.clone(),
            Phase::Formatting => self.formatting_rules(),
            Phase::Unescaping => self.unescaping.clone(),
        }
    }

    /// Every rule in execution order, tagged with its phase.
    #[must_use]
    pub fn all_rules(&self) -> Vec<(Phase, Arc<dyn MarkupRule>)> {
        Phase::ALL
            .into_iter()
            .flat_map(|phase| {
                self.phase_rules(phase)
                    .into_iter()
                    .map(move |rule| (phase, rule))
            })
            .collect()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(BuiltinRules::default())
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |rules: &[Arc<dyn MarkupRule>]| -> Vec<String> {
            rules.iter().map(|r| r.name().to_string()).collect()
        };
        f.debug_struct("RuleRegistry")
            .field("escaping", &names(&self.escaping))
            .field("formatting", &names(&self.formatting))
            .field("custom", &names(&self.custom))
            .field("unescaping", &names(&self.unescaping))
            .finish()
    }
}

/// Rule identity is the allocation, not the rule's value.
fn same_rule(a: &Arc<dyn MarkupRule>, b: &Arc<dyn MarkupRule>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::rules::RuleKind;
    use crate::text::StyledTextBuffer;

    struct Noop(&'static str);

    impl MarkupRule for Noop {
        fn name(&self) -> &str {
            self.0
        }

        fn parse(&self, _buffer: &mut StyledTextBuffer) -> Result<()> {
            Ok(())
        }
    }

    fn kinds(rules: &[Arc<dyn MarkupRule>]) -> Vec<RuleKind> {
        rules.iter().map(|r| r.kind()).collect()
    }

    #[test]
    fn builtin_order_is_fixed() {
        let registry = RuleRegistry::default();
        assert_eq!(
            kinds(&registry.phase_rules(Phase::Escaping)),
            [RuleKind::CodeEscape, RuleKind::Escape]
        );
        assert_eq!(
            kinds(&registry.formatting_rules()),
            [
                RuleKind::Header,
                RuleKind::List,
                RuleKind::Quote,
                RuleKind::Link,
                RuleKind::AutomaticLink,
                RuleKind::Bold,
                RuleKind::Italic,
            ]
        );
        assert_eq!(
            kinds(&registry.phase_rules(Phase::Unescaping)),
            [RuleKind::Code, RuleKind::Unescape]
        );
        assert_eq!(registry.all_rules().len(), 11);
    }

    #[test]
    fn custom_rules_follow_builtin_formatting() {
        let mut registry = RuleRegistry::default();
        registry.add_custom_rule(Arc::new(Noop("first")));
        registry.add_custom_rule(Arc::new(Noop("second")));

        let formatting = registry.formatting_rules();
        assert_eq!(formatting.len(), 9);
        assert_eq!(registry.builtin_formatting_rules().len(), 7);
        assert_eq!(formatting[7].name(), "first");
        assert_eq!(formatting[8].name(), "second");

        let all = registry.all_rules();
        assert_eq!(all[10].0, Phase::Formatting);
        assert_eq!(all[10].1.name(), "second");
        assert_eq!(all[11].1.kind(), RuleKind::Code);
    }

    #[test]
    fn remove_uses_identity() {
        let mut registry = RuleRegistry::default();
        let rule: Arc<dyn MarkupRule> = Arc::new(Noop("dup"));
        let lookalike: Arc<dyn MarkupRule> = Arc::new(Noop("dup"));
        registry.add_custom_rule(Arc::clone(&rule));
        registry.add_custom_rule(Arc::clone(&rule));

        assert!(!registry.remove_custom_rule(&lookalike));
        assert_eq!(registry.custom_rules().len(), 2);

        assert!(registry.remove_custom_rule(&rule));
        assert_eq!(registry.custom_rules().len(), 1);
        assert!(registry.remove_custom_rule(&rule));
        assert!(!registry.remove_custom_rule(&rule));
        assert!(registry.custom_rules().is_empty());
    }

    #[test]
    fn debug_lists_rule_names() {
        let mut registry = RuleRegistry::default();
        registry.add_custom_rule(Arc::new(Noop("mine")));
        let debug = format!("{registry:?}");
        assert!(debug.contains("\"header\""));
        assert!(debug.contains("\"mine\""));
        assert!(debug.contains("\"unescape\""));
    }
}
