//! Escaping and unescaping rules.
//!
//! Escaping hides text from the formatting rules by rewriting it into forms
//! no formatting rule matches:
//!
//! - inline code contents become bare lowercase hex, four digits per UTF-16
//!   code unit (`*` becomes `002a`);
//! - a backslash-escaped char becomes a marker: a backslash followed by the
//!   same four-digit hex (`\*` becomes `\002a`).
//!
//! [`CodeRule`](super::CodeRule) decodes code contents and
//! [`UnescapeRule`] decodes the markers that survive formatting.

use super::code::find_code_spans;
use super::scan::apply_reversed;
use super::{MarkupRule, RuleKind};
use crate::error::Result;
use crate::text::StyledTextBuffer;
use std::fmt::Write as _;
use std::ops::Range;

/// Chars in one escape marker: the backslash and four hex digits.
pub(crate) const MARKER_LEN: usize = 5;

fn is_hex(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f')
}

/// Encode text as four lowercase hex digits per UTF-16 code unit.
pub(crate) fn encode_hex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 4);
    for unit in text.encode_utf16() {
        let _ = write!(out, "{unit:04x}");
    }
    out
}

/// Decode text produced by [`encode_hex`]. `None` if `chars` is not a whole
/// number of hex groups or holds an unpaired surrogate.
pub(crate) fn decode_hex(chars: &[char]) -> Option<String> {
    if chars.len() % 4 != 0 || !chars.iter().all(|&c| is_hex(c)) {
        return None;
    }
    let units: Vec<u16> = chars
        .chunks(4)
        .map(|group| {
            group
                .iter()
                .fold(0u16, |acc, &c| (acc << 4) | c.to_digit(16).unwrap_or(0) as u16)
        })
        .collect();
    char::decode_utf16(units).collect::<std::result::Result<String, _>>().ok()
}

/// Escape marker(s) for a single char.
pub(crate) fn escape_marker(c: char) -> String {
    let mut buf = [0u16; 2];
    let mut out = String::with_capacity(MARKER_LEN * 2);
    for unit in c.encode_utf16(&mut buf) {
        let _ = write!(out, "\\{unit:04x}");
    }
    out
}

/// Whether an escape marker starts at `idx`.
pub(crate) fn is_marker(chars: &[char], idx: usize) -> bool {
    chars.get(idx) == Some(&'\\')
        && idx + MARKER_LEN <= chars.len()
        && chars[idx + 1..idx + MARKER_LEN].iter().all(|&c| is_hex(c))
}

/// End offset of the run of consecutive markers starting at `idx`.
pub(crate) fn marker_run_end(chars: &[char], idx: usize) -> usize {
    let mut end = idx;
    while is_marker(chars, end) {
        end += MARKER_LEN;
    }
    end
}

fn decode_marker_run(chars: &[char]) -> String {
    let units = chars.chunks(MARKER_LEN).map(|marker| {
        marker[1..]
            .iter()
            .fold(0u16, |acc, &c| (acc << 4) | c.to_digit(16).unwrap_or(0) as u16)
    });
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Replace every escape marker in `chars` with the char it encodes. Used for
/// values lifted out of the text, such as link targets.
pub(crate) fn unescape_chars(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0usize;
    while i < chars.len() {
        if is_marker(chars, i) {
            let end = marker_run_end(chars, i);
            out.push_str(&decode_marker_run(&chars[i..end]));
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Hides inline code contents from every later rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeEscapeRule;

impl CodeEscapeRule {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupRule for CodeEscapeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::CodeEscape
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let chars = buffer.chars();
        let spans = find_code_spans(&chars);
        apply_reversed(buffer, spans, |buffer, span| {
            let content: String = chars[span.content.clone()].iter().collect();
            buffer.replace_text(span.content, &encode_hex(&content))
        })
    }
}

/// Turns backslash-escaped chars into escape markers.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapeRule;

impl EscapeRule {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupRule for EscapeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Escape
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let chars = buffer.chars();
        let mut escapes: Vec<(Range<usize>, char)> = Vec::new();
        let mut i = 0usize;
        while i + 1 < chars.len() {
            let next = chars[i + 1];
            if chars[i] == '\\' && next != '\n' && next != '\r' {
                escapes.push((i..i + 2, next));
                i += 2;
            } else {
                i += 1;
            }
        }
        apply_reversed(buffer, escapes, |buffer, (range, c)| {
            buffer.replace_text(range, &escape_marker(c))
        })
    }
}

/// Restores the literal chars behind escape markers.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnescapeRule;

impl UnescapeRule {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupRule for UnescapeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Unescape
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let chars = buffer.chars();
        let mut runs: Vec<(Range<usize>, String)> = Vec::new();
        let mut i = 0usize;
        while i < chars.len() {
            if is_marker(&chars, i) {
                let end = marker_run_end(&chars, i);
                runs.push((i..end, decode_marker_run(&chars[i..end])));
                i = end;
            } else {
                i += 1;
            }
        }
        apply_reversed(buffer, runs, |buffer, (range, literal)| {
            buffer.replace_text(range, &literal)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &dyn MarkupRule, text: &str) -> String {
        let mut buffer = StyledTextBuffer::from_text(text);
        rule.parse(&mut buffer).unwrap();
        buffer.text()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn hex_encoding_covers_surrogate_pairs() {
        assert_eq!(encode_hex("*a"), "002a0061");
        assert_eq!(encode_hex("😀"), "d83dde00");
        assert_eq!(decode_hex(&chars("d83dde00")).as_deref(), Some("😀"));
    }

    #[test]
    fn decode_hex_rejects_partial_groups() {
        assert_eq!(decode_hex(&chars("002")), None);
        assert_eq!(decode_hex(&chars("00zz")), None);
        assert_eq!(decode_hex(&chars("00AF")), None);
        assert_eq!(decode_hex(&chars("d83d")), None);
    }

    #[test]
    fn escape_rule_writes_markers() {
        assert_eq!(run(&EscapeRule, r"\*x\*"), r"\002ax\002a");
        assert_eq!(run(&EscapeRule, r"\\"), r"\005c");
        // A trailing backslash or one before a line break stays literal.
        assert_eq!(run(&EscapeRule, "a\\"), "a\\");
        assert_eq!(run(&EscapeRule, "a\\\nb"), "a\\\nb");
    }

    #[test]
    fn escape_rule_marks_non_bmp_chars_with_two_markers() {
        assert_eq!(run(&EscapeRule, "\\😀"), r"\d83d\de00");
        assert_eq!(run(&UnescapeRule, r"\d83d\de00"), "😀");
    }

    #[test]
    fn unescape_rule_restores_literals() {
        assert_eq!(run(&UnescapeRule, r"\002ax\002a"), "*x*");
        assert_eq!(run(&UnescapeRule, r"keep \ this"), r"keep \ this");
        assert_eq!(run(&UnescapeRule, r"\00"), r"\00");
    }

    #[test]
    fn code_escape_rule_hides_code_contents() {
        assert_eq!(run(&CodeEscapeRule, "a `*b*` c"), "a `002a0062002a` c");
        assert_eq!(run(&CodeEscapeRule, "``a`b``"), "``006100600062``");
        // Escaped opener is not code.
        assert_eq!(run(&CodeEscapeRule, r"\`a`"), r"\`a`");
        // Unclosed spans are left alone.
        assert_eq!(run(&CodeEscapeRule, "`open"), "`open");
    }

    #[test]
    fn unescape_chars_decodes_inline_markers() {
        assert_eq!(unescape_chars(&chars(r"a\005fb")), "a_b");
        assert_eq!(unescape_chars(&chars(r"plain\")), r"plain\");
    }

    #[test]
    fn escape_then_unescape_is_identity_for_text() {
        let input = r"\# not a header, \[not](a link) \_x\_";
        let mut buffer = StyledTextBuffer::from_text(input);
        EscapeRule.parse(&mut buffer).unwrap();
        assert!(!buffer.text().contains('#'));
        UnescapeRule.parse(&mut buffer).unwrap();
        assert_eq!(buffer.text(), "# not a header, [not](a link) _x_");
    }
}
