//! Bare URL detection.

use super::escape::{MARKER_LEN, is_marker, unescape_chars};
use super::link::DEFAULT_LINK_COLOR;
use super::{MarkupRule, RuleKind};
use crate::color::Rgba;
use crate::error::Result;
use crate::text::{Attribute, AttributeKey, StyledTextBuffer};
use std::ops::Range;

const SCHEMES: [&str; 3] = ["https://", "http://", "www."];

/// Chars dropped from the end of a detected URL.
fn is_trailing_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '*' | '_')
}

fn is_url_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '<' | '>' | '"')
}

/// Length of the scheme prefix starting at `idx`, if any.
fn scheme_at(chars: &[char], idx: usize) -> Option<usize> {
    SCHEMES.iter().find_map(|scheme| {
        let len = scheme.len();
        let matches = idx + len <= chars.len()
            && chars[idx..idx + len]
                .iter()
                .zip(scheme.chars())
                .all(|(c, s)| c.eq_ignore_ascii_case(&s));
        matches.then_some(len)
    })
}

fn url_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() {
        if chars[end] == '\\' {
            if !is_marker(chars, end) {
                break;
            }
            end += MARKER_LEN;
        } else if is_url_terminator(chars[end]) {
            break;
        } else {
            end += 1;
        }
    }
    end
}

fn trim_url(chars: &[char], range: Range<usize>) -> Range<usize> {
    let mut end = range.end;
    while end > range.start {
        let last = chars[end - 1];
        if is_trailing_punctuation(last) {
            end -= 1;
        } else if last == ')' {
            let url = &chars[range.start..end];
            let open = url.iter().filter(|&&c| c == '(').count();
            let close = url.iter().filter(|&&c| c == ')').count();
            if close <= open {
                break;
            }
            end -= 1;
        } else {
            break;
        }
    }
    range.start..end
}

fn find_urls(chars: &[char]) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut i = 0usize;
    while i < chars.len() {
        let boundary = i == 0 || !chars[i - 1].is_alphanumeric();
        let Some(scheme_len) = scheme_at(chars, i).filter(|_| boundary) else {
            i += 1;
            continue;
        };
        let span = trim_url(chars, i..url_end(chars, i + scheme_len));
        if span.len() > scheme_len {
            i = span.end;
            found.push(span);
        } else {
            i += scheme_len;
        }
    }
    found
}

/// Links bare `http://`, `https://` and `www.` URLs in place.
///
/// The text is not changed. Text that already carries a link (from
/// [`LinkRule`](super::LinkRule)) is skipped.
#[derive(Clone, Debug)]
pub struct AutomaticLinkRule {
    color: Rgba,
}

impl Default for AutomaticLinkRule {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomaticLinkRule {
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: DEFAULT_LINK_COLOR,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}

impl MarkupRule for AutomaticLinkRule {
    fn kind(&self) -> RuleKind {
        RuleKind::AutomaticLink
    }

    fn parse(&self, buffer: &mut StyledTextBuffer) -> Result<()> {
        let chars = buffer.chars();
        for span in find_urls(&chars) {
            if buffer.has_attribute(span.clone(), &AttributeKey::Link) {
                continue;
            }
            let mut url = unescape_chars(&chars[span.clone()]);
            if url.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
                url.insert_str(0, "http://");
            }
            buffer.apply_attribute(span.clone(), Attribute::Link(url))?;
            buffer.apply_attribute(span, Attribute::ForegroundColor(self.color))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> StyledTextBuffer {
        let mut buffer = StyledTextBuffer::from_text(text);
        AutomaticLinkRule::new().parse(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn detects_schemes_without_changing_text() {
        let buffer = run("Visit https://example.com today");
        assert_eq!(buffer.text(), "Visit https://example.com today");
        assert_eq!(buffer.link_at(6), Some("https://example.com"));
        assert_eq!(buffer.link_at(24), Some("https://example.com"));
        assert_eq!(buffer.link_at(25), None);
        assert_eq!(buffer.link_at(5), None);
    }

    #[test]
    fn www_gets_a_scheme() {
        let buffer = run("WWW.Example.com");
        assert_eq!(buffer.link_at(0), Some("http://WWW.Example.com"));
    }

    #[test]
    fn trailing_punctuation_is_trimmed() {
        let buffer = run("(see http://a.io/x_(y)).");
        assert_eq!(buffer.link_at(5), Some("http://a.io/x_(y)"));
        assert_eq!(buffer.link_at(22), None);

        let buffer = run("go to www.a.io, then");
        assert_eq!(buffer.link_at(6), Some("http://www.a.io"));
        assert_eq!(buffer.link_at(14), None);
    }

    #[test]
    fn scheme_inside_a_word_is_ignored() {
        let buffer = run("xhttp://a.io and http:// alone");
        assert!(buffer.ranges().is_empty());
    }

    #[test]
    fn existing_links_are_skipped() {
        let mut buffer = StyledTextBuffer::from_text("https://a.io")
            .with_attribute(0..12, Attribute::Link("https://b.io".into()))
            .unwrap();
        AutomaticLinkRule::new().parse(&mut buffer).unwrap();
        assert_eq!(buffer.link_at(0), Some("https://b.io"));
        assert!(buffer.color_at(0).is_none());
    }

    #[test]
    fn markers_stay_inside_and_are_decoded() {
        let buffer = run(r"http://a.io/\005fx\ y");
        assert_eq!(buffer.link_at(0), Some("http://a.io/_x"));
        assert_eq!(buffer.link_at(18), None);
    }
}
