#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Not every test binary uses every helper

use std::fmt::Write;
use std::sync::Once;

use styledown::{Attribute, Font, LogLevel, StyledTextBuffer, set_log_callback};
use tracing::Level;

/// Install a test-writer subscriber and route library log records into it.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_test_writer()
            .try_init();
        set_log_callback(|level, message| match level {
            LogLevel::Debug => tracing::debug!(target: "styledown", "{message}"),
            LogLevel::Info => tracing::info!(target: "styledown", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "styledown", "{message}"),
            LogLevel::Error => tracing::error!(target: "styledown", "{message}"),
        });
    });
}

fn describe_font(font: &Font) -> String {
    let mut out = format!("{} {}", font.family, font.size);
    for (set, name) in [
        (font.is_bold(), "bold"),
        (font.is_italic(), "italic"),
        (font.is_monospace(), "mono"),
    ] {
        if set {
            out.push(' ');
            out.push_str(name);
        }
    }
    out
}

fn describe(attribute: &Attribute) -> String {
    match attribute {
        Attribute::Font(font) => format!("font {}", describe_font(font)),
        Attribute::ForegroundColor(color) => format!("color {color}"),
        Attribute::BackgroundColor(color) => format!("background {color}"),
        Attribute::Link(url) => format!("link {url}"),
        Attribute::Custom { key, value } => format!("custom:{key} {value}"),
    }
}

/// Text followed by one line per attribute range, ordered by start then
/// key, for snapshots.
pub fn render(buffer: &StyledTextBuffer) -> String {
    let mut ranges: Vec<_> = buffer.ranges().iter().collect();
    ranges.sort_by_key(|r| (r.range.start, r.attribute.key()));

    let mut out = format!("{:?}", buffer.text());
    for range in ranges {
        let text = buffer.slice(range.range.clone()).unwrap_or_default();
        let _ = write!(
            out,
            "\n{}..{} {:?} {}",
            range.range.start,
            range.range.end,
            text,
            describe(&range.attribute)
        );
    }
    out
}

/// Check the buffer's range invariants: in bounds, non-empty, sorted by
/// start, and no overlap between ranges of the same key.
pub fn assert_ranges_well_formed(buffer: &StyledTextBuffer) {
    let len = buffer.len_chars();
    let ranges = buffer.ranges();
    for (i, r) in ranges.iter().enumerate() {
        assert!(r.range.start < r.range.end, "empty range {:?}", r.range);
        assert!(r.range.end <= len, "range {:?} past end {len}", r.range);
        if i > 0 {
            assert!(ranges[i - 1].range.start <= r.range.start, "ranges out of order");
        }
        for other in &ranges[i + 1..] {
            if other.attribute.key() == r.attribute.key() {
                assert!(
                    !other.overlaps(&r.range),
                    "{} ranges {:?} and {:?} overlap",
                    r.attribute.key(),
                    r.range,
                    other.range
                );
            }
        }
    }
}
