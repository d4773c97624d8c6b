//! Fuzz target for styled buffer edits.
//!
//! Applies arbitrary replace/apply sequences and checks that same-key
//! ranges never overlap and never leave the text.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use styledown::{Attribute, Rgba, StyledTextBuffer};

#[derive(Arbitrary, Debug)]
enum Op {
    Replace { start: u8, len: u8, text: String },
    Color { start: u8, len: u8, shade: u8 },
    Link { start: u8, len: u8 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    ops: Vec<Op>,
}

fn clamp(buffer: &StyledTextBuffer, start: u8, len: u8) -> std::ops::Range<usize> {
    let total = buffer.len_chars();
    let start = usize::from(start).min(total);
    start..(start + usize::from(len)).min(total)
}

fuzz_target!(|input: Input| {
    let mut buffer = StyledTextBuffer::from_text(&input.text);
    for op in input.ops.into_iter().take(64) {
        let result = match op {
            Op::Replace { start, len, text } => {
                let range = clamp(&buffer, start, len);
                buffer.replace_text(range, &text)
            }
            Op::Color { start, len, shade } => {
                let range = clamp(&buffer, start, len);
                let color = Rgba::from_rgb_u8(shade, shade, shade);
                buffer.apply_attribute(range, Attribute::ForegroundColor(color))
            }
            Op::Link { start, len } => {
                let range = clamp(&buffer, start, len);
                buffer.apply_attribute(range, Attribute::Link("https://fuzz".into()))
            }
        };
        assert!(result.is_ok(), "clamped edit failed: {result:?}");

        let len = buffer.len_chars();
        let ranges = buffer.ranges();
        for (i, r) in ranges.iter().enumerate() {
            assert!(r.range.start < r.range.end && r.range.end <= len);
            for other in &ranges[i + 1..] {
                if other.attribute.key() == r.attribute.key() {
                    assert!(!other.overlaps(&r.range));
                }
            }
        }
    }
});
