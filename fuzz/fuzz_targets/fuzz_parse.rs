//! Fuzz target for the parsing pipeline.
//!
//! Arbitrary text must parse without panicking or erroring, and every
//! attribute range must stay inside the output text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use styledown::Parser;

fuzz_target!(|data: &str| {
    let parser = Parser::new();
    let Ok(doc) = parser.parse(data) else {
        panic!("built-in rules must not fail on any input");
    };

    let len = doc.len_chars();
    for range in doc.ranges() {
        assert!(range.range.start < range.range.end);
        assert!(range.range.end <= len);
    }
});
