//! Scanning helpers shared by the built-in rules.

use crate::error::Result;
use crate::text::StyledTextBuffer;
use std::ops::Range;

/// Char ranges of each line, excluding the `\n` terminator and a trailing
/// `\r` (LF, CRLF and a final unterminated line are all handled).
pub(crate) fn line_ranges(chars: &[char]) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    for (idx, &c) in chars.iter().enumerate() {
        if c == '\n' {
            lines.push(trim_cr(chars, start..idx));
            start = idx + 1;
        }
    }
    if start < chars.len() {
        lines.push(trim_cr(chars, start..chars.len()));
    }
    lines
}

fn trim_cr(chars: &[char], line: Range<usize>) -> Range<usize> {
    if line.end > line.start && chars[line.end - 1] == '\r' {
        line.start..line.end - 1
    } else {
        line
    }
}

/// Length of the run of `c` starting at `start`, bounded by `limit`.
pub(crate) fn run_length(chars: &[char], start: usize, limit: usize, c: char) -> usize {
    chars[start..limit].iter().take_while(|&&ch| ch == c).count()
}

/// Number of consecutive backslashes immediately before `idx`, not looking
/// before `floor`.
pub(crate) fn backslashes_before(chars: &[char], idx: usize, floor: usize) -> usize {
    chars[floor..idx]
        .iter()
        .rev()
        .take_while(|&&c| c == '\\')
        .count()
}

/// Apply matches collected left to right, starting from the last one, so
/// the offsets of matches not yet applied stay valid.
pub(crate) fn apply_reversed<M, F>(
    buffer: &mut StyledTextBuffer,
    matches: Vec<M>,
    mut apply: F,
) -> Result<()>
where
    F: FnMut(&mut StyledTextBuffer, M) -> Result<()>,
{
    for m in matches.into_iter().rev() {
        apply(buffer, m)?;
    }
    Ok(())
}

/// Scan and apply until a scan finds nothing, so markup nested in its own
/// kind (`__**a**__`) is consumed in one run. `apply` must delete at least
/// one char per match.
pub(crate) fn apply_until_stable<M, S, F>(
    buffer: &mut StyledTextBuffer,
    mut scan: S,
    mut apply: F,
) -> Result<()>
where
    S: FnMut(&[char]) -> Vec<M>,
    F: FnMut(&mut StyledTextBuffer, M) -> Result<()>,
{
    loop {
        let matches = scan(&buffer.chars());
        if matches.is_empty() {
            return Ok(());
        }
        apply_reversed(buffer, matches, &mut apply)?;
    }
}
