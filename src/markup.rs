//! Positions of HTML tags in partially annotated text.
//!
//! Every scanner runs over text that may already hold `<span>` or `<img>` tags, and
//! none of them may rewrite anything between `<` and `>`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").expect("Tag pattern should be valid");
}

/// Byte ranges of every HTML tag in `text`
pub(crate) fn tag_ranges(text: &str) -> Vec<(usize, usize)> {
    TAG_RE.find_iter(text).map(|m| (m.start(), m.end())).collect()
}

/// Whether `start..end` shares at least one byte with any of `ranges`
pub(crate) fn overlaps(ranges: &[(usize, usize)], start: usize, end: usize) -> bool {
    ranges.iter().any(|&(s, e)| start < e && s < end)
}
