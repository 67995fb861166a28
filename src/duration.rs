//! # Duration Scanner Module
//!
//! Finds duration phrases ("5 minutes", "35-40 minutes", "1 to 2 hours") in recipe
//! text and annotates them with their length in seconds, for countdown timers.
//!
//! Amounts accept the same numeric literals as quantities ("1 1/2 hours", "½ hour").
//! Ranges use their lower bound: a timer started from "35-40 minutes" should ring
//! at the earliest moment the dish may be ready.

use crate::markup::{overlaps, tag_ranges};
use crate::numeric_literal::{format_number, number_token_pattern, parse_numeric_literal};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, trace};

/// A time unit and its spellings
#[derive(Debug, Clone, PartialEq)]
pub struct DurationUnit {
    pub name: &'static str,
    pub variations: &'static [&'static str],
    pub seconds_multiplier: f64,
}

/// Time units recognized after a number
pub static DURATION_UNITS: [DurationUnit; 3] = [
    DurationUnit {
        name: "SECONDS",
        variations: &["seconds", "second", "sec", "secs"],
        seconds_multiplier: 1.0,
    },
    DurationUnit {
        name: "MINUTES",
        variations: &["minutes", "minute", "min", "mins"],
        seconds_multiplier: 60.0,
    },
    DurationUnit {
        name: "HOURS",
        variations: &["hours", "hour", "hr", "hrs"],
        seconds_multiplier: 3600.0,
    },
];

fn duration_pattern() -> String {
    let mut units: Vec<&str> = DURATION_UNITS
        .iter()
        .flat_map(|unit| unit.variations.iter().copied())
        .collect();
    // Longest first so "hours" is not cut short by "hour" or "hr"
    units.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternatives = units
        .iter()
        .map(|unit| regex::escape(unit))
        .collect::<Vec<_>>()
        .join("|");

    let number = number_token_pattern();
    format!(
        r"(?i)(?P<amount>(?P<lower>{number})(?:\s*(?:-|–|to)\s*{number})?)\s+(?P<unit>{alternatives})\b"
    )
}

// Lazy static regex for the duration pattern to avoid recompilation
lazy_static! {
    static ref DURATION_REGEX: Regex =
        Regex::new(&duration_pattern()).expect("Duration pattern should be valid");
}

/// A duration phrase found in text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationMatch {
    /// The matched phrase (e.g., "35-40 minutes")
    pub matched_text: String,
    /// Seconds, using the lower bound of a range
    pub total_seconds: f64,
    /// Byte offset where the phrase starts
    pub start_pos: usize,
    /// Byte offset where the phrase ends
    pub end_pos: usize,
}

/// Duration detector and annotator
#[derive(Debug, Clone)]
pub struct DurationScanner {
    pattern: Regex,
}

impl DurationScanner {
    /// Create a scanner over the standard second/minute/hour units
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_annotate::duration::DurationScanner;
    ///
    /// let scanner = DurationScanner::new();
    /// assert_eq!(
    ///     scanner.annotate("Cook for 5 minutes"),
    ///     r#"Cook for <span class="duration" title="SEC=300" data-value="duration:SEC=300">5 minutes</span>"#
    /// );
    /// ```
    pub fn new() -> Self {
        debug!("Creating DurationScanner with pattern {}", DURATION_REGEX.as_str());
        Self {
            pattern: DURATION_REGEX.clone(),
        }
    }

    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Wrap every duration phrase outside HTML tags in a `duration` span carrying its seconds
    pub fn annotate(&self, text: &str) -> String {
        let tags = tag_ranges(text);
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                if Self::inside_tag(&tags, caps) {
                    trace!("Skipping duration '{}' inside a tag", matched);
                    return matched.to_string();
                }
                match Self::seconds_for(caps) {
                    Some(seconds) => {
                        trace!("Duration '{}' = {} s", matched, seconds);
                        render_duration(matched, seconds)
                    }
                    None => {
                        debug!("Leaving duration '{}' unannotated", matched);
                        matched.to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Find all duration phrases outside HTML tags without rewriting the text
    pub fn find_durations(&self, text: &str) -> Vec<DurationMatch> {
        let tags = tag_ranges(text);
        self.pattern
            .captures_iter(text)
            .filter(|caps| !Self::inside_tag(&tags, caps))
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let total_seconds = Self::seconds_for(&caps)?;
                Some(DurationMatch {
                    matched_text: whole.as_str().to_string(),
                    total_seconds,
                    start_pos: whole.start(),
                    end_pos: whole.end(),
                })
            })
            .collect()
    }

    fn inside_tag(tags: &[(usize, usize)], caps: &Captures) -> bool {
        caps.get(0)
            .map_or(false, |m| overlaps(tags, m.start(), m.end()))
    }

    fn seconds_for(caps: &Captures) -> Option<f64> {
        let unit = caps.name("unit")?.as_str().to_lowercase();
        let multiplier = DURATION_UNITS
            .iter()
            .find(|u| u.variations.iter().any(|v| *v == unit))?
            .seconds_multiplier;
        // Ranges count from their lower bound
        let lower_bound = parse_numeric_literal(caps.name("lower")?.as_str()).ok()?;
        Some(lower_bound * multiplier)
    }
}

impl Default for DurationScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn render_duration(matched: &str, seconds: f64) -> String {
    let value = format_number(seconds);
    format!(
        r#"<span class="duration" title="SEC={value}" data-value="duration:SEC={value}">{matched}</span>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_bound_of_amount() {
        let scanner = DurationScanner::new();
        let seconds = |text: &str| scanner.find_durations(text)[0].total_seconds;
        assert_eq!(seconds("35-40 minutes"), 2100.0);
        assert_eq!(seconds("10 to 12 seconds"), 10.0);
        assert_eq!(seconds("2–3 hours"), 7200.0);
        assert_eq!(seconds("1 1/2 hours"), 5400.0);
        assert_eq!(seconds("½ hour"), 1800.0);
        assert_eq!(seconds("1½-2 hours"), 5400.0);
    }

    #[test]
    fn test_units_sorted_longest_first() {
        let scanner = DurationScanner::new();
        let pattern = scanner.pattern_str();
        let minutes = pattern.find("minutes").unwrap();
        let min = pattern.find("|min|").unwrap();
        assert!(minutes < min);
    }

    #[test]
    fn test_abbreviations() {
        let scanner = DurationScanner::new();
        let found = scanner.find_durations("rest 10 mins, then 2 hrs, then 30 secs");
        let seconds: Vec<f64> = found.iter().map(|d| d.total_seconds).collect();
        assert_eq!(seconds, vec![600.0, 7200.0, 30.0]);
    }

    #[test]
    fn test_word_boundary_after_unit() {
        let scanner = DurationScanner::new();
        // "minutely" is not a unit
        assert!(scanner.find_durations("check 5 minutely").is_empty());
        assert_eq!(scanner.annotate("5 minutely"), "5 minutely");
    }
}
