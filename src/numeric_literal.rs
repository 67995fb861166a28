//! # Numeric Literal Module
//!
//! Parses the number notations found in recipe text into floating-point values.
//!
//! ## Supported notations
//!
//! Tried in this order against the trimmed, whitespace-normalized input:
//!
//! 1. Mixed Unicode fraction: `1½`, `2 ¾`
//! 2. Bare Unicode fraction: `½`
//! 3. Mixed ASCII fraction: `1 1/4`
//! 4. Bare ASCII fraction: `2/3`
//! 5. Decimal: `3`, `1.25`
//!
//! The composite token pattern returned by [`number_token_pattern`] recognizes the
//! same notations inside larger text and is embedded by the quantity scanner.

use crate::errors::{AnnotateError, AnnotateResult};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

/// Unicode vulgar-fraction glyphs and their exact values
pub const UNICODE_FRACTIONS: [(char, f64); 18] = [
    ('¼', 0.25),
    ('½', 0.5),
    ('¾', 0.75),
    ('⅐', 1.0 / 7.0),
    ('⅑', 1.0 / 9.0),
    ('⅒', 0.1),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

fn glyph_class() -> String {
    UNICODE_FRACTIONS.iter().map(|(glyph, _)| *glyph).collect()
}

lazy_static! {
    static ref MIXED_UNICODE_RE: Regex =
        Regex::new(&format!(r"^([0-9]+)\s*([{}])$", glyph_class()))
            .expect("Mixed unicode fraction pattern should be valid");
    static ref UNICODE_RE: Regex = Regex::new(&format!(r"^([{}])$", glyph_class()))
        .expect("Unicode fraction pattern should be valid");
    static ref MIXED_FRACTION_RE: Regex = Regex::new(r"^([0-9]+)\s+([0-9]+)/([0-9]+)$")
        .expect("Mixed fraction pattern should be valid");
    static ref FRACTION_RE: Regex =
        Regex::new(r"^([0-9]+)/([0-9]+)$").expect("Fraction pattern should be valid");
    static ref DECIMAL_RE: Regex =
        Regex::new(r"^([0-9]+(?:\.[0-9]+)?)$").expect("Decimal pattern should be valid");
    static ref NUMBER_TOKEN_RE: Regex =
        Regex::new(&number_token_pattern()).expect("Number token pattern should be valid");
}

/// Build the regex source matching any single numeric token
///
/// Longer notations come first so that `1½` is not read as `1` followed by `½`,
/// and `1 1/2` is not read as `1`. The pattern is a non-capturing group and
/// carries no anchors, so it can be embedded in larger expressions.
///
/// # Examples
///
/// ```rust
/// use recipe_annotate::numeric_literal::number_token_pattern;
/// use regex::Regex;
///
/// let re = Regex::new(&format!("^{}$", number_token_pattern())).unwrap();
/// assert!(re.is_match("1 1/2"));
/// assert!(re.is_match("¾"));
/// assert!(!re.is_match("abc"));
/// ```
pub fn number_token_pattern() -> String {
    let glyphs = glyph_class();
    let alternatives = [
        format!(r"[0-9]+\s*[{glyphs}]"),
        format!(r"[{glyphs}]"),
        r"[0-9]+\s+[0-9]+/[0-9]+".to_string(),
        r"[0-9]+/[0-9]+".to_string(),
        r"[0-9]+(?:\.[0-9]+)?".to_string(),
    ];
    format!("(?:{})", alternatives.join("|"))
}

fn glyph_value(glyph: &str) -> AnnotateResult<f64> {
    let mut chars = glyph.chars();
    let value = chars.next().and_then(|c| {
        UNICODE_FRACTIONS
            .iter()
            .find(|(g, _)| *g == c)
            .map(|(_, v)| *v)
    });
    match (value, chars.next()) {
        (Some(v), None) => Ok(v),
        _ => Err(AnnotateError::InvalidFormat(glyph.to_string())),
    }
}

fn parse_integer(digits: &str) -> AnnotateResult<u64> {
    digits
        .parse::<u64>()
        .map_err(|_| AnnotateError::InvalidFormat(digits.to_string()))
}

fn divide(numerator: u64, denominator: u64) -> AnnotateResult<f64> {
    if denominator == 0 {
        return Err(AnnotateError::DivisionByZero);
    }
    Ok(numerator as f64 / denominator as f64)
}

/// Parse a single numeric literal into its value
///
/// # Errors
///
/// * `InvalidFormat` - empty input or no supported notation matches
/// * `DivisionByZero` - an ASCII fraction with a zero denominator
///
/// # Examples
///
/// ```rust
/// use recipe_annotate::numeric_literal::parse_numeric_literal;
///
/// assert_eq!(parse_numeric_literal("1½").unwrap(), 1.5);
/// assert_eq!(parse_numeric_literal("1 1/4").unwrap(), 1.25);
/// assert!(parse_numeric_literal("1/0").is_err());
/// ```
pub fn parse_numeric_literal(text: &str) -> AnnotateResult<f64> {
    let normalized = text.split_whitespace().collect::<Vec<&str>>().join(" ");
    if normalized.is_empty() {
        return Err(AnnotateError::InvalidFormat("empty string".to_string()));
    }

    if let Some(caps) = MIXED_UNICODE_RE.captures(&normalized) {
        let whole = parse_integer(&caps[1])?;
        return Ok(whole as f64 + glyph_value(&caps[2])?);
    }

    if let Some(caps) = UNICODE_RE.captures(&normalized) {
        return glyph_value(&caps[1]);
    }

    if let Some(caps) = MIXED_FRACTION_RE.captures(&normalized) {
        let whole = parse_integer(&caps[1])?;
        let fraction = divide(parse_integer(&caps[2])?, parse_integer(&caps[3])?)?;
        return Ok(whole as f64 + fraction);
    }

    if let Some(caps) = FRACTION_RE.captures(&normalized) {
        return divide(parse_integer(&caps[1])?, parse_integer(&caps[2])?);
    }

    if DECIMAL_RE.is_match(&normalized) {
        return normalized
            .parse::<f64>()
            .map_err(|_| AnnotateError::InvalidFormat(text.to_string()));
    }

    trace!("No numeric notation matched '{}'", text);
    Err(AnnotateError::InvalidFormat(text.to_string()))
}

/// Render a value the way annotations print it: shortest round-trip form,
/// no trailing `.0` on whole numbers.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid printing "-0"
        return "0".to_string();
    }
    format!("{value}")
}

/// Round `value` to `places` decimal places, halves rounded away from zero
///
/// Values too large to scale have no fractional part and come back unchanged.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

/// Replace every numeric literal in `text` with its decimal value
///
/// Tokens that fail to parse (e.g. `1/0`) are left as written.
///
/// # Examples
///
/// ```rust
/// use recipe_annotate::numeric_literal::normalize_numbers;
///
/// assert_eq!(
///     normalize_numbers("Mix 1½ cups with 2 1/4 tsp"),
///     "Mix 1.5 cups with 2.25 tsp"
/// );
/// ```
pub fn normalize_numbers(text: &str) -> String {
    NUMBER_TOKEN_RE
        .replace_all(text, |caps: &regex::Captures| {
            let token = &caps[0];
            match parse_numeric_literal(token) {
                Ok(value) => format_number(value),
                Err(e) => {
                    trace!("Leaving '{}' unchanged: {}", token, e);
                    token.to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_all_glyphs_parse() {
        for (glyph, value) in UNICODE_FRACTIONS {
            assert_close(parse_numeric_literal(&glyph.to_string()).unwrap(), value);
            assert_close(
                parse_numeric_literal(&format!("3{glyph}")).unwrap(),
                3.0 + value,
            );
        }
    }

    #[test]
    fn test_whitespace_is_normalized() {
        assert_close(parse_numeric_literal("  1   1/2 ").unwrap(), 1.5);
        assert_close(parse_numeric_literal("2 ½").unwrap(), 2.5);
        assert_close(parse_numeric_literal("\t7\n").unwrap(), 7.0);
    }

    #[test]
    fn test_zero_denominator() {
        assert!(matches!(
            parse_numeric_literal("1/0"),
            Err(AnnotateError::DivisionByZero)
        ));
        assert!(matches!(
            parse_numeric_literal("2 3/0"),
            Err(AnnotateError::DivisionByZero)
        ));
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        // Arabic-Indic digits are not recipe notation
        assert!(parse_numeric_literal("٣").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1000.0), "1000");
    }

    #[test]
    fn test_round_to_places() {
        assert_close(round_to_places(0.1182950, 2), 0.12);
        assert_close(round_to_places(176.6666, 1), 176.7);
        assert_close(round_to_places(1.25, 1), 1.3);
        assert_eq!(round_to_places(1e307, 2), 1e307);
        assert_eq!(round_to_places(f64::MAX, 15), f64::MAX);
    }

    #[test]
    fn test_normalize_numbers_keeps_bad_tokens() {
        assert_eq!(normalize_numbers("ratio 1/0 here"), "ratio 1/0 here");
        assert_eq!(normalize_numbers("no numbers"), "no numbers");
        assert_eq!(normalize_numbers("⅓ cup"), format!("{} cup", 1.0_f64 / 3.0));
    }
}
