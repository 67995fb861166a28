//! # Ingredient Matcher Module
//!
//! Highlights ingredient names in recipe lines using a database of match rules,
//! one rule per line:
//!
//! - `red pepper flakes` - literal words, any run of whitespace between them
//! - `almond~` - a trailing `~` also accepts the plural (`almond`, `almonds`)
//! - `gorgonzola [cheese]` - bracketed words are optional (`gorgonzola`, `gorgonzola cheese`)
//! - `[fresh] basil` - optional words may also lead
//!
//! Blank lines and lines starting with `#` are ignored. Matching is
//! case-insensitive and whole-word. The database is kept ordered by rule length,
//! longest first. Where matches overlap, the longest matched text is kept.

use crate::errors::{AnnotateError, AnnotateResult};
use crate::markup::overlaps;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace};

/// Database shipped with the crate
const BUNDLED_DATABASE: &str = include_str!("../data/ingredients.txt");

lazy_static! {
    // HTML tags and ingredient spans already present in a line
    static ref PROTECTED_RE: Regex =
        Regex::new(r#"(?s)<span class="ingredient">.*?</span>|<[^>]*>"#)
            .expect("Protected region pattern should be valid");
}

/// A compiled database rule
#[derive(Debug, Clone)]
pub struct IngredientPattern {
    source: String,
    regex: Regex,
}

impl IngredientPattern {
    /// Compile one database line into a match rule
    ///
    /// # Errors
    ///
    /// `InvalidPattern` for unbalanced or nested brackets, an empty optional
    /// group, a lone `~`, or a rule with no required word.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_annotate::ingredient_matcher::IngredientPattern;
    ///
    /// let pattern = IngredientPattern::compile("gorgonzola [cheese]")?;
    /// assert!(pattern.is_match("I like gorgonzola cheese"));
    /// assert!(pattern.is_match("I like Gorgonzola"));
    /// assert!(!pattern.is_match("I like gorgonzolas"));
    /// # Ok::<(), recipe_annotate::AnnotateError>(())
    /// ```
    pub fn compile(source: &str) -> AnnotateResult<Self> {
        let source = source.trim();
        let body = pattern_body(source)?;
        let regex = Regex::new(&format!(r"(?i)\b(?:{body})\b"))?;
        debug!("Compiled ingredient rule '{}' as {}", source, regex.as_str());
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The database line this rule was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

enum Segment {
    Required(String),
    Optional(Vec<String>),
}

fn invalid(pattern: &str, reason: &str) -> AnnotateError {
    AnnotateError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}

/// Regex source for one word; `word~` also accepts a trailing "s"
fn word_regex(pattern: &str, word: &str) -> AnnotateResult<String> {
    match word.strip_suffix('~') {
        Some("") => Err(invalid(pattern, "'~' must follow a word")),
        Some(stem) => Ok(format!("{}s?", regex::escape(stem))),
        None => Ok(regex::escape(word)),
    }
}

fn split_segments(pattern: &str) -> AnnotateResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = pattern;

    while !rest.is_empty() {
        match rest.find(['[', ']']) {
            Some(index) if rest[index..].starts_with(']') => {
                return Err(invalid(pattern, "unmatched ']'"));
            }
            Some(open) => {
                segments.extend(
                    rest[..open]
                        .split_whitespace()
                        .map(|word| Segment::Required(word.to_string())),
                );
                let inner = &rest[open + 1..];
                let close = inner
                    .find(']')
                    .ok_or_else(|| invalid(pattern, "unmatched '['"))?;
                let group = &inner[..close];
                if group.contains('[') {
                    return Err(invalid(pattern, "nested optional groups"));
                }
                let words: Vec<String> = group.split_whitespace().map(str::to_string).collect();
                if words.is_empty() {
                    return Err(invalid(pattern, "empty optional group"));
                }
                segments.push(Segment::Optional(words));
                rest = &inner[close + 1..];
            }
            None => {
                segments.extend(
                    rest.split_whitespace()
                        .map(|word| Segment::Required(word.to_string())),
                );
                rest = "";
            }
        }
    }

    Ok(segments)
}

/// Translate a rule into regex source, without anchors or flags
fn pattern_body(pattern: &str) -> AnnotateResult<String> {
    let segments = split_segments(pattern)?;
    if !segments.iter().any(|s| matches!(s, Segment::Required(_))) {
        return Err(invalid(pattern, "no required word"));
    }

    let mut body = String::new();
    let mut seen_required = false;
    for segment in &segments {
        match segment {
            Segment::Required(word) => {
                if seen_required {
                    body.push_str(r"\s+");
                }
                body.push_str(&word_regex(pattern, word)?);
                seen_required = true;
            }
            Segment::Optional(words) => {
                let inner = words
                    .iter()
                    .map(|word| word_regex(pattern, word))
                    .collect::<AnnotateResult<Vec<_>>>()?
                    .join(r"\s+");
                if seen_required {
                    body.push_str(&format!(r"(?:\s+{inner})?"));
                } else {
                    body.push_str(&format!(r"(?:{inner}\s+)?"));
                }
            }
        }
    }

    Ok(body)
}

/// An ingredient name found in a line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientMatch {
    pub matched_text: String,
    /// Database line that produced the match
    pub rule: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

/// Ingredient highlighter over a loaded rule database
#[derive(Debug, Clone, Default)]
pub struct IngredientMatcher {
    patterns: Vec<IngredientPattern>,
}

impl IngredientMatcher {
    /// Matcher with an empty database; it annotates nothing until loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher over a newline-separated database
    pub fn from_text(text: &str) -> AnnotateResult<Self> {
        let mut matcher = Self::new();
        matcher.load_database(text.lines())?;
        Ok(matcher)
    }

    /// Matcher over the database shipped in `data/ingredients.txt`
    pub fn bundled() -> AnnotateResult<Self> {
        Self::from_text(BUNDLED_DATABASE)
    }

    /// Replace the database with `lines`
    ///
    /// Nothing is replaced if any line fails to compile.
    pub fn load_database<I, S>(&mut self, lines: I) -> AnnotateResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        rules.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let patterns = rules
            .iter()
            .map(|rule| IngredientPattern::compile(rule))
            .collect::<AnnotateResult<Vec<_>>>()?;

        info!("Loaded ingredient database with {} rules", patterns.len());
        self.patterns = patterns;
        Ok(())
    }

    /// Replace the database with the contents of a file
    pub fn load_database_file<P: AsRef<Path>>(&mut self, path: P) -> AnnotateResult<()> {
        let path = path.as_ref();
        debug!("Reading ingredient database from {}", path.display());
        let text = fs::read_to_string(path)?;
        self.load_database(text.lines())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Rules in match priority order
    pub fn patterns(&self) -> &[IngredientPattern] {
        &self.patterns
    }

    /// Find every ingredient name in `line`, ordered by position
    ///
    /// Text inside HTML tags and inside existing ingredient spans is skipped.
    /// Overlapping matches are resolved in favour of the longest matched text,
    /// then the rule that comes first in the database.
    pub fn find_ingredients(&self, line: &str) -> Vec<IngredientMatch> {
        let protected: Vec<(usize, usize)> = PROTECTED_RE
            .find_iter(line)
            .map(|m| (m.start(), m.end()))
            .collect();

        let mut candidates: Vec<(usize, IngredientMatch)> = Vec::new();
        for (rank, pattern) in self.patterns.iter().enumerate() {
            for m in pattern.regex.find_iter(line) {
                if m.start() == m.end() || overlaps(&protected, m.start(), m.end()) {
                    continue;
                }
                candidates.push((
                    rank,
                    IngredientMatch {
                        matched_text: m.as_str().to_string(),
                        rule: pattern.source.clone(),
                        start_pos: m.start(),
                        end_pos: m.end(),
                    },
                ));
            }
        }
        candidates.sort_by(|(rank_a, a), (rank_b, b)| {
            let len_a = a.end_pos - a.start_pos;
            let len_b = b.end_pos - b.start_pos;
            len_b
                .cmp(&len_a)
                .then(rank_a.cmp(rank_b))
                .then(a.start_pos.cmp(&b.start_pos))
        });

        let mut claimed: Vec<IngredientMatch> = Vec::new();
        for (_, candidate) in candidates {
            if claimed
                .iter()
                .any(|c| candidate.start_pos < c.end_pos && c.start_pos < candidate.end_pos)
            {
                trace!("'{}' already covered by a longer match", candidate.matched_text);
                continue;
            }
            claimed.push(candidate);
        }

        claimed.sort_by_key(|c| c.start_pos);
        claimed
    }

    /// Wrap every ingredient name in `<span class="ingredient">`
    ///
    /// Annotating an already annotated line returns it unchanged.
    pub fn annotate(&self, line: &str) -> String {
        let matches = self.find_ingredients(line);
        if matches.is_empty() {
            return line.to_string();
        }

        let mut html = String::with_capacity(line.len() + matches.len() * 32);
        let mut cursor = 0;
        for m in &matches {
            html.push_str(&line[cursor..m.start_pos]);
            html.push_str(r#"<span class="ingredient">"#);
            html.push_str(&m.matched_text);
            html.push_str("</span>");
            cursor = m.end_pos;
        }
        html.push_str(&line[cursor..]);
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(pattern: &str) -> String {
        pattern_body(pattern).unwrap()
    }

    #[test]
    fn test_pattern_translation() {
        assert_eq!(body("almond~"), "almonds?");
        assert_eq!(body("red pepper flakes"), r"red\s+pepper\s+flakes");
        assert_eq!(body("gorgonzola [cheese]"), r"gorgonzola(?:\s+cheese)?");
        assert_eq!(body("[fresh] basil"), r"(?:fresh\s+)?basil");
        assert_eq!(body("olive oil [extra virgin]"), r"olive\s+oil(?:\s+extra\s+virgin)?");
    }

    #[test]
    fn test_literal_characters_are_escaped() {
        assert!(IngredientPattern::compile("half-and-half")
            .unwrap()
            .is_match("a splash of half-and-half"));
        let pattern = IngredientPattern::compile("st. germain").unwrap();
        assert!(!pattern.is_match("stX germain"));
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in ["[cheese]", "gorgonzola [cheese", "gorgonzola cheese]", "a []", "~", "a [[b]]"] {
            assert!(
                matches!(
                    IngredientPattern::compile(bad),
                    Err(AnnotateError::InvalidPattern { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_failed_load_keeps_previous_database() {
        let mut matcher = IngredientMatcher::from_text("basil").unwrap();
        assert!(matcher.load_database(["thyme", "[oops"]).is_err());
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.patterns()[0].source(), "basil");
    }

    #[test]
    fn test_tags_are_not_searched() {
        let matcher = IngredientMatcher::from_text("cup\nquantity").unwrap();
        let line = r#"<span class="quantity" title="US_CUP=1">1 cup</span> of quantity"#;
        let found = matcher.find_ingredients(line);
        let names: Vec<&str> = found.iter().map(|m| m.matched_text.as_str()).collect();
        assert_eq!(names, vec!["cup", "quantity"]);
        assert!(found[1].start_pos > line.find("</span>").unwrap());
    }
}
