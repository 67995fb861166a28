//! # Markdown Renderer Module
//!
//! Renders the Markdown subset used by recipes to HTML and runs the annotation
//! pipeline over list items.
//!
//! ## Supported syntax
//!
//! - `# Title`, `## Section` headings
//! - `> quote` blockquotes
//! - `---` horizontal rules
//! - `- item` / `* item` unordered and `1. step` ordered list items
//! - `**bold**`, `_italic_`, `![alt](src)` inline
//!
//! Blank lines separate blocks. Consecutive list items of the same kind form one
//! list, and runs of other lines become a paragraph with `<br>` line breaks. Lines
//! that start with a block-level HTML tag (`<p>`, `<div>`, `<hr>` and the like) are
//! copied through as they are.
//!
//! Only list items are annotated: quantities first, then durations, then
//! ingredient names. None of the scanners touch text inside HTML tags, so image
//! attributes survive annotation. Input is not HTML-escaped.

use crate::annotation_config::AnnotationConfig;
use crate::duration::{DurationMatch, DurationScanner};
use crate::ingredient_matcher::{IngredientMatch, IngredientMatcher};
use crate::quantity::{QuantityMatch, QuantityScanner};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace, warn};

lazy_static! {
    static ref HR_RE: Regex = Regex::new(r"^---\s*$").expect("Rule pattern should be valid");
    static ref H2_RE: Regex = Regex::new(r"^##\s*(.*)$").expect("H2 pattern should be valid");
    static ref H1_RE: Regex = Regex::new(r"^#\s*(.*)$").expect("H1 pattern should be valid");
    static ref QUOTE_RE: Regex =
        Regex::new(r"^>\s*(.*)$").expect("Blockquote pattern should be valid");
    static ref UNORDERED_RE: Regex =
        Regex::new(r"^[-*]\s+(.*)$").expect("Unordered item pattern should be valid");
    static ref ORDERED_RE: Regex =
        Regex::new(r"^[0-9]+\.\s+(.*)$").expect("Ordered item pattern should be valid");
    static ref HTML_BLOCK_RE: Regex =
        Regex::new(r"^<(?:h[1-6]|ul|ol|li|blockquote|hr|p|img|div|table|pre|figure)\b")
            .expect("Block-level HTML pattern should be valid");
    static ref IMAGE_RE: Regex =
        Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("Image pattern should be valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// One classified source line
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Rule,
    Heading(u8, &'a str),
    Quote(&'a str),
    Item(ListKind, &'a str),
    Html(&'a str),
    Text(&'a str),
}

fn first_group<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn classify(line: &str) -> Line<'_> {
    if HR_RE.is_match(line) {
        Line::Rule
    } else if let Some(text) = first_group(&H2_RE, line) {
        Line::Heading(2, text)
    } else if let Some(text) = first_group(&H1_RE, line) {
        Line::Heading(1, text)
    } else if let Some(text) = first_group(&QUOTE_RE, line) {
        Line::Quote(text)
    } else if let Some(text) = first_group(&UNORDERED_RE, line) {
        Line::Item(ListKind::Unordered, text)
    } else if let Some(text) = first_group(&ORDERED_RE, line) {
        Line::Item(ListKind::Ordered, text)
    } else if HTML_BLOCK_RE.is_match(line) {
        Line::Html(line)
    } else {
        Line::Text(line)
    }
}

/// Apply bold, italic and image markup
pub fn format_inline(text: &str) -> String {
    let html = emphasize(text, "**", "strong");
    let html = emphasize(&html, "_", "em");
    IMAGE_RE
        .replace_all(&html, r#"<img src="${2}" alt="${1}">"#)
        .into_owned()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Wrap `delimiter`-enclosed runs in `tag`
///
/// A delimiter pair only counts when the opening one is not preceded by a word
/// character and the closing one is not followed by one, so `snake_case_name`
/// stays as written. The neighbouring characters are checked, not consumed.
fn emphasize(text: &str, delimiter: &str, tag: &str) -> String {
    let opens_at = |pos: usize| !text[..pos].chars().next_back().map_or(false, is_word_char);
    let closes_at = |pos: usize| !text[pos..].chars().next().map_or(false, is_word_char);

    let mut html = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;
    while let Some(found) = text[search..].find(delimiter) {
        let open = search + found;
        let inner = open + delimiter.len();
        search = open + 1;
        if !opens_at(open) {
            continue;
        }

        // Closest closing delimiter followed by a non-word character
        let mut close_search = inner;
        while let Some(found) = text[close_search..].find(delimiter) {
            let close = close_search + found;
            let end = close + delimiter.len();
            if closes_at(end) {
                html.push_str(&text[copied..open]);
                html.push_str(&format!("<{tag}>{}</{tag}>", &text[inner..close]));
                copied = end;
                search = end;
                break;
            }
            close_search = close + 1;
        }
    }
    html.push_str(&text[copied..]);
    html
}

/// Structured annotations of one list item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAnnotations {
    pub text: String,
    pub quantities: Vec<QuantityMatch>,
    pub durations: Vec<DurationMatch>,
    pub ingredients: Vec<IngredientMatch>,
}

/// Markdown to HTML renderer with the annotation pipeline attached
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    quantity: QuantityScanner,
    duration: DurationScanner,
    ingredients: IngredientMatcher,
    config: AnnotationConfig,
}

impl MarkdownRenderer {
    /// Renderer with metric conversion and rounding enabled
    pub fn new(
        quantity: QuantityScanner,
        duration: DurationScanner,
        ingredients: IngredientMatcher,
    ) -> Self {
        Self {
            quantity,
            duration,
            ingredients,
            config: AnnotationConfig::default(),
        }
    }

    /// Replace the annotation options used by `render` and `annotate_line`
    pub fn with_config(mut self, config: AnnotationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    pub fn ingredients(&self) -> &IngredientMatcher {
        &self.ingredients
    }

    /// Render `markdown` to HTML
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_annotate::duration::DurationScanner;
    /// use recipe_annotate::ingredient_matcher::IngredientMatcher;
    /// use recipe_annotate::markdown::MarkdownRenderer;
    /// use recipe_annotate::quantity::QuantityScanner;
    ///
    /// let renderer = MarkdownRenderer::new(
    ///     QuantityScanner::default(),
    ///     DurationScanner::new(),
    ///     IngredientMatcher::new(),
    /// );
    /// assert_eq!(renderer.render("# Pancakes"), "<h1>Pancakes</h1>");
    /// assert_eq!(renderer.render("Serve warm\nwith jam"), "<p>Serve warm<br>with jam</p>");
    /// ```
    pub fn render(&self, markdown: &str) -> String {
        self.render_with(markdown, &self.config)
    }

    /// Render `markdown` to HTML using `config` for quantities
    pub fn render_with(&self, markdown: &str, config: &AnnotationConfig) -> String {
        if let Err(e) = config.validate() {
            warn!("Rendering with invalid annotation config: {}", e);
        }

        let blocks: Vec<String> = split_blocks(markdown)
            .iter()
            .map(|block| self.render_block(block, config))
            .filter(|html| !html.is_empty())
            .collect();

        debug!("Rendered {} blocks", blocks.len());
        blocks.join("\n\n")
    }

    /// Run the list-item pipeline (quantity, duration, ingredient) on one line
    pub fn annotate_line(&self, text: &str) -> String {
        self.annotate_with(text, &self.config)
    }

    fn annotate_with(&self, text: &str, config: &AnnotationConfig) -> String {
        let html = self.quantity.annotate_with(text, config);
        let html = self.duration.annotate(&html);
        let html = self.ingredients.annotate(&html);
        trace!("Annotated item '{}' -> '{}'", text, html);
        html
    }

    /// Collect structured annotations for every list item in `markdown`
    pub fn inspect(&self, markdown: &str) -> Vec<ItemAnnotations> {
        markdown
            .lines()
            .map(str::trim_end)
            .filter_map(|line| match classify(line) {
                Line::Item(_, text) => Some(ItemAnnotations {
                    text: text.to_string(),
                    quantities: self.quantity.find_quantities(text, &self.config),
                    durations: self.duration.find_durations(text),
                    ingredients: self.ingredients.find_ingredients(text),
                }),
                _ => None,
            })
            .collect()
    }

    fn render_block(&self, lines: &[&str], config: &AnnotationConfig) -> String {
        let mut elements: Vec<String> = Vec::new();
        let mut list: Option<(ListKind, Vec<String>)> = None;
        let mut paragraph: Vec<String> = Vec::new();

        for line in lines {
            let parsed = classify(line);

            if !matches!(parsed, Line::Text(_)) && !paragraph.is_empty() {
                elements.push(format!("<p>{}</p>", paragraph.join("<br>")));
                paragraph.clear();
            }
            let continues_list = matches!(
                (&parsed, &list),
                (Line::Item(kind, _), Some((open, _))) if kind == open
            );
            if !continues_list {
                if let Some((kind, items)) = list.take() {
                    elements.push(close_list(kind, &items));
                }
            }

            match parsed {
                Line::Rule => elements.push("<hr>".to_string()),
                Line::Heading(level, text) => {
                    elements.push(format!("<h{level}>{}</h{level}>", format_inline(text)))
                }
                Line::Quote(text) => elements.push(format!(
                    "<blockquote>{}</blockquote>",
                    format_inline(text)
                )),
                Line::Item(kind, text) => {
                    let item = format!("<li>{}</li>", self.annotate_with(&format_inline(text), config));
                    list.get_or_insert_with(|| (kind, Vec::new())).1.push(item);
                }
                Line::Html(html) => elements.push(html.to_string()),
                Line::Text(text) => paragraph.push(format_inline(text)),
            }
        }

        if let Some((kind, items)) = list {
            elements.push(close_list(kind, &items));
        }
        if !paragraph.is_empty() {
            elements.push(format!("<p>{}</p>", paragraph.join("<br>")));
        }

        elements.join("\n")
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(
            QuantityScanner::default(),
            DurationScanner::new(),
            IngredientMatcher::new(),
        )
    }
}

fn close_list(kind: ListKind, items: &[String]) -> String {
    let tag = kind.tag();
    format!("<{tag}>\n{}\n</{tag}>", items.join("\n"))
}

/// Split into blank-line separated blocks of trimmed-right lines
fn split_blocks(markdown: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in markdown.lines().map(str::trim_end) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
