//! # Quantity Scanner Module
//!
//! Finds "number unit" phrases in recipe text ("2 cups", "1½ tbsp", "350°F"),
//! annotates them with their normalized value and, on request, appends the metric
//! equivalent in a readable unit.
//!
//! ## Pipeline per match
//!
//! 1. Parse the numeric literal (fractions, mixed numbers, Unicode glyphs, decimals)
//! 2. Resolve the unit spelling through the [`UnitCatalog`]
//! 3. For US units with conversion enabled: convert to the metric base unit
//!    (liter/kilogram) or to Celsius, pick the optimal metric unit, round
//! 4. Render the original span plus, when the unit changed, a metric span
//!
//! A match that fails any step is emitted as written.

use crate::annotation_config::AnnotationConfig;
use crate::errors::{AnnotateError, AnnotateResult};
use crate::markup::{overlaps, tag_ranges};
use crate::numeric_literal::{format_number, number_token_pattern, parse_numeric_literal, round_to_places};
use crate::rounding::{round_satisfying, round_satisfying_signed};
use crate::units::{convert, MeasurementKind, MeasurementSystem, UnitCatalog, UnitDefinition};
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, trace};

/// A quantity phrase found in text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantityMatch {
    /// The matched phrase (e.g., "1/2 cup")
    pub matched_text: String,
    /// Key of the unit as written (e.g., "US_CUP")
    pub original_unit: String,
    pub original_value: f64,
    /// Key of the metric unit, present only when conversion changed the unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_value: Option<f64>,
    /// Display label of the converted unit (e.g., "ml")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_display_name: Option<String>,
    /// Byte offset where the phrase starts
    pub start_pos: usize,
    /// Byte offset where the phrase ends
    pub end_pos: usize,
}

impl QuantityMatch {
    pub fn is_converted(&self) -> bool {
        self.converted_unit.is_some()
    }

    /// Render the annotation spans for this match
    pub fn to_html(&self) -> String {
        let original = format!(
            "{}={}",
            self.original_unit,
            format_number(self.original_value)
        );
        let mut html = format!(
            r#"<span class="quantity" title="{original}" data-value="quantity:{original}">{}</span>"#,
            self.matched_text
        );

        if let (Some(unit), Some(value), Some(display)) = (
            &self.converted_unit,
            self.converted_value,
            &self.converted_display_name,
        ) {
            let value = format_number(value);
            let metric = format!("{unit}={value}");
            html.push_str(&format!(
                r#" <span class="quantity-metric" title="{metric}" data-value="quantity:{metric}">({value} {display})</span>"#
            ));
        }

        html
    }
}

/// Build the quantity pattern from the catalog's unit spellings
///
/// Spellings are sorted longest first. A spelling ending in a word character gets
/// a trailing word boundary, so the "g" of "garlic" is never read as grams while
/// "500g" and "350°F" still match.
fn quantity_pattern(catalog: &UnitCatalog) -> String {
    let mut variations = catalog.variations();
    variations.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let alternatives = variations
        .iter()
        .map(|variation| {
            let escaped = regex::escape(variation);
            match variation.chars().last() {
                Some(c) if c.is_alphanumeric() || c == '_' => format!(r"{escaped}\b"),
                _ => escaped,
            }
        })
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r"(?i)(?P<number>{})\s*(?P<unit>{alternatives})",
        number_token_pattern()
    )
}

/// Quantity detector, converter and annotator
#[derive(Debug, Clone)]
pub struct QuantityScanner {
    catalog: UnitCatalog,
    pattern: Regex,
}

impl QuantityScanner {
    /// Create a scanner over the given unit catalog
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_annotate::quantity::QuantityScanner;
    /// use recipe_annotate::units::UnitCatalog;
    ///
    /// let scanner = QuantityScanner::new(UnitCatalog::standard())?;
    /// let html = scanner.annotate("2 cups flour", false, true);
    /// assert_eq!(
    ///     html,
    ///     r#"<span class="quantity" title="US_CUP=2" data-value="quantity:US_CUP=2">2 cups</span> flour"#
    /// );
    /// # Ok::<(), recipe_annotate::AnnotateError>(())
    /// ```
    pub fn new(catalog: UnitCatalog) -> AnnotateResult<Self> {
        let source = quantity_pattern(&catalog);
        debug!("Quantity pattern: {}", source);
        let pattern = Regex::new(&source)?;
        info!(
            "Created QuantityScanner over {} units",
            catalog.units().len()
        );
        Ok(Self { catalog, pattern })
    }

    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Annotate quantities, optionally appending metric equivalents
    pub fn annotate(&self, text: &str, convert_to_metric: bool, round_satisfying: bool) -> String {
        let config = AnnotationConfig {
            convert_to_metric,
            round_satisfying,
            ..Default::default()
        };
        self.annotate_with(text, &config)
    }

    /// Annotate quantities using every option of `config`
    ///
    /// Text inside HTML tags is left untouched.
    pub fn annotate_with(&self, text: &str, config: &AnnotationConfig) -> String {
        let tags = tag_ranges(text);
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let matched = &caps[0];
                if Self::inside_tag(&tags, caps) {
                    trace!("Skipping quantity '{}' inside a tag", matched);
                    return matched.to_string();
                }
                match self.resolve(caps, config) {
                    Ok(quantity) => quantity.to_html(),
                    Err(e) => {
                        debug!("Leaving quantity '{}' unannotated: {}", matched, e);
                        matched.to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Find all quantities outside HTML tags without rewriting the text
    pub fn find_quantities(&self, text: &str, config: &AnnotationConfig) -> Vec<QuantityMatch> {
        let tags = tag_ranges(text);
        self.pattern
            .captures_iter(text)
            .filter(|caps| !Self::inside_tag(&tags, caps))
            .filter_map(|caps| match self.resolve(&caps, config) {
                Ok(quantity) => Some(quantity),
                Err(e) => {
                    debug!("Skipping quantity '{}': {}", &caps[0], e);
                    None
                }
            })
            .collect()
    }

    fn inside_tag(tags: &[(usize, usize)], caps: &Captures) -> bool {
        caps.get(0)
            .map_or(false, |m| overlaps(tags, m.start(), m.end()))
    }

    fn resolve(&self, caps: &Captures, config: &AnnotationConfig) -> AnnotateResult<QuantityMatch> {
        let whole = caps
            .get(0)
            .ok_or_else(|| AnnotateError::InvalidFormat(String::new()))?;
        let number = caps
            .name("number")
            .ok_or_else(|| AnnotateError::InvalidFormat(whole.as_str().to_string()))?
            .as_str();
        let unit_text = caps
            .name("unit")
            .ok_or_else(|| AnnotateError::InvalidFormat(whole.as_str().to_string()))?
            .as_str();

        let value = parse_numeric_literal(number)?;
        let unit = self
            .catalog
            .lookup_variation(unit_text)
            .ok_or_else(|| AnnotateError::InvalidFormat(unit_text.to_string()))?;

        let mut quantity = QuantityMatch {
            matched_text: whole.as_str().to_string(),
            original_unit: unit.key.to_string(),
            original_value: value,
            converted_unit: None,
            converted_value: None,
            converted_display_name: None,
            start_pos: whole.start(),
            end_pos: whole.end(),
        };

        if config.convert_to_metric && !unit.is_metric() {
            let (converted, target) = self.to_metric(value, unit, config)?;
            if target.key != unit.key {
                quantity.converted_unit = Some(target.key.to_string());
                quantity.converted_value = Some(converted);
                quantity.converted_display_name = Some(target.display_name.to_string());
            }
        }

        trace!(
            "Quantity '{}' -> {}={} ({:?}={:?})",
            quantity.matched_text,
            quantity.original_unit,
            quantity.original_value,
            quantity.converted_unit,
            quantity.converted_value
        );
        Ok(quantity)
    }

    /// Convert a US quantity to its metric display form
    fn to_metric(
        &self,
        value: f64,
        unit: &UnitDefinition,
        config: &AnnotationConfig,
    ) -> AnnotateResult<(f64, &UnitDefinition)> {
        let base = self
            .catalog
            .canonical_unit(unit.kind, MeasurementSystem::Metric)
            .ok_or_else(|| AnnotateError::UnsupportedPath {
                from: unit.key.to_string(),
                to: MeasurementSystem::Metric.to_string(),
            })?;
        let (base_value, base_unit) = convert(value, unit, base)?;

        if unit.kind == MeasurementKind::Temperature {
            let rounded = if config.round_satisfying {
                round_satisfying_signed(base_value, config.tolerance)?
            } else {
                round_to_places(base_value, config.temperature_precision)
            };
            return Ok((rounded, base_unit));
        }

        let optimal = self
            .catalog
            .find_optimal_unit(base_value, base_unit, Some(MeasurementSystem::Metric));
        let (converted, target) = if optimal.key != base_unit.key {
            convert(base_value, base_unit, optimal)?
        } else {
            (base_value, base_unit)
        };

        let rounded = if config.round_satisfying {
            round_satisfying(converted, config.tolerance)?
        } else {
            round_to_places(converted, config.volume_mass_precision)
        };
        Ok((rounded, target))
    }
}

impl Default for QuantityScanner {
    fn default() -> Self {
        Self::new(UnitCatalog::standard()).expect("Default quantity pattern should be valid")
    }
}
