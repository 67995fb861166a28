//! # Unit Catalog Module
//!
//! Static table of the measurement units recognized in recipe text, together with
//! conversion between them and "optimal unit" selection for display.
//!
//! ## Core Concepts
//!
//! - **Measurement system**: US customary or metric
//! - **Measurement kind**: volume, mass or temperature; conversion never crosses kinds
//! - **Base unit**: liters for volume, kilograms for mass. Every volume/mass unit
//!   carries its factor to the base unit; temperature uses fixed F/C formulas
//!
//! ## Usage
//!
//! ```rust
//! use recipe_annotate::units::{convert, MeasurementSystem, UnitCatalog};
//!
//! let catalog = UnitCatalog::standard();
//! let cup = catalog.find_by_key("US_CUP").unwrap();
//! let liter = catalog.find_by_key("METRIC_L").unwrap();
//!
//! let (liters, _) = convert(2.0, cup, liter).unwrap();
//! let best = catalog.find_optimal_unit(liters, liter, Some(MeasurementSystem::Metric));
//! assert_eq!(best.key, "METRIC_ML");
//! ```

use crate::errors::{AnnotateError, AnnotateResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// Measurement system a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementSystem {
    /// US customary units (cups, ounces, Fahrenheit)
    Us,
    /// Metric units (liters, grams, Celsius)
    Metric,
}

/// Physical quantity measured by a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementKind {
    Volume,
    Mass,
    Temperature,
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementSystem::Us => write!(f, "US"),
            MeasurementSystem::Metric => write!(f, "METRIC"),
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementKind::Volume => write!(f, "VOLUME"),
            MeasurementKind::Mass => write!(f, "MASS"),
            MeasurementKind::Temperature => write!(f, "TEMPERATURE"),
        }
    }
}

/// One recognized unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefinition {
    /// Unique identifier (e.g. "US_CUP", "METRIC_L", "F")
    pub key: &'static str,
    /// Spellings matched during parsing, case-insensitively
    pub variations: &'static [&'static str],
    /// Label used when rendering converted values
    pub display_name: &'static str,
    pub system: MeasurementSystem,
    pub kind: MeasurementKind,
    /// Liters in one unit (volume only)
    pub liter_volume_factor: Option<f64>,
    /// Kilograms in one unit (mass only)
    pub kilogram_mass_factor: Option<f64>,
}

impl UnitDefinition {
    /// Factor to the base unit of this unit's kind, if it has one
    pub fn base_factor(&self) -> Option<f64> {
        match self.kind {
            MeasurementKind::Volume => self.liter_volume_factor,
            MeasurementKind::Mass => self.kilogram_mass_factor,
            MeasurementKind::Temperature => None,
        }
    }

    pub fn is_metric(&self) -> bool {
        self.system == MeasurementSystem::Metric
    }
}

const fn volume(
    key: &'static str,
    variations: &'static [&'static str],
    display_name: &'static str,
    system: MeasurementSystem,
    liters: f64,
) -> UnitDefinition {
    UnitDefinition {
        key,
        variations,
        display_name,
        system,
        kind: MeasurementKind::Volume,
        liter_volume_factor: Some(liters),
        kilogram_mass_factor: None,
    }
}

const fn mass(
    key: &'static str,
    variations: &'static [&'static str],
    display_name: &'static str,
    system: MeasurementSystem,
    kilograms: f64,
) -> UnitDefinition {
    UnitDefinition {
        key,
        variations,
        display_name,
        system,
        kind: MeasurementKind::Mass,
        liter_volume_factor: None,
        kilogram_mass_factor: Some(kilograms),
    }
}

const fn temperature(
    key: &'static str,
    variations: &'static [&'static str],
    display_name: &'static str,
    system: MeasurementSystem,
) -> UnitDefinition {
    UnitDefinition {
        key,
        variations,
        display_name,
        system,
        kind: MeasurementKind::Temperature,
        liter_volume_factor: None,
        kilogram_mass_factor: None,
    }
}

use MeasurementSystem::{Metric, Us};

/// Every unit the scanners recognize
pub static UNIT_DEFINITIONS: [UnitDefinition; 15] = [
    volume("TSP", &["teaspoons", "teaspoon", "tsp"], "teaspoons", Us, 0.005),
    volume("TBSP", &["tablespoons", "tablespoon", "tbsp"], "tablespoons", Us, 0.015),
    volume(
        "US_FLOZ",
        &["fl oz", "fl. oz.", "fluid ounces", "fluid ounce"],
        "fl oz",
        Us,
        0.02957,
    ),
    volume("US_CUP", &["cup", "cups"], "cup", Us, 0.23659),
    volume("US_PINT", &["pt", "pint", "pints"], "pt", Us, 0.47318),
    volume("US_QT", &["qt", "quart", "quarts"], "qt", Us, 0.94635),
    volume("US_GAL", &["gal", "gal.", "gallon", "gallons"], "gal", Us, 3.78541),
    mass("US_OZ", &["oz", "ounce", "ounces"], "oz", Us, 0.02835),
    mass("US_LB", &["lb", "lbs", "pound", "pounds"], "lb", Us, 0.45359),
    volume("METRIC_ML", &["ml", "milliliter", "milliliters"], "ml", Metric, 0.001),
    volume("METRIC_L", &["l", "liter", "liters"], "l", Metric, 1.0),
    mass("METRIC_G", &["g", "gram", "grams"], "g", Metric, 0.001),
    mass("METRIC_KG", &["kg", "kilogram", "kilograms"], "kg", Metric, 1.0),
    temperature("F", &["F", "°F", "Fahrenheit", "degrees Fahrenheit"], "°F", Us),
    temperature("C", &["C", "°C", "Celsius", "degrees Celsius"], "°C", Metric),
];

/// Units that recipes keep as written whatever the target system
const KEPT_UNIT_KEYS: [&str; 2] = ["TSP", "TBSP"];

/// Lookup table over the unit definitions
///
/// Built once and handed to the scanners that need it.
#[derive(Debug, Clone)]
pub struct UnitCatalog {
    units: Vec<UnitDefinition>,
    by_variation: HashMap<String, usize>,
}

impl UnitCatalog {
    /// Catalog over the built-in unit table
    pub fn standard() -> Self {
        Self::from_definitions(UNIT_DEFINITIONS.to_vec())
    }

    /// Catalog over an arbitrary set of definitions
    pub fn from_definitions(units: Vec<UnitDefinition>) -> Self {
        let mut by_variation = HashMap::new();
        for (index, unit) in units.iter().enumerate() {
            for variation in unit.variations {
                by_variation.insert(variation.to_lowercase(), index);
            }
        }
        debug!(
            "Built unit catalog with {} units and {} spellings",
            units.len(),
            by_variation.len()
        );
        Self {
            units,
            by_variation,
        }
    }

    pub fn units(&self) -> &[UnitDefinition] {
        &self.units
    }

    /// All unit spellings, in table order
    pub fn variations(&self) -> Vec<&'static str> {
        self.units
            .iter()
            .flat_map(|unit| unit.variations.iter().copied())
            .collect()
    }

    pub fn find_by_key(&self, key: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|unit| unit.key == key)
    }

    /// Resolve a spelling found in text, case-insensitively
    pub fn lookup_variation(&self, text: &str) -> Option<&UnitDefinition> {
        self.by_variation
            .get(&text.to_lowercase())
            .map(|&index| &self.units[index])
    }

    /// Liter/kilogram for metric volume/mass, Celsius/Fahrenheit for temperature
    pub fn canonical_unit(
        &self,
        kind: MeasurementKind,
        system: MeasurementSystem,
    ) -> Option<&UnitDefinition> {
        let key = match (kind, system) {
            (MeasurementKind::Temperature, Metric) => "C",
            (MeasurementKind::Temperature, Us) => "F",
            (MeasurementKind::Volume, Metric) => "METRIC_L",
            (MeasurementKind::Mass, Metric) => "METRIC_KG",
            _ => return None,
        };
        self.find_by_key(key)
    }

    /// Pick the unit that renders `value` (given in `current`) most readably
    ///
    /// - Teaspoons and tablespoons are always kept.
    /// - Temperature maps to the standard scale of `target_system`, or stays
    ///   unchanged when no system is requested.
    /// - Volume/mass picks the largest unit of the target system (same kind) in
    ///   which the value is at least 1, or the smallest unit if none reaches 1.
    pub fn find_optimal_unit<'a>(
        &'a self,
        value: f64,
        current: &'a UnitDefinition,
        target_system: Option<MeasurementSystem>,
    ) -> &'a UnitDefinition {
        if KEPT_UNIT_KEYS.contains(&current.key) {
            trace!("Keeping {} as written", current.key);
            return current;
        }

        if current.kind == MeasurementKind::Temperature {
            return match target_system {
                Some(system) => self
                    .canonical_unit(MeasurementKind::Temperature, system)
                    .unwrap_or(current),
                None => current,
            };
        }

        let Some(current_factor) = current.base_factor() else {
            return current;
        };
        let system = target_system.unwrap_or(current.system);
        let base_value = value * current_factor;

        let mut candidates: Vec<(&UnitDefinition, f64)> = self
            .units
            .iter()
            .filter(|unit| unit.system == system && unit.kind == current.kind)
            .filter_map(|unit| unit.base_factor().map(|factor| (unit, factor)))
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let Some(&(smallest, _)) = candidates.first() else {
            return current;
        };

        let mut optimal = None;
        for (unit, factor) in &candidates {
            if base_value / factor >= 1.0 {
                optimal = Some(*unit);
            } else {
                break;
            }
        }

        let chosen = optimal.unwrap_or(smallest);
        trace!(
            "Optimal unit for {} {} in {}: {}",
            value,
            current.key,
            system,
            chosen.key
        );
        chosen
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Convert `value` from `source` to `target`
///
/// Volume and mass go through the base unit; temperature uses
/// `C = (F - 32) * 5/9` and `F = C * 9/5 + 32`.
///
/// # Errors
///
/// * `IncompatibleUnits` - the units measure different kinds
/// * `UnsupportedPath` - no formula links the two units
pub fn convert<'a>(
    value: f64,
    source: &UnitDefinition,
    target: &'a UnitDefinition,
) -> AnnotateResult<(f64, &'a UnitDefinition)> {
    if source.kind != target.kind {
        return Err(AnnotateError::IncompatibleUnits {
            from: source.key.to_string(),
            to: target.key.to_string(),
        });
    }

    let converted = match source.kind {
        MeasurementKind::Temperature => match (source.key, target.key) {
            (from, to) if from == to => value,
            ("F", "C") => (value - 32.0) * 5.0 / 9.0,
            ("C", "F") => value * 9.0 / 5.0 + 32.0,
            _ => {
                return Err(AnnotateError::UnsupportedPath {
                    from: source.key.to_string(),
                    to: target.key.to_string(),
                })
            }
        },
        MeasurementKind::Volume | MeasurementKind::Mass => {
            match (source.base_factor(), target.base_factor()) {
                (Some(from), Some(to)) => value * from / to,
                _ => {
                    return Err(AnnotateError::UnsupportedPath {
                        from: source.key.to_string(),
                        to: target.key.to_string(),
                    })
                }
            }
        }
    };

    Ok((converted, target))
}
