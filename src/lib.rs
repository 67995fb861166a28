//! # Recipe Annotate
//!
//! Turns recipe Markdown into HTML whose list items carry machine-readable
//! annotations: quantities with their unit and value (plus a metric equivalent),
//! durations in seconds for countdown timers, and highlighted ingredient names.
//!
//! ```rust
//! use recipe_annotate::{DurationScanner, IngredientMatcher, MarkdownRenderer, QuantityScanner};
//!
//! let renderer = MarkdownRenderer::new(
//!     QuantityScanner::default(),
//!     DurationScanner::new(),
//!     IngredientMatcher::from_text("milk")?,
//! );
//! let html = renderer.render("- 1/2 cup milk");
//! assert!(html.contains(r#"title="US_CUP=0.5""#));
//! assert!(html.contains(r#"<span class="ingredient">milk</span>"#));
//! # Ok::<(), recipe_annotate::AnnotateError>(())
//! ```

pub mod annotation_config;
pub mod duration;
pub mod errors;
pub mod ingredient_matcher;
pub mod markdown;
mod markup;
pub mod numeric_literal;
pub mod quantity;
pub mod rounding;
pub mod units;

pub use annotation_config::AnnotationConfig;
pub use duration::{DurationMatch, DurationScanner};
pub use errors::{AnnotateError, AnnotateResult};
pub use ingredient_matcher::{IngredientMatch, IngredientMatcher, IngredientPattern};
pub use markdown::{ItemAnnotations, MarkdownRenderer};
pub use numeric_literal::{normalize_numbers, parse_numeric_literal};
pub use quantity::{QuantityMatch, QuantityScanner};
pub use rounding::round_satisfying;
pub use units::{MeasurementKind, MeasurementSystem, UnitCatalog, UnitDefinition};
