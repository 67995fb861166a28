use clap::{ArgAction, Parser};
use recipe_annotate::AnnotationConfig;
use std::path::PathBuf;

/// Render a Markdown recipe to annotated HTML
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-annotate", version, about = "Annotate recipe Markdown with quantities, timers and ingredients")]
pub struct Cli {
    /// Markdown file to render (reads stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Ingredient database file (uses the bundled database when not set)
    #[arg(long, env = "RECIPE_INGREDIENTS_DB")]
    pub ingredients: Option<PathBuf>,

    /// Keep US quantities without a metric equivalent
    #[arg(long, env = "RECIPE_NO_METRIC")]
    pub no_metric: bool,

    /// Keep converted values at full precision
    #[arg(long, env = "RECIPE_NO_ROUND")]
    pub no_round: bool,

    /// Relative tolerance for rounding converted values
    #[arg(long, env = "RECIPE_TOLERANCE", default_value_t = recipe_annotate::annotation_config::DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Print the annotations of each list item as JSON instead of HTML
    #[arg(long)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', action = ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    #[must_use]
    pub fn verbosity_delta(&self) -> i16 {
        i16::from(self.verbose) - i16::from(self.quiet)
    }

    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_delta() {
            d if d <= -1 => "error",
            0 => "warn",
            1 => "info,recipe_annotate=info",
            2 => "debug,recipe_annotate=debug",
            _ => "trace,recipe_annotate=trace",
        }
    }

    pub fn annotation_config(&self) -> AnnotationConfig {
        AnnotationConfig {
            convert_to_metric: !self.no_metric,
            round_satisfying: !self.no_round,
            tolerance: self.tolerance,
            ..Default::default()
        }
    }
}
