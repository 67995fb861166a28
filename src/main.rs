use anyhow::{Context, Result};
use clap::Parser;
use recipe_annotate::{DurationScanner, IngredientMatcher, MarkdownRenderer, QuantityScanner, UnitCatalog};
use std::fs;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::Cli;

fn init_logging(cli: &Cli) {
    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}

fn read_input(cli: &Cli) -> Result<String> {
    match &cli.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe from {}", path.display())),
        _ => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .context("Failed to read recipe from stdin")?;
            Ok(markdown)
        }
    }
}

fn load_ingredients(cli: &Cli) -> Result<IngredientMatcher> {
    match &cli.ingredients {
        Some(path) => {
            let mut matcher = IngredientMatcher::new();
            matcher
                .load_database_file(path)
                .with_context(|| format!("Failed to load ingredient database {}", path.display()))?;
            Ok(matcher)
        }
        None => IngredientMatcher::bundled().context("Bundled ingredient database is invalid"),
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli);

    let config = cli.annotation_config();
    config.validate().context("Invalid annotation options")?;
    debug!("Annotation config: {:?}", config);

    let ingredients = load_ingredients(&cli)?;
    info!("Using {} ingredient rules", ingredients.len());

    let quantity = QuantityScanner::new(UnitCatalog::standard()).context("Failed to build quantity scanner")?;
    let renderer = MarkdownRenderer::new(quantity, DurationScanner::new(), ingredients).with_config(config);

    let markdown = read_input(&cli)?;

    if cli.json {
        let items = renderer.inspect(&markdown);
        let json = serde_json::to_string_pretty(&items).context("Failed to serialize annotations")?;
        println!("{json}");
    } else {
        println!("{}", renderer.render(&markdown));
    }

    Ok(())
}
