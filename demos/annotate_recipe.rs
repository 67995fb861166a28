//! # Annotate Recipe Example
//!
//! Renders a small recipe with the full annotation pipeline and prints the HTML,
//! then lists the structured matches found in each list item.

use recipe_annotate::{
    normalize_numbers, AnnotationConfig, DurationScanner, IngredientMatcher, MarkdownRenderer,
    QuantityScanner, UnitCatalog,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🍳 Recipe Annotation Example");
    println!("============================\n");

    let recipe = r#"# Chocolate Chip Cookies

_Makes about 24 cookies._

## Ingredients
- 2 1/4 cups all-purpose flour
- 1 tsp baking soda
- 1 cup unsalted butter, softened
- ¾ cup brown sugar
- 2 large eggs
- 2 cups chocolate chips

## Instructions
1. Preheat the oven to 375°F.
2. Cream the butter and sugar for 2-3 minutes.
3. Bake for 9 to 11 minutes.

---
> Store in an airtight container."#;

    // Example 1: Metric conversion with satisfying rounding
    println!("📖 Example 1: Rendered HTML");
    println!("---------------------------");

    let renderer = MarkdownRenderer::new(
        QuantityScanner::new(UnitCatalog::standard())?,
        DurationScanner::new(),
        IngredientMatcher::bundled()?,
    );
    println!("{}\n", renderer.render(recipe));

    // Example 2: Original units only
    println!("📏 Example 2: Without Metric Conversion");
    println!("---------------------------------------");

    let metric = renderer.annotate_line("Whisk 1½ cups milk for 30 seconds");
    let plain = renderer
        .clone()
        .with_config(AnnotationConfig::plain())
        .annotate_line("Whisk 1½ cups milk for 30 seconds");
    println!("With metric:    {plain}");
    println!("Without metric: {metric}\n");

    // Example 3: Structured matches
    println!("🔍 Example 3: Structured Matches");
    println!("--------------------------------");

    for (i, item) in renderer.inspect(recipe).iter().enumerate() {
        println!("  {}. {}", i + 1, item.text);
        for quantity in &item.quantities {
            match (&quantity.converted_unit, quantity.converted_value) {
                (Some(unit), Some(value)) => println!(
                    "     quantity: {}={} → {}={}",
                    quantity.original_unit, quantity.original_value, unit, value
                ),
                _ => println!(
                    "     quantity: {}={}",
                    quantity.original_unit, quantity.original_value
                ),
            }
        }
        for duration in &item.durations {
            println!("     timer:    {} s", duration.total_seconds);
        }
        for ingredient in &item.ingredients {
            println!("     ingredient: {}", ingredient.matched_text);
        }
    }

    println!("\n🔢 Normalized numbers: {}", normalize_numbers("2 1/4 cups, ¾ cup, 1½ tsp"));

    Ok(())
}
