#[cfg(test)]
mod tests {
    use recipe_annotate::{
        AnnotationConfig, DurationScanner, IngredientMatcher, MarkdownRenderer, QuantityScanner,
        UnitCatalog,
    };

    const RECIPE: &str = "# Roast Chicken\n\n## Ingredients\n- 2 lb chicken thighs\n- 2 tbsp olive oil\n- 4 garlic cloves\n- 1 cup chicken stock\n\n## Steps\n1. Preheat the oven to 425°F.\n2. Roast for 35-40 minutes.\n3. Rest 10 min before serving.";

    fn create_renderer() -> MarkdownRenderer {
        MarkdownRenderer::new(
            QuantityScanner::new(UnitCatalog::standard()).unwrap(),
            DurationScanner::new(),
            IngredientMatcher::bundled().unwrap(),
        )
    }

    #[test]
    fn test_recipe_end_to_end() {
        let renderer = create_renderer();
        let html = renderer.render(RECIPE);

        assert!(html.starts_with("<h1>Roast Chicken</h1>\n\n<h2>Ingredients</h2>\n<ul>\n<li>"));
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<ol>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 7);

        assert!(html.contains(r#"title="US_LB=2""#));
        assert!(html.contains(r#"title="TBSP=2""#));
        assert!(html.contains(r#"title="US_CUP=1""#));
        assert!(html.contains(r#"title="F=425""#));
        assert!(html.contains(r#"data-value="duration:SEC=2100""#));
        assert!(html.contains(r#"data-value="duration:SEC=600""#));

        assert!(html.contains(r#"<span class="ingredient">chicken thighs</span>"#));
        assert!(html.contains(r#"<span class="ingredient">olive oil</span>"#));
        assert!(html.contains(r#"<span class="ingredient">garlic cloves</span>"#));
        assert!(html.contains(r#"<span class="ingredient">chicken stock</span>"#));
    }

    #[test]
    fn test_no_nested_ingredient_spans() {
        let renderer = create_renderer();
        let html = renderer.render(RECIPE);
        for span in html.split(r#"<span class="ingredient">"#).skip(1) {
            let inner = &span[..span.find("</span>").unwrap()];
            assert!(!inner.contains('<'), "nested markup in {inner}");
        }
    }

    #[test]
    fn test_plain_rendering_has_no_metric_spans() {
        let renderer = create_renderer().with_config(AnnotationConfig::plain());
        let html = renderer.render(RECIPE);
        assert!(!html.contains("quantity-metric"));
        assert_eq!(html.matches(r#"<span class="quantity""#).count(), 4);
    }

    #[test]
    fn test_inspect_serializes_to_json() {
        let renderer = create_renderer();
        let items = renderer.inspect(RECIPE);
        assert_eq!(items.len(), 7);

        let json = serde_json::to_value(&items).unwrap();
        assert_eq!(json[0]["text"], "2 lb chicken thighs");
        assert_eq!(json[0]["quantities"][0]["original_unit"], "US_LB");
        assert_eq!(json[0]["quantities"][0]["converted_unit"], "METRIC_G");
        assert_eq!(json[5]["durations"][0]["total_seconds"], 2100.0);
    }
}
