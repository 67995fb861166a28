#[cfg(test)]
mod tests {
    use recipe_annotate::annotation_config::AnnotationConfig;
    use recipe_annotate::duration::DurationScanner;
    use recipe_annotate::ingredient_matcher::IngredientMatcher;
    use recipe_annotate::markdown::MarkdownRenderer;
    use recipe_annotate::quantity::QuantityScanner;
    use recipe_annotate::units::UnitCatalog;

    fn create_renderer(ingredients: &str) -> MarkdownRenderer {
        MarkdownRenderer::new(
            QuantityScanner::new(UnitCatalog::standard()).unwrap(),
            DurationScanner::new(),
            IngredientMatcher::from_text(ingredients).unwrap(),
        )
    }

    fn quantity(key_value: &str, text: &str) -> String {
        format!(
            r#"<span class="quantity" title="{key_value}" data-value="quantity:{key_value}">{text}</span>"#
        )
    }

    fn duration(seconds: &str, text: &str) -> String {
        format!(
            r#"<span class="duration" title="SEC={seconds}" data-value="duration:SEC={seconds}">{text}</span>"#
        )
    }

    fn ingredient(text: &str) -> String {
        format!(r#"<span class="ingredient">{text}</span>"#)
    }

    #[test]
    fn test_two_item_list_is_one_list() {
        let renderer = create_renderer("flour").with_config(AnnotationConfig::plain());
        let html = renderer.render("- 2 cups flour\n- Rest 5 minutes");
        assert_eq!(
            html,
            format!(
                "<ul>\n<li>{} {}</li>\n<li>Rest {}</li>\n</ul>",
                quantity("US_CUP=2", "2 cups"),
                ingredient("flour"),
                duration("300", "5 minutes")
            )
        );
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 2);
    }

    #[test]
    fn test_list_items_get_metric_by_default() {
        let renderer = create_renderer("flour");
        let html = renderer.render("* 2 cups flour");
        assert!(html.contains(r#"title="METRIC_ML=475""#));
        assert!(html.contains("(475 ml)"));
        assert!(html.contains(&ingredient("flour")));
    }

    #[test]
    fn test_full_document() {
        let renderer = create_renderer("milk").with_config(AnnotationConfig::plain());
        let markdown = "# Pancakes\n\nFluffy and _quick_.\nServes 4.\n\n## Steps\n1. Whisk 1 cup milk\n2. Cook for 2 minutes\n\n---\n> Enjoy";
        let expected = [
            "<h1>Pancakes</h1>".to_string(),
            "<p>Fluffy and <em>quick</em>.<br>Serves 4.</p>".to_string(),
            format!(
                "<h2>Steps</h2>\n<ol>\n<li>Whisk {} {}</li>\n<li>Cook for {}</li>\n</ol>",
                quantity("US_CUP=1", "1 cup"),
                ingredient("milk"),
                duration("120", "2 minutes")
            ),
            "<hr>\n<blockquote>Enjoy</blockquote>".to_string(),
        ]
        .join("\n\n");
        assert_eq!(renderer.render(markdown), expected);
    }

    #[test]
    fn test_paragraphs_are_not_annotated() {
        let renderer = create_renderer("milk");
        assert_eq!(
            renderer.render("Warm 1 cup milk for 5 minutes"),
            "<p>Warm 1 cup milk for 5 minutes</p>"
        );
    }

    #[test]
    fn test_blank_line_splits_lists() {
        let renderer = create_renderer("salt");
        assert_eq!(
            renderer.render("- pepper\n\n- more pepper"),
            "<ul>\n<li>pepper</li>\n</ul>\n\n<ul>\n<li>more pepper</li>\n</ul>"
        );
    }

    #[test]
    fn test_inline_markup_inside_items() {
        let renderer = create_renderer("sugar").with_config(AnnotationConfig::plain());
        assert_eq!(
            renderer.render("- **2 cups** sugar"),
            format!(
                "<ul>\n<li><strong>{}</strong> {}</li>\n</ul>",
                quantity("US_CUP=2", "2 cups"),
                ingredient("sugar")
            )
        );
    }

    #[test]
    fn test_image() {
        let renderer = create_renderer("sugar");
        assert_eq!(
            renderer.render("![Cake](cake.jpg)"),
            r#"<p><img src="cake.jpg" alt="Cake"></p>"#
        );
    }

    #[test]
    fn test_image_inside_list_item_keeps_attributes() {
        let renderer = create_renderer("flour").with_config(AnnotationConfig::plain());
        assert_eq!(
            renderer.render("- ![Bake 5 minutes with 2 cups](pan-500g.png)"),
            "<ul>\n<li><img src=\"pan-500g.png\" alt=\"Bake 5 minutes with 2 cups\"></li>\n</ul>"
        );
        assert_eq!(
            renderer.render("- ![2 cups](cup.png) 2 cups flour"),
            format!(
                "<ul>\n<li><img src=\"cup.png\" alt=\"2 cups\"> {} {}</li>\n</ul>",
                quantity("US_CUP=2", "2 cups"),
                ingredient("flour")
            )
        );
    }

    #[test]
    fn test_block_html_is_not_wrapped() {
        let renderer = create_renderer("flour");
        assert_eq!(renderer.render("<p>Hello</p>"), "<p>Hello</p>");
        assert_eq!(renderer.render("<div>note</div>"), "<div>note</div>");
        assert_eq!(
            renderer.render("Intro\n<hr>\nOutro"),
            "<p>Intro</p>\n<hr>\n<p>Outro</p>"
        );
        // Inline tags still get a paragraph
        assert_eq!(
            renderer.render("<em>so</em> good"),
            "<p><em>so</em> good</p>"
        );
    }

    #[test]
    fn test_adjacent_emphasis() {
        let renderer = create_renderer("flour");
        assert_eq!(renderer.render("_a_ _b_"), "<p><em>a</em> <em>b</em></p>");
        assert_eq!(
            renderer.render("**a** **b**"),
            "<p><strong>a</strong> <strong>b</strong></p>"
        );
    }

    #[test]
    fn test_annotate_line_pipeline() {
        let renderer = create_renderer("butter").with_config(AnnotationConfig::plain());
        assert_eq!(
            renderer.annotate_line("Melt 2 tbsp butter for 1 minute"),
            format!(
                "Melt {} {} for {}",
                quantity("TBSP=2", "2 tbsp"),
                ingredient("butter"),
                duration("60", "1 minute")
            )
        );
    }

    #[test]
    fn test_render_with_overrides_config() {
        let renderer = create_renderer("milk");
        let html = renderer.render_with("- 1 cup milk", &AnnotationConfig::plain());
        assert!(!html.contains("quantity-metric"));
        assert!(renderer.render("- 1 cup milk").contains("quantity-metric"));
    }

    #[test]
    fn test_inspect_list_items() {
        let renderer = create_renderer("milk");
        let items = renderer.inspect("# Title\n- 1/2 cup milk\nSome text\n1. Simmer 10 minutes");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "1/2 cup milk");
        assert_eq!(items[0].quantities[0].converted_value, Some(120.0));
        assert_eq!(items[0].ingredients[0].matched_text, "milk");
        assert_eq!(items[1].durations[0].total_seconds, 600.0);
    }

    #[test]
    fn test_empty_input() {
        let renderer = create_renderer("milk");
        assert_eq!(renderer.render(""), "");
        assert_eq!(renderer.render("\n\n  \n"), "");
    }
}
