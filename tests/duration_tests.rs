#[cfg(test)]
mod tests {
    use recipe_annotate::duration::DurationScanner;

    fn create_scanner() -> DurationScanner {
        DurationScanner::new()
    }

    fn span(seconds: &str, text: &str) -> String {
        format!(
            r#"<span class="duration" title="SEC={seconds}" data-value="duration:SEC={seconds}">{text}</span>"#
        )
    }

    #[test]
    fn test_single_duration() {
        let scanner = create_scanner();
        assert_eq!(
            scanner.annotate("Cook for 5 minutes"),
            format!("Cook for {}", span("300", "5 minutes"))
        );
    }

    #[test]
    fn test_range_uses_lower_bound() {
        let scanner = create_scanner();
        assert_eq!(
            scanner.annotate("Bake for 35-40 minutes"),
            format!("Bake for {}", span("2100", "35-40 minutes"))
        );
        assert_eq!(
            scanner.annotate("Simmer 1 to 2 hours."),
            format!("Simmer {}.", span("3600", "1 to 2 hours"))
        );
        assert_eq!(
            scanner.annotate("Rest 2–3 min"),
            format!("Rest {}", span("120", "2–3 min"))
        );
    }

    #[test]
    fn test_no_number_no_annotation() {
        let scanner = create_scanner();
        let text = "The minutes of the meeting";
        assert_eq!(scanner.annotate(text), text);
        assert!(scanner.find_durations(text).is_empty());
    }

    #[test]
    fn test_case_and_decimals() {
        let scanner = create_scanner();
        assert_eq!(
            scanner.annotate("Braise 1.5 HOURS"),
            format!("Braise {}", span("5400", "1.5 HOURS"))
        );
    }

    #[test]
    fn test_multiple_durations() {
        let scanner = create_scanner();
        let found = scanner.find_durations("Boil 10 minutes, then rest 30 seconds");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].matched_text, "10 minutes");
        assert_eq!(found[0].total_seconds, 600.0);
        assert_eq!(found[0].start_pos, 5);
        assert_eq!(found[0].end_pos, 15);
        assert_eq!(found[1].matched_text, "30 seconds");
        assert_eq!(found[1].total_seconds, 30.0);
    }

    #[test]
    fn test_full_unit_not_cut_short() {
        let scanner = create_scanner();
        let found = scanner.find_durations("2 hours");
        assert_eq!(found[0].matched_text, "2 hours");
        assert_eq!(found[0].total_seconds, 7200.0);
    }

    #[test]
    fn test_fractional_amounts() {
        let scanner = create_scanner();
        assert_eq!(
            scanner.annotate("Simmer 1 1/2 hours"),
            format!("Simmer {}", span("5400", "1 1/2 hours"))
        );
        assert_eq!(
            scanner.annotate("Chill ½ hour"),
            format!("Chill {}", span("1800", "½ hour"))
        );
        assert_eq!(
            scanner.annotate("Rest 1/4 hour"),
            format!("Rest {}", span("900", "1/4 hour"))
        );
    }

    #[test]
    fn test_tag_interiors_are_skipped() {
        let scanner = create_scanner();
        let text = r#"<img src="timer.png" alt="Bake 5 minutes"> for 5 minutes"#;
        let found = scanner.find_durations(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_pos, text.len() - "5 minutes".len());
        assert_eq!(
            scanner.annotate(text),
            format!(
                r#"<img src="timer.png" alt="Bake 5 minutes"> for {}"#,
                span("300", "5 minutes")
            )
        );
    }
}
