use chrono::NaiveDate;

use super::books::ScriptureSelection;

const SECTIONS: [&str; 3] = ["Observations", "Reflections", "Applications"];

/// Starting note for a day without a saved reflection
pub fn reflection_template(selection: &ScriptureSelection) -> String {
    let mut text = format!("# Scripture: {selection}\n\n\n");
    for (i, section) in SECTIONS.iter().enumerate() {
        if i > 0 {
            text.push_str("---\n");
        }
        text.push_str(&format!("## {section}:\n\n\n"));
    }
    text.push_str("---\n");
    text
}

/// Header date, e.g. "3/9/24"
pub fn header_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_sections() {
        let selection = ScriptureSelection::new("Psalms", 23).unwrap();
        let text = reflection_template(&selection);
        assert!(text.starts_with("# Scripture: Psalms 23\n"));

        let headings: Vec<&str> = text.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(headings, vec!["## Observations:", "## Reflections:", "## Applications:"]);
        assert_eq!(text.lines().filter(|l| *l == "---").count(), 3);
    }

    #[test]
    fn test_header_date() {
        assert_eq!(header_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()), "3/9/24");
        assert_eq!(header_date(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()), "12/25/25");
    }
}
