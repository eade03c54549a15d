//! Plain-text index of past devotionals

use chrono::NaiveDate;

use super::types::Devotional;

/// Favorite verses shown per entry
const PREVIEW_VERSES: usize = 5;

/// Listing date, e.g. "March 9, 2024"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// One entry per devotional, in the order given: the date, then a preview
/// of its favorite verses
pub fn listing(devotionals: &[Devotional]) -> String {
    if devotionals.is_empty() {
        return "No devotionals found.\n".to_string();
    }

    let mut out = String::new();
    for devotional in devotionals {
        out.push_str(&long_date(devotional.devotional_date));
        out.push('\n');

        let verses = &devotional.favorite_verses;
        let preview = if verses.is_empty() {
            "No favorite verses".to_string()
        } else {
            let refs: Vec<String> = verses.iter().take(PREVIEW_VERSES).map(|v| v.reference()).collect();
            let more = verses.len().saturating_sub(PREVIEW_VERSES);
            if more > 0 {
                format!("{} (+{more})", refs.join(", "))
            } else {
                refs.join(", ")
            }
        };
        out.push_str(&format!("  ↳ {preview}\n"));
    }
    out
}
