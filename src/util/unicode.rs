use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Get the display width of a string (handling wide chars like CJK)
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Display width of a single char, control chars count as zero
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Longest prefix of `s` that fits in `width` cells
pub fn truncate_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(display_width("Selah"), 5);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(char_width('↵'), 1);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Genesis", 3), "Gen");
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("ok", 10), "ok");
    }
}
