// src/utils/text.rs

//! Display helpers for console output.

use unicode_segmentation::UnicodeSegmentation;

/// Truncate `text` to at most `width` grapheme clusters, ending with `...`
/// when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= width {
        return text.to_string();
    }

    let keep = width.saturating_sub(3);
    let mut out: String = graphemes[..keep].concat();
    out.push_str(&"..."[..width.min(3)]);
    out
}

/// Pad `text` with spaces to `width` grapheme clusters.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.graphemes(true).count();
    let mut out = text.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}

/// Truncate then pad, for fixed-width table columns.
pub fn column(text: &str, width: usize) -> String {
    pad(&truncate(text, width), width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("Python", 10), "Python");
        assert_eq!(truncate("Python", 6), "Python");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("Python Fundamentals", 10), "Python ...");
    }

    #[test]
    fn test_truncate_keeps_combining_marks() {
        // "ệ" written as e + two combining marks stays one unit
        let text = "Nhe\u{0323}\u{0302}p mo\u{0302}n ho\u{0323}c";
        let out = truncate(text, 6);
        assert_eq!(out, "Nhe\u{0323}\u{0302}...");
    }

    #[test]
    fn test_column_width() {
        assert_eq!(column("abc", 5), "abc  ");
        assert_eq!(column("abcdefgh", 5), "ab...");
    }
}
