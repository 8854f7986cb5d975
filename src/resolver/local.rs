//! Pattern-based verse reference parsing.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::quran::VerseRef;

/// Reference patterns, tried in order. The first match of each pattern is the
/// only one considered; an out-of-range match falls through to the next
/// pattern.
#[allow(clippy::expect_used)]
static PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // "سورة 2 آية 255" / "surah 2 ayah 255"
        Regex::new(r"(?i)(?:سورة|سوره|surah|sura)\s*([0-9]{1,3})\s*(?:آية|ايه|اية|ayah|aya)\s*([0-9]{1,4})")
            .expect("valid keyword regex"),
        // "2:255" / "2/255"
        Regex::new(r"([0-9]{1,3})\s*[:/]\s*([0-9]{1,4})").expect("valid shorthand regex"),
        // Lowest confidence: any token followed by a number, e.g. "2 255"
        Regex::new(r"([^\s،]+)\s+([0-9]{1,4})").expect("valid fallback regex"),
    ]
});

/// Replaces Arabic-Indic and Extended Arabic-Indic digits with ASCII digits.
#[must_use]
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from_digit(u32::from(c) - 0x0660, 10).unwrap_or(c),
            '\u{06F0}'..='\u{06F9}' => char::from_digit(u32::from(c) - 0x06F0, 10).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Extracts a verse reference from free text using the local patterns only.
#[must_use]
pub fn parse_verse_reference(text: &str) -> Option<VerseRef> {
    let normalized = normalize_digits(text);

    PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(&normalized)?;
        let surah: u32 = caps.get(1)?.as_str().parse().ok()?;
        let ayah: u32 = caps.get(2)?.as_str().parse().ok()?;

        let verse = VerseRef::from_parts(surah, ayah);
        match verse {
            Some(v) => debug!("Local parse -> Surah {}, Ayah {}", v.surah, v.ayah),
            None => debug!("Rejected out-of-range reference {}:{}", surah, ayah),
        }
        verse
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(surah: u16, ayah: u16) -> Option<VerseRef> {
        Some(VerseRef { surah, ayah })
    }

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("٢:٢٥٥"), "2:255");
        assert_eq!(normalize_digits("۱۲"), "12");
        assert_eq!(normalize_digits("abc 7"), "abc 7");
    }

    #[test]
    fn test_keyword_pattern_arabic() {
        assert_eq!(parse_verse_reference("سورة 2 آية 255"), verse(2, 255));
        assert_eq!(parse_verse_reference("سوره ١٨ ايه ١٠"), verse(18, 10));
    }

    #[test]
    fn test_keyword_pattern_english() {
        assert_eq!(parse_verse_reference("Surah 36 Ayah 12 please"), verse(36, 12));
    }

    #[test]
    fn test_numeric_shorthand() {
        assert_eq!(parse_verse_reference("reading 2:255 today"), verse(2, 255));
        assert_eq!(parse_verse_reference("3 / 7"), verse(3, 7));
    }

    #[test]
    fn test_arabic_digits_match_ascii() {
        assert_eq!(
            parse_verse_reference("٢:٢٥٥"),
            parse_verse_reference("2:255")
        );
        assert_eq!(parse_verse_reference("٢:٢٥٥"), verse(2, 255));
    }

    #[test]
    fn test_rejects_out_of_range_surah() {
        assert_eq!(parse_verse_reference("120:5"), None);
    }

    #[test]
    fn test_rejects_zero_ayah() {
        assert_eq!(parse_verse_reference("2:0"), None);
    }

    #[test]
    fn test_fallback_token_number() {
        assert_eq!(parse_verse_reference("2 255"), verse(2, 255));
    }

    #[test]
    fn test_fallback_non_numeric_token_is_no_match() {
        assert_eq!(parse_verse_reference("البقرة 5"), None);
    }

    #[test]
    fn test_out_of_range_shorthand_falls_through_to_fallback() {
        // 200:1 is rejected, then only the first fallback match is considered.
        assert_eq!(parse_verse_reference("200:1 then 7 3"), None);
        assert_eq!(parse_verse_reference("7 3 after 200:1"), verse(7, 3));
    }

    #[test]
    fn test_no_reference() {
        assert_eq!(parse_verse_reference("السلام عليكم"), None);
        assert_eq!(parse_verse_reference(""), None);
    }
}
