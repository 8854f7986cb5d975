//! Outbound message formatting for Telegram's HTML parse mode.

use crate::quran::VerseContent;

/// Escapes the characters Telegram's HTML parser treats as markup.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a verse post: a bold title line, a blank line, then the text.
#[must_use]
pub fn format_verse_post(content: &VerseContent) -> String {
    format!(
        "<b>{} - آية {}</b>\n\n{}",
        escape_html(&content.surah_name),
        content.verse.ayah,
        escape_html(&content.text)
    )
}
