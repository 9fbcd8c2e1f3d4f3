//! Script detection and garbage-character filtering

use once_cell::sync::Lazy;
use regex::Regex;

/// Symbols OCR produces from noise, stripped from every result
///
/// Currency signs (`¥`, `£`) are kept so amounts survive filtering.
pub const GARBAGE_CHARS: &str = "§°¢¤¦©«®±²³´µ¶·¸¹º»¼½¾¿";

static SYMBOL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[|§°]{2,}").expect("valid regex"));

/// Hiragana, katakana, CJK ideographs (incl. extension A) and half-width katakana
pub fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{4E00}'..='\u{9FAF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{FF66}'..='\u{FF9D}')
}

/// Kana and common kanji, the set counted by scoring
pub fn is_kana_or_kanji(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{4E00}'..='\u{9FAF}')
}

pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese)
}

pub fn is_garbage(c: char) -> bool {
    GARBAGE_CHARS.contains(c)
}

/// Strip garbage symbols and drop lines without any readable character
pub fn filter_invalid_characters(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped: String = text.chars().filter(|c| !is_garbage(*c)).collect();
    let stripped = SYMBOL_RUN.replace_all(&stripped, "");

    stripped
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && (contains_japanese(line) || line.chars().any(|c| c.is_ascii_alphanumeric()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
