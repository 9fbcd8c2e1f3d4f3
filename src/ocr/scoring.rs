//! OCR result quality scoring
//!
//! Ranks candidate texts from different configurations and image variants.
//! Every weight is configurable; the defaults favour invoice-like content
//! (amounts, dates, billing keywords).

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::filter::{is_garbage, is_kana_or_kanji};

/// Amount followed or preceded by a currency sign: `1,200円`, `12.50 €`, `¥12,345`
static CURRENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+[,.]?\d*\s*[円¥$€]|[¥$€£]\s*\d[\d,]*").expect("valid regex")
});

/// `2025-09-16`, `2025/9/16`, `2025年9月16`
static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}[-/年]\d{1,2}[-/月]\d{1,2}").expect("valid regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Cap on the character-count term
    pub length_cap: f32,
    /// Per kana/kanji character, only for languages containing `jpn`
    pub japanese_char: f32,
    pub digit: f32,
    pub ascii_letter: f32,
    pub currency_bonus: f32,
    pub date_bonus: f32,
    /// Added once per keyword found (case-insensitive)
    pub keyword_bonus: f32,
    pub keywords: Vec<String>,
    /// Subtracted per garbage symbol
    pub garbage_penalty: f32,
    /// Unique characters beyond this earn the diversity bonus
    pub diversity_floor: usize,
    pub diversity_cap: f32,
    /// Stop searching once a score exceeds this
    pub early_exit_score: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            length_cap: 20.0,
            japanese_char: 2.0,
            digit: 1.5,
            ascii_letter: 1.0,
            currency_bonus: 15.0,
            date_bonus: 10.0,
            keyword_bonus: 8.0,
            keywords: ["請求書", "領収書", "invoice", "receipt", "合計", "total", "税込", "税抜"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            garbage_penalty: 0.5,
            diversity_floor: 5,
            diversity_cap: 10.0,
            early_exit_score: 50.0,
        }
    }
}

/// Individual terms of a score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub length: f32,
    pub script: f32,
    pub digits: f32,
    pub letters: f32,
    pub currency: f32,
    pub date: f32,
    pub keywords: f32,
    pub penalty: f32,
    pub diversity: f32,
}

impl ScoreBreakdown {
    /// Sum of all terms, floored at zero
    pub fn total(&self) -> f32 {
        let sum = self.length
            + self.script
            + self.digits
            + self.letters
            + self.currency
            + self.date
            + self.keywords
            + self.diversity
            - self.penalty;
        sum.max(0.0)
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('\u{FF10}'..='\u{FF19}').contains(&c)
}

impl ScoringWeights {
    pub fn evaluate(&self, text: &str, language: &str) -> ScoreBreakdown {
        if text.trim().is_empty() {
            return ScoreBreakdown::default();
        }

        let visible: Vec<char> = text.chars().filter(|c| *c != ' ' && *c != '\n').collect();
        let mut breakdown = ScoreBreakdown {
            length: (visible.len() as f32).min(self.length_cap),
            ..Default::default()
        };

        if language.contains("jpn") {
            let count = text.chars().filter(|c| is_kana_or_kanji(*c)).count();
            breakdown.script = count as f32 * self.japanese_char;
        }

        breakdown.digits = text.chars().filter(|c| is_digit(*c)).count() as f32 * self.digit;
        breakdown.letters =
            text.chars().filter(|c| c.is_ascii_alphabetic()).count() as f32 * self.ascii_letter;

        if CURRENCY.is_match(text) {
            breakdown.currency = self.currency_bonus;
        }
        if DATE.is_match(text) {
            breakdown.date = self.date_bonus;
        }

        let lowered = text.to_lowercase();
        let hits = self
            .keywords
            .iter()
            .filter(|k| lowered.contains(&k.to_lowercase()))
            .count();
        breakdown.keywords = hits as f32 * self.keyword_bonus;

        let garbage = text.chars().filter(|c| *c == '|' || is_garbage(*c)).count();
        breakdown.penalty = garbage as f32 * self.garbage_penalty;

        let unique: HashSet<char> = visible.into_iter().collect();
        if unique.len() > self.diversity_floor {
            breakdown.diversity = ((unique.len() - self.diversity_floor) as f32).min(self.diversity_cap);
        }

        breakdown
    }

    pub fn score(&self, text: &str, language: &str) -> f32 {
        self.evaluate(text, language).total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores_zero() {
        let w = ScoringWeights::default();
        assert_eq!(w.score("", "jpn+eng"), 0.0);
        assert_eq!(w.score("  \n", "eng"), 0.0);
    }

    #[test]
    fn test_currency_amount_bonus() {
        let w = ScoringWeights::default();
        let b = w.evaluate("¥12,345", "jpn+eng");

        assert_eq!(b.currency, 15.0);
        assert_eq!(b.length, 7.0);
        assert_eq!(b.digits, 7.5);
        assert_eq!(b.letters, 0.0);
        assert_eq!(b.penalty, 0.0);
        // unique: ¥ 1 2 , 3 4 5 = 7 -> +2
        assert_eq!(b.diversity, 2.0);
        assert_eq!(b.total(), 31.5);
    }

    #[test]
    fn test_suffix_currency_and_date() {
        let w = ScoringWeights::default();
        assert_eq!(w.evaluate("1,200円", "jpn").currency, 15.0);
        assert_eq!(w.evaluate("2025年9月16日", "jpn").date, 10.0);
        assert_eq!(w.evaluate("2025/09/16", "eng").date, 10.0);
        assert_eq!(w.evaluate("12345", "eng").currency, 0.0);
    }

    #[test]
    fn test_japanese_bonus_requires_jpn_language() {
        let w = ScoringWeights::default();
        assert_eq!(w.evaluate("請求書", "jpn+eng").script, 6.0);
        assert_eq!(w.evaluate("請求書", "eng").script, 0.0);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let w = ScoringWeights::default();
        assert_eq!(w.evaluate("INVOICE Total", "eng").keywords, 16.0);
        assert_eq!(w.evaluate("合計 税込", "jpn").keywords, 16.0);
    }

    #[test]
    fn test_garbage_penalty_and_floor() {
        let w = ScoringWeights::default();
        let b = w.evaluate("|||§", "eng");
        assert_eq!(b.penalty, 2.0);
        // length 4 - penalty 2
        assert_eq!(b.total(), 2.0);

        let heavy = ScoringWeights {
            garbage_penalty: 10.0,
            ..Default::default()
        };
        assert_eq!(heavy.score("|||", "eng"), 0.0);
    }

    #[test]
    fn test_richer_text_scores_higher() {
        let w = ScoringWeights::default();
        let good = w.score("請求書 合計 ¥12,345 2025/09/16", "jpn+eng");
        let poor = w.score("ll1", "jpn+eng");
        assert!(good > w.early_exit_score);
        assert!(poor < good);
    }
}
