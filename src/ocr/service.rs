//! OCR Adapter
//!
//! Runs the configuration search over image variants, picks the best-scoring
//! text and falls back to progressively simpler settings when nothing is
//! recognized. Engine failures never escape; the only error is an image that
//! cannot be decoded.

use std::sync::Arc;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::filter::{contains_japanese, filter_invalid_characters};
use super::preprocess::{self, ImageVariant, PreprocessSettings};
use super::provider::OcrEngine;
use super::scoring::ScoringWeights;
use super::types::{
    LanguageMode, OcrAttempt, OcrError, OcrFlags, OcrOutcome, OcrSetting, PageSegmentationMode,
    RecognitionPath,
};
use crate::analysis::AnalysisMode;

use PageSegmentationMode::{Auto, SingleLine, SingleUniformBlock, SingleWord};

const ENG_LINE_WHITELIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz.,:-¥$€()[]";
const ENG_WORD_WHITELIST: &str = "0123456789.,¥$€";

/// Segmentation modes of the fallback chain, most structured first
const FALLBACK_SEGMENTATION: [PageSegmentationMode; 4] =
    [SingleUniformBlock, SingleLine, SingleWord, Auto];

/// Ordered configuration list for a language mode
pub fn settings_for(language: LanguageMode) -> Vec<OcrSetting> {
    let block = OcrFlags::psm(SingleUniformBlock).preserving_spaces();
    match language {
        LanguageMode::JpnEng | LanguageMode::Auto => vec![
            OcrSetting::new("jpn+eng", block.clone()),
            OcrSetting::new("jpn", block),
            OcrSetting::new("jpn+eng", OcrFlags::psm(Auto)),
            OcrSetting::new("jpn+eng", OcrFlags::psm(SingleLine)),
        ],
        LanguageMode::Jpn => vec![
            OcrSetting::new("jpn", block),
            OcrSetting::new("jpn", OcrFlags::psm(Auto)),
            OcrSetting::new("jpn", OcrFlags::psm(SingleLine)),
        ],
        LanguageMode::Eng => vec![
            OcrSetting::new("eng", block),
            OcrSetting::new("eng", OcrFlags::psm(SingleLine).with_whitelist(ENG_LINE_WHITELIST)),
            OcrSetting::new("eng", OcrFlags::psm(SingleWord).with_whitelist(ENG_WORD_WHITELIST)),
        ],
    }
}

/// Best attempt so far and the number of engine calls made
#[derive(Debug, Default)]
struct Search {
    best: Option<OcrAttempt>,
    attempts: usize,
}

impl Search {
    fn best_text(&self) -> Option<&str> {
        self.best.as_ref().map(|a| a.text.as_str())
    }
}

/// OCR adapter over a single engine
pub struct OcrAdapter {
    engine: Arc<dyn OcrEngine>,
    scoring: ScoringWeights,
    preprocess: PreprocessSettings,
}

impl OcrAdapter {
    pub fn new(
        engine: Arc<dyn OcrEngine>,
        scoring: ScoringWeights,
        preprocess: PreprocessSettings,
    ) -> Self {
        Self {
            engine,
            scoring,
            preprocess,
        }
    }

    /// Recognize text in an encoded image
    pub fn recognize(
        &self,
        image_bytes: &[u8],
        language: LanguageMode,
        mode: AnalysisMode,
    ) -> Result<OcrOutcome, OcrError> {
        let image = preprocess::decode(image_bytes)?;
        let image = preprocess::limit_size(image, &self.preprocess);

        let mut search = Search::default();
        match mode {
            AnalysisMode::Fast => self.fast_search(&image, language, &mut search),
            AnalysisMode::Thorough => self.thorough_search(&image, language, &mut search),
        }

        if let Some(best) = search.best.take() {
            if mode.is_thorough() {
                info!(
                    score = best.score,
                    language = %best.language,
                    flags = %best.flags,
                    variant = best.variant,
                    attempts = search.attempts,
                    "OCR selected best attempt"
                );
            }
            return Ok(OcrOutcome::Recognized {
                text: best.text.clone(),
                path: RecognitionPath::Configured,
                best: Some(best),
                attempts: search.attempts,
            });
        }

        Ok(self.fallback_chain(&image, language, search.attempts))
    }

    /// Run one attempt, returning true once the early-exit score is exceeded
    fn attempt(
        &self,
        variant: &ImageVariant,
        language: &str,
        flags: &OcrFlags,
        search: &mut Search,
    ) -> bool {
        search.attempts += 1;

        let raw = match self.engine.recognize(&variant.image, language, flags) {
            Ok(text) => text,
            Err(e) => {
                debug!(language, flags = %flags, variant = variant.name, error = %e, "OCR attempt failed");
                return false;
            }
        };

        let text = filter_invalid_characters(raw.trim());
        if text.is_empty() {
            debug!(language, flags = %flags, variant = variant.name, "OCR attempt produced no text");
            return false;
        }

        let score = self.scoring.score(&text, language);
        debug!(language, flags = %flags, variant = variant.name, score, text = %text, "OCR attempt");

        let improves = search.best.as_ref().map_or(true, |b| score > b.score);
        if improves {
            search.best = Some(OcrAttempt {
                language: language.to_string(),
                flags: flags.to_string(),
                variant: variant.name,
                text,
                score,
            });
        }

        search
            .best
            .as_ref()
            .is_some_and(|b| b.score > self.scoring.early_exit_score)
    }

    /// Every configuration on every variant until the early-exit score is hit
    fn search_settings(&self, variants: &[ImageVariant], settings: &[OcrSetting], search: &mut Search) {
        for setting in settings {
            for variant in variants {
                if self.attempt(variant, setting.language, &setting.flags, search) {
                    return;
                }
            }
        }
    }

    fn thorough_search(&self, image: &DynamicImage, language: LanguageMode, search: &mut Search) {
        let variants = preprocess::variants(image, &self.preprocess);
        self.search_settings(&variants, &settings_for(language), search);

        if language == LanguageMode::Auto && !search.best_text().is_some_and(contains_japanese) {
            let mut english = Search::default();
            self.search_settings(&variants, &settings_for(LanguageMode::Eng), &mut english);
            search.attempts += english.attempts;
            if english.best.is_some() {
                debug!("No Japanese script recognized, using English result");
                search.best = english.best;
            }
        }
    }

    /// Single primary attempt on the original image, plus a script retry
    fn fast_search(&self, image: &DynamicImage, language: LanguageMode, search: &mut Search) {
        let original = ImageVariant {
            name: "original",
            image: image.clone(),
        };
        let primary = OcrFlags::psm(SingleUniformBlock)
            .with_default_engine()
            .preserving_spaces();

        self.attempt(&original, language.primary_language(), &primary, search);

        let has_japanese = search.best_text().is_some_and(contains_japanese);
        match language {
            LanguageMode::JpnEng if !has_japanese => {
                let mut retry = Search::default();
                let flags = OcrFlags::psm(SingleUniformBlock).with_default_engine();
                self.attempt(&original, "jpn", &flags, &mut retry);
                search.attempts += retry.attempts;
                if retry.best_text().is_some_and(contains_japanese) {
                    search.best = retry.best;
                }
            }
            LanguageMode::Auto if !has_japanese => {
                let mut english = Search::default();
                self.attempt(&original, "eng", &primary, &mut english);
                search.attempts += english.attempts;
                if english.best.is_some() {
                    search.best = english.best;
                }
            }
            _ => {}
        }
    }

    /// Simpler segmentation, then minimal preprocessing, then give up
    fn fallback_chain(&self, image: &DynamicImage, language: LanguageMode, attempts: usize) -> OcrOutcome {
        let lang = language.primary_language();
        let mut search = Search {
            best: None,
            attempts,
        };
        let original = ImageVariant {
            name: "original",
            image: image.clone(),
        };

        for psm in FALLBACK_SEGMENTATION {
            self.attempt(&original, lang, &OcrFlags::psm(psm), &mut search);
            if let Some(best) = search.best.take() {
                info!(psm = psm.description(), "OCR fallback recognized text");
                return OcrOutcome::Recognized {
                    text: best.text,
                    path: RecognitionPath::SegmentationFallback,
                    best: None,
                    attempts: search.attempts,
                };
            }
        }

        let minimal = ImageVariant {
            name: "minimal",
            image: preprocess::minimal(image, &self.preprocess),
        };
        self.attempt(&minimal, lang, &OcrFlags::psm(SingleUniformBlock), &mut search);
        if let Some(best) = search.best.take() {
            info!("OCR fallback recognized text after minimal preprocessing");
            return OcrOutcome::Recognized {
                text: best.text,
                path: RecognitionPath::PreprocessedFallback,
                best: None,
                attempts: search.attempts,
            };
        }

        let (width, height) = image.dimensions();
        info!(width, height, attempts = search.attempts, "OCR found no text");
        OcrOutcome::NoText {
            width,
            height,
            attempts: search.attempts,
        }
    }
}
