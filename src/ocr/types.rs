//! OCR Types
//!
//! Languages, engine flags, attempts and outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OCR error types
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("OCR processing error: {0}")]
    ProcessingError(String),
}

/// Language selection for a recognition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LanguageMode {
    /// Japanese and English models together
    #[default]
    #[serde(rename = "jpn+eng")]
    JpnEng,
    #[serde(rename = "jpn")]
    Jpn,
    #[serde(rename = "eng")]
    Eng,
    /// Japanese-first, English when no Japanese script is recognized
    #[serde(rename = "auto")]
    Auto,
}

impl LanguageMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpn+eng" => Some(Self::JpnEng),
            "jpn" => Some(Self::Jpn),
            "eng" => Some(Self::Eng),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JpnEng => "jpn+eng",
            Self::Jpn => "jpn",
            Self::Eng => "eng",
            Self::Auto => "auto",
        }
    }

    /// Engine language pack used for the primary attempt and fallback chain
    pub fn primary_language(&self) -> &'static str {
        match self {
            Self::JpnEng | Self::Auto => "jpn+eng",
            Self::Jpn => "jpn",
            Self::Eng => "eng",
        }
    }
}

impl fmt::Display for LanguageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tesseract page segmentation modes used by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSegmentationMode {
    /// Fully automatic page segmentation, but no OSD
    Auto = 3,
    /// Assume a single uniform block of text
    SingleUniformBlock = 6,
    /// Treat the image as a single text line
    SingleLine = 7,
    /// Treat the image as a single word
    SingleWord = 8,
}

impl PageSegmentationMode {
    /// Convert to Tesseract PSM value
    pub fn to_psm_value(self) -> u8 {
        self as u8
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Auto => "Fully automatic page segmentation, no OSD",
            Self::SingleUniformBlock => "Single uniform block of text",
            Self::SingleLine => "Single text line",
            Self::SingleWord => "Single word",
        }
    }
}

/// Engine settings for one recognition call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrFlags {
    pub psm: PageSegmentationMode,
    /// Use the LSTM engine (`--oem 3`) explicitly
    pub default_engine: bool,
    pub preserve_interword_spaces: bool,
    pub char_whitelist: Option<&'static str>,
}

impl OcrFlags {
    pub fn psm(psm: PageSegmentationMode) -> Self {
        Self {
            psm,
            default_engine: false,
            preserve_interword_spaces: false,
            char_whitelist: None,
        }
    }

    pub fn with_default_engine(mut self) -> Self {
        self.default_engine = true;
        self
    }

    pub fn preserving_spaces(mut self) -> Self {
        self.preserve_interword_spaces = true;
        self
    }

    pub fn with_whitelist(mut self, chars: &'static str) -> Self {
        self.char_whitelist = Some(chars);
        self
    }

    /// Command-line form, e.g. `--oem 3 --psm 6 -c preserve_interword_spaces=1`
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.default_engine {
            args.extend(["--oem".to_string(), "3".to_string()]);
        }
        args.extend(["--psm".to_string(), self.psm.to_psm_value().to_string()]);
        if self.preserve_interword_spaces {
            args.extend(["-c".to_string(), "preserve_interword_spaces=1".to_string()]);
        }
        if let Some(chars) = self.char_whitelist {
            args.extend(["-c".to_string(), format!("tessedit_char_whitelist={}", chars)]);
        }
        args
    }
}

impl fmt::Display for OcrFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}

/// One (language, flags) pair from a configuration list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSetting {
    pub language: &'static str,
    pub flags: OcrFlags,
}

impl OcrSetting {
    pub fn new(language: &'static str, flags: OcrFlags) -> Self {
        Self { language, flags }
    }
}

/// A single engine invocation and its evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrAttempt {
    pub language: String,
    pub flags: String,
    /// Image variant the attempt ran on
    pub variant: &'static str,
    pub text: String,
    pub score: f32,
}

/// How the final text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionPath {
    /// Scored configuration search
    Configured,
    /// Simpler page segmentation retry
    SegmentationFallback,
    /// Minimal preprocessing retry
    PreprocessedFallback,
}

/// Result of recognizing one image candidate
#[derive(Debug, Clone, PartialEq)]
pub enum OcrOutcome {
    Recognized {
        text: String,
        path: RecognitionPath,
        /// Winning attempt, when the text came from the scored search
        best: Option<OcrAttempt>,
        attempts: usize,
    },
    /// Every attempt came back empty or failed
    NoText {
        width: u32,
        height: u32,
        attempts: usize,
    },
}

impl OcrOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Recognized { text, .. } => Some(text),
            Self::NoText { .. } => None,
        }
    }

    pub fn attempts(&self) -> usize {
        match self {
            Self::Recognized { attempts, .. } | Self::NoText { attempts, .. } => *attempts,
        }
    }
}
