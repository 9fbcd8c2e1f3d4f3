//! Configuration management for the selection analyzer
//!
//! Values come from defaults, then an optional TOML file, then environment
//! variables. Out-of-range values are replaced by their defaults with a
//! warning rather than rejected.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::AnalysisSettings;
use crate::extract::ExtractionSettings;
use crate::formats::BackendKind;
use crate::ocr::{LanguageMode, PreprocessSettings, ScoringWeights};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "selection_analyzer.toml";

/// Default reading-order Y tolerance in document units
pub const DEFAULT_Y_TOLERANCE: f32 = 2.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub document: DocumentConfig,
    pub ocr: OcrConfig,
    pub extraction: ExtractionSettings,
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub backend: BackendKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Rows whose top edges round to the same multiple of this are one line
    pub y_coordinate_tolerance: f32,
    /// `jpn+eng`, `jpn`, `eng` or `auto`
    pub language: String,
    pub tesseract: TesseractConfig,
    pub preprocess: PreprocessSettings,
    pub scoring: ScoringWeights,
    /// Confidence of text recovered by the page-segmentation fallback
    pub fallback_confidence: f32,
    /// Confidence of text recovered after minimal preprocessing
    pub minimal_fallback_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            y_coordinate_tolerance: DEFAULT_Y_TOLERANCE,
            language: LanguageMode::default().as_str().to_string(),
            tesseract: TesseractConfig::default(),
            preprocess: PreprocessSettings::default(),
            scoring: ScoringWeights::default(),
            fallback_confidence: 0.3,
            minimal_fallback_confidence: 0.2,
        }
    }
}

impl OcrConfig {
    pub fn language_mode(&self) -> LanguageMode {
        LanguageMode::parse(&self.language).unwrap_or_else(|| {
            warn!(language = %self.language, "Unknown OCR language, using jpn+eng");
            LanguageMode::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Executable name or path
    pub command: String,
    /// Passed as `--tessdata-dir` when set
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            tessdata_dir: None,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// Reads `path` when given, otherwise `DEFAULT_CONFIG_FILE` if it exists,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Config::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.sanitize();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(text)?;
        config.sanitize();
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SELECTION_Y_TOLERANCE") {
            match value.trim().parse::<f32>() {
                Ok(v) => self.ocr.y_coordinate_tolerance = v,
                Err(_) => warn!(value = %value, "Ignoring invalid SELECTION_Y_TOLERANCE"),
            }
        }
        if let Some(value) = lookup("SELECTION_BACKEND") {
            match BackendKind::parse(&value) {
                Some(kind) => self.document.backend = kind,
                None => warn!(value = %value, "Ignoring unknown SELECTION_BACKEND"),
            }
        }
        if let Some(value) = lookup("SELECTION_OCR_LANGUAGE") {
            self.ocr.language = value.trim().to_string();
        }
        if let Some(value) = lookup("TESSERACT_CMD") {
            self.ocr.tesseract.command = value;
        }
        if let Some(value) = lookup("TESSDATA_PREFIX") {
            self.ocr.tesseract.tessdata_dir = Some(PathBuf::from(value));
        }
    }

    /// Replace unusable values with defaults
    fn sanitize(&mut self) {
        let tol = self.ocr.y_coordinate_tolerance;
        if !(tol.is_finite() && tol > 0.0) {
            warn!(value = tol, "Invalid y_coordinate_tolerance, using {}", DEFAULT_Y_TOLERANCE);
            self.ocr.y_coordinate_tolerance = DEFAULT_Y_TOLERANCE;
        }
        if LanguageMode::parse(&self.ocr.language).is_none() {
            warn!(language = %self.ocr.language, "Unknown OCR language, using jpn+eng");
            self.ocr.language = LanguageMode::default().as_str().to_string();
        }
        for confidence in [
            &mut self.ocr.fallback_confidence,
            &mut self.ocr.minimal_fallback_confidence,
            &mut self.analysis.image_confidence,
            &mut self.analysis.fast_image_confidence,
        ] {
            *confidence = confidence.clamp(0.0, 1.0);
        }
        let threshold = self.analysis.memory_threshold_percent;
        if !(threshold > 0.0 && threshold <= 100.0) {
            warn!(value = threshold, "Invalid memory_threshold_percent, using default");
            self.analysis.memory_threshold_percent = AnalysisSettings::default().memory_threshold_percent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ocr.y_coordinate_tolerance, 2.0);
        assert_eq!(config.ocr.language, "jpn+eng");
        assert_eq!(config.document.backend, BackendKind::Mupdf);
        assert_eq!(config.extraction.embedded_image_cap, 3);
        assert_eq!(config.ocr.scoring.early_exit_score, 50.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [document]
            backend = "raster"

            [ocr]
            y_coordinate_tolerance = 4.5

            [ocr.scoring]
            currency_bonus = 20.0
            "#,
        )
        .unwrap();

        assert_eq!(config.document.backend, BackendKind::Raster);
        assert_eq!(config.ocr.y_coordinate_tolerance, 4.5);
        assert_eq!(config.ocr.scoring.currency_bonus, 20.0);
        assert_eq!(config.ocr.scoring.date_bonus, 10.0);
        assert_eq!(config.ocr.language, "jpn+eng");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_toml_str(
            r#"
            [ocr]
            y_coordinate_tolerance = -1.0
            language = "klingon"
            fallback_confidence = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(config.ocr.y_coordinate_tolerance, DEFAULT_Y_TOLERANCE);
        assert_eq!(config.ocr.language, "jpn+eng");
        assert_eq!(config.ocr.fallback_confidence, 1.0);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(matches!(
            Config::from_toml_str("[ocr\nlanguage ="),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SELECTION_Y_TOLERANCE", "3.0"),
            ("SELECTION_BACKEND", "pdf2image"),
            ("SELECTION_OCR_LANGUAGE", "eng"),
            ("TESSERACT_CMD", "/opt/tesseract/bin/tesseract"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.ocr.y_coordinate_tolerance, 3.0);
        assert_eq!(config.document.backend, BackendKind::Raster);
        assert_eq!(config.ocr.language_mode(), LanguageMode::Eng);
        assert_eq!(config.ocr.tesseract.command, "/opt/tesseract/bin/tesseract");
        assert!(config.ocr.tesseract.tessdata_dir.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ocr]\nlanguage = \"auto\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.ocr.language_mode(), LanguageMode::Auto);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::from_file(Path::new("/nonexistent/selection_analyzer.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
