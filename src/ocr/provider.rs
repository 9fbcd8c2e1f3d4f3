//! OCR Engines
//!
//! Defines the engine trait and the Tesseract command-line implementation.
//! Engines are synchronous; the analysis pipeline already runs on a blocking
//! thread.

use std::path::PathBuf;
use std::process::Command;

use image::DynamicImage;
use once_cell::sync::OnceCell;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::types::{OcrError, OcrFlags};

/// OCR engine trait
pub trait OcrEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Check if the engine can be invoked
    fn is_available(&self) -> bool;

    /// Recognize text in `image` with one language pack and flag set
    fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        flags: &OcrFlags,
    ) -> Result<String, OcrError>;
}

/// Write `image` to a fresh PNG that is removed when the handle drops
///
/// The file is created exclusively with owner-only permissions.
fn temp_png(image: &DynamicImage) -> Result<NamedTempFile, OcrError> {
    let file = tempfile::Builder::new()
        .prefix("ocr_input_")
        .suffix(".png")
        .tempfile()
        .map_err(|e| OcrError::ProcessingError(format!("Failed to create temp file: {}", e)))?;
    image
        .save_with_format(file.path(), image::ImageFormat::Png)
        .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;
    Ok(file)
}

/// Tesseract driven through its command-line interface
pub struct TesseractCli {
    command: String,
    tessdata_dir: Option<PathBuf>,
    available: OnceCell<bool>,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>, tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            command: command.into(),
            tessdata_dir,
            available: OnceCell::new(),
        }
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.command);
        if let Some(dir) = &self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract", None)
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let found = Command::new(&self.command)
                .arg("--version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false);
            if !found {
                warn!(command = %self.command, "Tesseract not found");
            }
            found
        })
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        language: &str,
        flags: &OcrFlags,
    ) -> Result<String, OcrError> {
        if !self.is_available() {
            return Err(OcrError::EngineNotAvailable(self.command.clone()));
        }

        let input = temp_png(image)?;

        let output = self
            .base_command()
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .args(flags.to_args())
            .output()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(language, flags = %flags, chars = text.chars().count(), "Tesseract finished");
        Ok(text)
    }
}
