//! Text extraction from PDF bytes.
//!
//! The text layer is read directly first; scanned or structurally broken
//! documents fall back to rasterization plus per-page OCR. The fallback is
//! markedly slower and never runs when the direct path yields text.

use crate::config::OcrConfig;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use tracing::{info, warn};

pub mod direct;
pub mod ocr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Direct,
    Ocr,
}

/// Transient result of one extraction. Recomputed on every question;
/// nothing here is persisted.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub text: String,
    pub method: ExtractionMethod,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Best-effort plain text from PDF bytes. Fails with `Extraction` only
    /// when both the direct path and the OCR fallback fail.
    async fn extract(&self, bytes: &[u8]) -> AppResult<ExtractionResult>;
}

pub struct PdfExtractor {
    ocr: OcrConfig,
}

impl PdfExtractor {
    pub fn new(ocr: OcrConfig) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, bytes: &[u8]) -> AppResult<ExtractionResult> {
        match direct::extract(bytes).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(chars = text.len(), "extracted embedded text layer");
                return Ok(ExtractionResult {
                    text,
                    method: ExtractionMethod::Direct,
                });
            }
            Ok(_) => warn!("text layer is empty, falling back to OCR"),
            Err(e) => warn!(error = %e, "text layer extraction failed, falling back to OCR"),
        }

        let text = ocr::recognize(bytes, &self.ocr).await?;
        if text.trim().is_empty() {
            return Err(AppError::Extraction(
                "OCR recognized no text in any page".to_string(),
            ));
        }
        info!(chars = text.len(), "extracted text via OCR fallback");
        Ok(ExtractionResult {
            text,
            method: ExtractionMethod::Ocr,
        })
    }
}
