//! OCR fallback: rasterize every page, recognize each, join in page order.
//!
//! pdfium wraps a C++ library with thread-local state, and tesseract
//! recognition is CPU-heavy; both run via `spawn_blocking` so Tokio worker
//! threads never stall. Recognition fans out with bounded concurrency to
//! keep multi-page scans from serializing their seconds-per-page cost.

use crate::config::OcrConfig;
use crate::types::{AppError, AppResult};
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use pdfium_render::prelude::*;
use tesseract_rs::TesseractAPI;
use tracing::{debug, info, warn};

pub async fn recognize(bytes: &[u8], config: &OcrConfig) -> AppResult<String> {
    let pages = render_pages(bytes.to_vec(), config.max_rendered_pixels).await?;
    if pages.is_empty() {
        return Err(AppError::Extraction("document has no pages".to_string()));
    }
    info!(pages = pages.len(), "rasterized document for OCR");

    let recognized = stream::iter(pages.into_iter().map(|(index, image)| {
        let tessdata_dir = config.tessdata_dir.clone();
        let language = config.language.clone();
        async move {
            let result = tokio::task::spawn_blocking(move || {
                recognize_page(&image, &tessdata_dir, &language)
            })
            .await
            .map_err(|e| AppError::Internal(format!("OCR task panicked: {}", e)))?;
            match result {
                Ok(text) => {
                    debug!(page = index + 1, chars = text.len(), "page recognized");
                    Ok((index, text))
                }
                Err(e) => {
                    warn!(page = index + 1, error = %e, "page recognition failed");
                    Err(e)
                }
            }
        }
    }))
    .buffer_unordered(config.concurrency)
    .collect::<Vec<AppResult<(usize, String)>>>()
    .await
    .into_iter()
    .collect::<AppResult<Vec<(usize, String)>>>()?;

    Ok(join_in_page_order(recognized))
}

/// Recognition completes out of order under the fan-out; the join restores
/// document order, one newline between pages.
fn join_in_page_order(mut pages: Vec<(usize, String)>) -> String {
    pages.sort_by_key(|(index, _)| *index);
    pages
        .into_iter()
        .map(|(_, text)| text.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn render_pages(bytes: Vec<u8>, max_pixels: u32) -> AppResult<Vec<(usize, DynamicImage)>> {
    tokio::task::spawn_blocking(move || render_pages_blocking(&bytes, max_pixels))
        .await
        .map_err(|e| AppError::Internal(format!("render task panicked: {}", e)))?
}

fn render_pages_blocking(bytes: &[u8], max_pixels: u32) -> AppResult<Vec<(usize, DynamicImage)>> {
    let bindings = Pdfium::bind_to_system_library()
        .map_err(|e| AppError::Extraction(format!("pdfium unavailable: {:?}", e)))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| AppError::Extraction(format!("pdfium failed to load PDF: {:?}", e)))?;

    // Page sizes vary wildly; capping the longest rendered edge keeps
    // memory bounded regardless of the physical page size.
    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut images = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            AppError::Extraction(format!("rasterization failed for page {}: {:?}", index + 1, e))
        })?;
        images.push((index, bitmap.as_image()));
    }
    Ok(images)
}

fn recognize_page(image: &DynamicImage, tessdata_dir: &str, language: &str) -> AppResult<String> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let api = TesseractAPI::new();
    api.init(tessdata_dir, language)
        .map_err(|e| AppError::Extraction(format!("tesseract init: {}", e)))?;
    api.set_image(
        rgb.as_raw(),
        width as i32,
        height as i32,
        3,
        (width * 3) as i32,
    )
    .map_err(|e| AppError::Extraction(format!("tesseract set_image: {}", e)))?;

    api.get_utf8_text()
        .map_err(|e| AppError::Extraction(format!("tesseract recognition: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_restores_page_order() {
        let pages = vec![
            (2, "third".to_string()),
            (0, "first\n".to_string()),
            (1, "second".to_string()),
        ];
        assert_eq!(join_in_page_order(pages), "first\nsecond\nthird");
    }

    #[test]
    fn test_join_single_page() {
        assert_eq!(join_in_page_order(vec![(0, "only ".to_string())]), "only");
    }
}
