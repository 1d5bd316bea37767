//! Direct extraction of a PDF's embedded text layer.

use crate::types::{AppError, AppResult};
use lopdf::Document;
use tracing::debug;

/// Parse the document and pull the text layer page by page, in page order.
///
/// lopdf parsing is CPU-bound, so the work runs on the blocking pool.
pub async fn extract(bytes: &[u8]) -> AppResult<String> {
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || extract_blocking(&bytes))
        .await
        .map_err(|e| AppError::Internal(format!("extraction task panicked: {}", e)))?
}

fn extract_blocking(bytes: &[u8]) -> AppResult<String> {
    let document = Document::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("failed to parse PDF: {}", e)))?;

    if document.is_encrypted() {
        return Err(AppError::Extraction("PDF is encrypted".to_string()));
    }

    let mut pages_text = Vec::new();
    for (number, _) in document.get_pages() {
        match document.extract_text(&[number]) {
            Ok(text) => pages_text.push(text),
            Err(e) => {
                // A page without a text layer is not fatal here; an empty
                // overall result sends the caller down the OCR path.
                debug!(page = number, error = %e, "no extractable text on page");
            }
        }
    }

    Ok(pages_text.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn pdf_with_text(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[tokio::test]
    async fn test_extracts_text_layer() {
        let bytes = pdf_with_text("Invoice Total: $42");
        let text = extract(&bytes).await.unwrap();
        assert!(text.contains("Invoice Total: $42"), "got: {:?}", text);
    }

    #[tokio::test]
    async fn test_rejects_malformed_bytes() {
        let err = extract(b"this is not a pdf").await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
