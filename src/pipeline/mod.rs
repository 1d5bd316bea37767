//! Pipeline orchestrator.
//!
//! Upload path: blob store → metadata store. Question path: metadata →
//! blob retrieval → extraction → generation, strictly in that order. The
//! collaborators are injected as capabilities so backends can be swapped
//! and the orchestrator tested against fakes.

use crate::db::MetadataStore;
use crate::extract::TextExtractor;
use crate::models::Document;
use crate::qa::AnswerGenerator;
use crate::storage::BlobStore;
use crate::types::{AppError, AppResult};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub struct Pipeline {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
    extractor: Arc<dyn TextExtractor>,
    generator: AnswerGenerator,
}

impl Pipeline {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        metadata: Arc<dyn MetadataStore>,
        extractor: Arc<dyn TextExtractor>,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            blobs,
            metadata,
            extractor,
            generator,
        }
    }

    /// Upload path: store the blob, then persist metadata. Metadata is
    /// only created after storage succeeds, so a failed upload leaves no
    /// visible document. A stored blob whose metadata insert fails stays
    /// in place and is logged as orphaned; cleanup is out of scope.
    pub async fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> AppResult<Document> {
        let uploaded_at = chrono::Utc::now();
        let blob = self.blobs.store(bytes, content_type, filename).await?;
        info!(path = %blob.path, size = blob.size, "blob stored");

        match self
            .metadata
            .create(&blob.path, filename, uploaded_at, &blob.public_url)
            .await
        {
            Ok(document) => {
                info!(document_id = %document.id, filename = %document.filename, "document uploaded");
                Ok(document)
            }
            Err(e) => {
                error!(path = %blob.path, error = %e, "metadata persistence failed, blob orphaned");
                Err(e)
            }
        }
    }

    /// Resolve a document and fetch its raw bytes.
    pub async fn fetch_document(&self, document_id: Uuid) -> AppResult<(Document, Vec<u8>)> {
        let document = self
            .metadata
            .get_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("document {}", document_id)))?;
        let bytes = self.blobs.retrieve(&document.storage_path).await?;
        Ok((document, bytes))
    }

    /// Question path. An unknown id is terminal and skips extraction and
    /// generation entirely; the document text is re-extracted on every
    /// question.
    pub async fn answer_question(&self, document_id: Uuid, question: &str) -> AppResult<String> {
        let (document, bytes) = self.fetch_document(document_id).await?;

        let extraction = self.extractor.extract(&bytes).await?;
        info!(
            document_id = %document.id,
            method = ?extraction.method,
            chars = extraction.text.len(),
            "document text extracted"
        );

        self.generator.answer(&extraction.text, question).await
    }
}
