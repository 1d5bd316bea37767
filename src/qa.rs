//! Answer generation.
//!
//! One combined prompt per question: the extracted document text as
//! context plus the literal question. The model decides whether the input
//! is a document question or plain conversation; there is no local intent
//! classification.

use crate::config::LLMConfig;
use crate::llm::provider::{LLMAdapter, LLMRequest};
use crate::types::{AppError, AppResult};
use std::sync::Arc;
use tracing::info;

const SYSTEM_INSTRUCTION: &str = "You are an assistant answering questions about an uploaded PDF \
document. Ground your answers in the document content provided. If the user sends a greeting, \
thanks, a farewell, or other general conversation unrelated to the document, reply \
conversationally and appropriately instead of pointing at the document.";

pub struct AnswerGenerator {
    adapter: Arc<dyn LLMAdapter>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(adapter: Arc<dyn LLMAdapter>, config: &LLMConfig) -> Self {
        Self {
            adapter,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn compose_prompt(document_text: &str, question: &str) -> String {
        format!(
            "Document content:\n\n{}\n\nQuestion: {}",
            document_text, question
        )
    }

    /// Generate an answer grounded in `document_text`.
    ///
    /// The document text goes to the backend whole; an oversized-input
    /// rejection surfaces as a `Generation` fault like any other backend
    /// error.
    pub async fn answer(&self, document_text: &str, question: &str) -> AppResult<String> {
        info!(
            document_chars = document_text.len(),
            question_chars = question.len(),
            model = %self.model,
            "generating answer"
        );

        let request = LLMRequest {
            model: self.model.clone(),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            prompt: Self::compose_prompt(document_text, question),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        };

        let response = self.adapter.create_chat_completion(&request).await?;
        if response.content.trim().is_empty() {
            return Err(AppError::Generation(
                "backend returned no content".to_string(),
            ));
        }
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LLMResponse;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct CannedAdapter {
        reply: String,
    }

    #[async_trait]
    impl LLMAdapter for CannedAdapter {
        async fn create_chat_completion(&self, _request: &LLMRequest) -> AppResult<LLMResponse> {
            Ok(LLMResponse {
                content: self.reply.clone(),
                finish_reason: "stop".to_string(),
            })
        }
    }

    fn generator(reply: &str) -> AnswerGenerator {
        let config = LLMConfig {
            provider: "openai".to_string(),
            model: "test-model".to_string(),
            openai_api_key: "k".to_string(),
            google_api_key: String::new(),
            max_tokens: 256,
            temperature: 0.2,
        };
        AnswerGenerator::new(Arc::new(CannedAdapter { reply: reply.to_string() }), &config)
    }

    #[test]
    fn test_prompt_carries_document_and_question() {
        let prompt = AnswerGenerator::compose_prompt("Invoice Total: $42", "What is the total?");
        assert!(prompt.contains("Invoice Total: $42"));
        assert!(prompt.contains("Question: What is the total?"));
    }

    #[test]
    fn test_system_instruction_allows_chit_chat() {
        assert!(SYSTEM_INSTRUCTION.contains("greeting"));
        assert!(SYSTEM_INSTRUCTION.contains("conversation"));
    }

    #[tokio::test]
    async fn test_answer_passes_backend_reply_through() {
        let answer = generator("The total is $42.")
            .answer("Invoice Total: $42", "What is the total?")
            .await
            .unwrap();
        assert_eq!(answer, "The total is $42.");
    }

    #[tokio::test]
    async fn test_empty_backend_reply_is_a_generation_fault() {
        let err = generator("   ")
            .answer("doc", "question")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
