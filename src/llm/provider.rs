use crate::config::LLMConfig;
use crate::types::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
}

#[async_trait]
pub trait LLMAdapter: Send + Sync + std::fmt::Debug {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Build the adapter named by the configuration.
pub fn adapter_from_config(config: &LLMConfig) -> AppResult<Arc<dyn LLMAdapter>> {
    let api_key = config.active_api_key().ok_or_else(|| {
        AppError::Generation(format!(
            "no API key configured for provider '{}'",
            config.provider
        ))
    })?;

    let adapter: Arc<dyn LLMAdapter> = match config.provider.as_str() {
        "openai" => Arc::new(crate::llm::openai::OpenAIAdapter::new(&api_key)),
        "google" => Arc::new(crate::llm::google::GoogleAdapter::new(&api_key)),
        other => {
            return Err(AppError::Generation(format!(
                "unsupported provider: {}",
                other
            )))
        }
    };
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str, key: &str) -> LLMConfig {
        LLMConfig {
            provider: provider.to_string(),
            model: "test-model".to_string(),
            openai_api_key: key.to_string(),
            google_api_key: key.to_string(),
            max_tokens: 256,
            temperature: 0.2,
        }
    }

    #[test]
    fn test_unsupported_provider_is_rejected() {
        let err = adapter_from_config(&config("ollama", "k")).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let err = adapter_from_config(&config("openai", "")).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn test_known_providers_construct() {
        assert!(adapter_from_config(&config("openai", "k")).is_ok());
        assert!(adapter_from_config(&config("google", "k")).is_ok());
    }
}
