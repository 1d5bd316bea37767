use crate::llm::provider::{LLMAdapter, LLMRequest, LLMResponse};
use crate::types::{AppError, AppResult};
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

#[derive(Debug)]
pub struct OpenAIAdapter {
    client: Client<OpenAIConfig>,
}

impl OpenAIAdapter {
    pub fn new(api_key: &str) -> Self {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
        Self { client }
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();
        if let Some(system) = &request.system_instruction {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.as_str())
                    .build()
                    .map_err(|e| AppError::Generation(e.to_string()))?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()
                .map_err(|e| AppError::Generation(e.to_string()))?
                .into(),
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&request.model).messages(messages);
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            args.temperature(temperature);
        }
        let body = args
            .build()
            .map_err(|e| AppError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(body)
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Generation("response contained no choices".to_string()))?;

        let finish_reason = choice
            .finish_reason
            .map(|reason| format!("{:?}", reason).to_lowercase())
            .unwrap_or_else(|| "stop".to_string());

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason,
        })
    }
}
