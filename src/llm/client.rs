use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::llm::{
    TextService,
    errors::ServiceError,
    types::{ChatMessage, ChatRequest, ChatResponse, CompletionRequest},
};

/// Keep error bodies in logs short.
const MAX_ERROR_BODY: usize = 300;

/// [`TextService`] backed by an OpenAI-compatible `/chat/completions` API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: &Url,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        let endpoint = format!("{}/chat/completions", base_url.as_str().trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint).map_err(|e| ServiceError::Client(e.to_string()))?;

        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::new(config.llm_api_url(), config.llm_api_key(), config.llm_model())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, ServiceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_output_units,
            temperature: request.temperature,
        };

        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(ServiceError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(ServiceError::from_reqwest_error)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Malformed("no choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::Empty);
        }
        Ok(content.to_string())
    }
}

#[async_trait]
impl TextService for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.model, max_tokens = request.max_output_units))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError> {
        let text = tokio::time::timeout(request.timeout, self.send(&request))
            .await
            .map_err(|_| ServiceError::Timeout)??;

        debug!("Completion returned {} chars", text.chars().count());
        Ok(text)
    }
}
