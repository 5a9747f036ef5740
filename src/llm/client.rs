use super::types::*;
use crate::{
    Error, Result,
    config::{InferenceConfig, Provider},
    rest::RestBridge,
};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Runs one prompt-to-text generation and returns the answer text.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Names of the models the inference server can run. Any error means the
    /// server is unreachable or not speaking the expected protocol.
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Completion client that talks to the configured inference server over HTTP.
pub struct InferenceClient {
    bridge: RestBridge,
    endpoint: String,
    models_endpoint: String,
    provider: Provider,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        Ok(Self {
            bridge: RestBridge::with_timeout(config.timeout())?,
            endpoint: config.endpoint(),
            models_endpoint: config.models_endpoint(),
            provider: config.provider,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for InferenceClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        debug!(
            "Requesting completion from {} with model {}",
            self.endpoint, request.model
        );

        let body = self.bridge.send_post_request(&self.endpoint, &request).await?;

        extract_text(self.provider, &body)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let body = self.bridge.send_get_request(&self.models_endpoint).await?;

        extract_model_names(self.provider, &body)
    }
}

/// Pulls the generated text out of a raw reply body in the provider's shape.
pub fn extract_text(provider: Provider, body: &[u8]) -> Result<String> {
    match provider {
        Provider::Ollama => {
            let response: CompletionResponse = serde_json::from_slice(body)?;
            Ok(response.response)
        }
        Provider::OpenAi => {
            let response: OpenAiCompletionResponse = serde_json::from_slice(body)?;
            response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.text)
                .ok_or_else(|| Error::unexpected_response("completion reply has no choices"))
        }
    }
}

/// Pulls model names out of a model-listing reply in the provider's shape.
pub fn extract_model_names(provider: Provider, body: &[u8]) -> Result<Vec<String>> {
    let names = match provider {
        Provider::Ollama => {
            let tags: OllamaTagsResponse = serde_json::from_slice(body)?;
            tags.models
                .unwrap_or_default()
                .into_iter()
                .map(|m| m.name)
                .collect()
        }
        Provider::OpenAi => {
            let models: OpenAiModelsResponse = serde_json::from_slice(body)?;
            models.data.into_iter().map(|m| m.id).collect()
        }
    };
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test_config(provider: Provider) -> InferenceConfig {
        let mut config = Config::from_lookup(|_| None).unwrap().inference;
        config.provider = provider;
        config.base_url = "http://localhost:11434/api".to_string();
        config
    }

    #[test]
    fn test_client_resolves_endpoint() {
        let client = InferenceClient::new(&test_config(Provider::Ollama)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/api/generate");

        let client = InferenceClient::new(&test_config(Provider::OpenAi)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434/api/completions");
    }

    #[test]
    fn test_extract_text_ollama() {
        let body = json!({"response": "echo:hi", "done": true}).to_string();
        assert_eq!(extract_text(Provider::Ollama, body.as_bytes()).unwrap(), "echo:hi");
    }

    #[test]
    fn test_extract_text_ignores_null_metadata() {
        let body = br#"{"response":"hi","done_reason":null,"context":null}"#;
        assert_eq!(extract_text(Provider::Ollama, body).unwrap(), "hi");

        let body = br#"{"id":null,"created":null,"choices":[{"text":"hi","index":null}]}"#;
        assert_eq!(extract_text(Provider::OpenAi, body).unwrap(), "hi");
    }

    #[test]
    fn test_extract_text_openai() {
        let body = json!({"choices": [{"text": "first"}, {"text": "second"}]}).to_string();
        assert_eq!(extract_text(Provider::OpenAi, body.as_bytes()).unwrap(), "first");
    }

    #[test]
    fn test_extract_text_openai_without_choices() {
        let body = json!({"choices": []}).to_string();
        let err = extract_text(Provider::OpenAi, body.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[test]
    fn test_extract_model_names() {
        let body = json!({"models": [{"name": "mistral:latest", "size": 1}, {"name": "llama3"}]});
        assert_eq!(
            extract_model_names(Provider::Ollama, body.to_string().as_bytes()).unwrap(),
            vec!["mistral:latest", "llama3"]
        );

        let body = json!({"models": null});
        assert!(extract_model_names(Provider::Ollama, body.to_string().as_bytes())
            .unwrap()
            .is_empty());

        let body = json!({"object": "list", "data": [{"id": "mistral-7b", "object": "model"}]});
        assert_eq!(
            extract_model_names(Provider::OpenAi, body.to_string().as_bytes()).unwrap(),
            vec!["mistral-7b"]
        );
    }

    #[test]
    fn test_extract_text_rejects_non_json() {
        let err = extract_text(Provider::Ollama, b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
