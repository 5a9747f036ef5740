use async_trait::async_trait;
use homegpt::{
    Error, Result,
    llm::{CompletionClient, CompletionRequest},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wiremock::{Request, Respond, ResponseTemplate};

/// Completion client that records every request and replies with a canned result
#[derive(Debug, Clone, Default)]
pub struct MockCompletionClient {
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub reply: Option<String>,
    pub parse_error: bool,
    pub models: Option<Vec<String>>,
}

impl MockCompletionClient {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_to_parse() -> Self {
        Self {
            parse_error: true,
            ..Self::default()
        }
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = Some(models.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn get_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);

        if self.parse_error {
            return Err(Error::unexpected_response("mock parse failure"));
        }

        self.reply
            .clone()
            .ok_or_else(|| Error::config("mock has no reply configured"))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        self.models
            .clone()
            .ok_or_else(|| Error::config("mock has no models configured"))
    }
}

/// Stub inference server behaviour: answers `{"response": "echo:<prompt>"}`
pub struct EchoResponder;

impl Respond for EchoResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return ResponseTemplate::new(400),
        };
        let prompt = body["prompt"].as_str().unwrap_or_default();

        ResponseTemplate::new(200).set_body_json(json!({
            "model": body["model"],
            "created_at": "2024-05-01T10:00:00Z",
            "response": format!("echo:{}", prompt),
            "done": true,
            "done_reason": "stop"
        }))
    }
}
