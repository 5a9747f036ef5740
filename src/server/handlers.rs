use crate::{
    Error,
    config::InferenceConfig,
    llm::{CompletionClient, CompletionRequest, ask_prompt},
};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SINGLE_CHAT_ACK: &str = "GET single chat endpoint";

#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<InferenceConfig>,
    pub client: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(inference: InferenceConfig, client: impl CompletionClient + 'static) -> Self {
        Self {
            inference: Arc::new(inference),
            client: Arc::new(client),
        }
    }

    /// Builds the outbound payload for one prompt from the configured defaults.
    pub fn completion_request(&self, prompt: impl Into<String>) -> CompletionRequest {
        CompletionRequest::new(self.inference.model_or_default(), prompt)
            .with_temperature(self.inference.temperature)
            .with_max_tokens(self.inference.max_tokens)
            .with_stop(self.inference.stop.clone())
    }
}

/// Failures surfaced to chat callers. Bodies stay generic.
#[derive(Debug)]
pub enum ChatError {
    Request(Error),
    Parse(Error),
}

impl From<Error> for ChatError {
    fn from(err: Error) -> Self {
        if err.is_parse_failure() {
            Self::Parse(err)
        } else {
            Self::Request(err)
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Request(_) => "Error sending request",
            Self::Parse(_) => "Error parsing response",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

pub async fn get_single_chat() -> &'static str {
    SINGLE_CHAT_ACK
}

/// Forwards the raw request body as the prompt and replies with the generated text.
pub async fn post_single_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ChatError> {
    let prompt = String::from_utf8_lossy(&body).into_owned();
    info!("Received single chat request ({} bytes)", prompt.len());

    let request = state.completion_request(prompt);

    match state.client.complete(request).await {
        Ok(text) => {
            info!("Single chat completed ({} bytes)", text.len());
            Ok(text)
        }
        Err(e) => {
            error!("Single chat failed: {}", e);
            Err(e.into())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub available_models: Vec<String>,
}

/// Reports whether the inference server answers its model listing. Always 200;
/// reachability is carried in `status`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, available_models) = match state.client.list_models().await {
        Ok(models) => ("healthy", models),
        Err(e) => {
            warn!("Inference server health check failed: {}", e);
            ("unavailable", Vec::new())
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        model: state.inference.model_or_default().to_string(),
        available_models,
    })
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub message: String,
    pub question: String,
}

/// Answers a question, optionally grounded in caller-supplied context.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ChatError> {
    info!("Received ask request (context: {})", request.context.is_some());

    let prompt = ask_prompt(&request.question, request.context.as_deref());
    let message = state
        .client
        .complete(state.completion_request(prompt))
        .await
        .map_err(|e| {
            error!("Ask failed: {}", e);
            ChatError::from(e)
        })?;

    Ok(Json(AskResponse {
        message,
        question: request.question,
    }))
}

pub async fn session() -> &'static str {
    "Session endpoint"
}

pub async fn question() -> &'static str {
    "Question endpoint"
}

pub async fn answer() -> &'static str {
    "Answer endpoint"
}
