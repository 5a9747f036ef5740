use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use homegpt::{
    config::{Config, InferenceConfig, Provider},
    llm::InferenceClient,
    server::{build_app, handlers::AppState},
};
use tower::ServiceExt; // for `oneshot`

/// Inference config pointing at `base_url` with everything else defaulted
pub fn inference_config(base_url: &str) -> InferenceConfig {
    let mut config = Config::from_lookup(|_| None).unwrap().inference;
    config.base_url = base_url.to_string();
    config
}

pub fn openai_config(base_url: &str) -> InferenceConfig {
    let mut config = inference_config(base_url);
    config.provider = Provider::OpenAi;
    config
}

/// Full application wired to a real HTTP inference client
pub fn create_test_app(config: InferenceConfig) -> Router {
    let client = InferenceClient::new(&config).unwrap();
    build_app(AppState::new(config, client))
}

/// Base URL of a port nothing is listening on
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}

pub async fn post_chat(app: Router, message: &str) -> (StatusCode, String) {
    post_chat_bytes(app, message.as_bytes().to_vec()).await
}

pub async fn post_chat_bytes(app: Router, body: Vec<u8>) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/single-chat")
        .header("content-type", "text/plain")
        .body(Body::from(body))
        .unwrap();

    send(app, request).await
}

pub async fn get_chat(app: Router) -> (StatusCode, String) {
    get_path(app, "/single-chat").await
}

pub async fn get_path(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
