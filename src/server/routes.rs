use super::handlers::{self, AppState};
use axum::{
    Router,
    routing::{get, post},
};

/// Top-level registrar: mounts every endpoint group on `router`.
pub fn register_routes(router: Router<AppState>) -> Router<AppState> {
    let router = router
        .route("/session", get(handlers::session))
        .route("/question", get(handlers::question))
        .route("/answer", get(handlers::answer))
        .route("/health", get(handlers::health))
        .route("/ask", post(handlers::ask));

    register_single_chat_routes(router)
}

/// Mounts `GET /single-chat` and `POST /single-chat`.
///
/// Calling this twice on the same router panics inside axum on the
/// overlapping route.
pub fn register_single_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/single-chat",
        get(handlers::get_single_chat).post(handlers::post_single_chat),
    )
}
