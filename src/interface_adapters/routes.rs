use crate::interface_adapters::handlers::generate_tokens;
use crate::interface_adapters::state::AppState;
use axum::{routing::post, Router};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/qr/tokens", post(generate_tokens))
        .with_state(state)
}
