use axum::{extract::State, routing::get, Json, Router};

use super::auth::TransactionStore;

pub fn routes(store: TransactionStore) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(store)
}

async fn health(State(store): State<TransactionStore>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "pending": store.len().await,
    }))
}
