pub mod dto;
pub mod exchange;
pub mod handlers;
pub mod pkce;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::config::ProviderConfig;

pub use store::{PendingAuthorization, TransactionStore};

/// Everything the two flow handlers share: the transaction store, the
/// provider endpoints, and one pooled HTTP client for code exchange.
#[derive(Clone)]
pub struct AuthContext {
    pub store: TransactionStore,
    pub provider: Arc<ProviderConfig>,
    pub http: reqwest::Client,
}

pub fn routes(ctx: AuthContext) -> Router {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/callback", get(handlers::callback))
        .with_state(ctx)
}
