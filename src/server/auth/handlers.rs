use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use tracing::debug;

use crate::server::error::{ApiError, ApiResult};
use crate::server::extractors::ValidJson;

use super::dto::{CallbackQuery, CallbackResponse, LoginRequest, LoginResponse};
use super::store::PendingAuthorization;
use super::{exchange, pkce, AuthContext};

/// `POST /auth/login` — start a login attempt: mint a PKCE pair and state
/// token, park them in the transaction store, and hand back the provider
/// authorization URL for the browser to follow.
pub async fn login(
    State(ctx): State<AuthContext>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let pair = pkce::generate();
    let state = pkce::generate_state();

    let scopes = body
        .scopes
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| ctx.provider.default_scopes.clone());

    let record = PendingAuthorization {
        verifier: pair.verifier,
        challenge: pair.challenge.clone(),
        client_id: body.client_id.clone(),
        redirect_uri: body.redirect_uri.clone(),
        scopes: scopes.clone(),
    };
    ctx.store.insert(state.clone(), record).await;

    let auth_url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&token_access_type=offline&code_challenge={}&code_challenge_method=S256&state={}&scope={}",
        ctx.provider.authorize_url,
        urlencoding::encode(&body.client_id),
        urlencoding::encode(&body.redirect_uri),
        urlencoding::encode(&pair.challenge),
        urlencoding::encode(&state),
        urlencoding::encode(&scopes),
    );

    debug!(client_id = %body.client_id, "login transaction created");
    Ok(Json(LoginResponse { auth_url }))
}

/// `GET /auth/callback?code&state` — complete a login attempt. The state is
/// consumed before the exchange call goes out, so a replay cannot observe the
/// record and a slow provider cannot block other transactions.
pub async fn callback(
    State(ctx): State<AuthContext>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<CallbackResponse>> {
    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::InvalidCallback("Missing code parameter".to_string()))?;
    let state = query
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::InvalidCallback("Missing state parameter".to_string()))?;

    let pending = ctx
        .store
        .consume(state)
        .await
        .ok_or(ApiError::InvalidOrExpiredState)?;

    let token = exchange::exchange_code(&ctx.http, &ctx.provider.token_url, code, &pending).await?;

    Ok(Json(CallbackResponse {
        success: true,
        token,
        timestamp: Utc::now(),
    }))
}
