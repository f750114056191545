//! Server-to-server authorization-code exchange against the provider.

use crate::server::error::ApiError;

use super::store::PendingAuthorization;

/// Trade an authorization code for the provider's token payload. PKCE stands
/// in for the client secret, so an empty `client_secret` is sent by design of
/// the provider contract. Never retried: authorization codes are single-use,
/// a second attempt would fail at the provider anyway.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    code: &str,
    pending: &PendingAuthorization,
) -> Result<serde_json::Value, ApiError> {
    let token_res = http
        .post(token_url)
        .json(&serde_json::json!({
            "grant_type": "authorization_code",
            "code": code,
            "redirect_uri": pending.redirect_uri,
            "client_id": pending.client_id,
            "client_secret": "",
            "code_verifier": pending.verifier,
        }))
        .send()
        .await;

    match token_res {
        Ok(res) if res.status().is_success() => res
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::ExchangeFailed(format!("Malformed token response: {e}"))),
        Ok(res) => {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::ExchangeFailed(describe_rejection(status, &body)))
        }
        Err(e) => Err(ApiError::ExchangeFailed(format!(
            "Could not reach token endpoint: {e}"
        ))),
    }
}

/// Prefer the provider's own error description when the body carries one.
fn describe_rejection(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("error"))
                .and_then(|e| e.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string());
    format!("Token exchange failed ({status}): {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn rejection_prefers_error_description() {
        let msg = describe_rejection(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"code expired"}"#,
        );
        assert!(msg.contains("code expired"));
    }

    #[test]
    fn rejection_falls_back_to_error_field() {
        let msg = describe_rejection(StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#);
        assert!(msg.contains("invalid_grant"));
    }

    #[test]
    fn rejection_falls_back_to_raw_body() {
        let msg = describe_rejection(StatusCode::BAD_GATEWAY, "upstream on fire");
        assert!(msg.contains("upstream on fire"));
        assert!(msg.contains("502"));
    }
}
