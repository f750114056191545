use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[garde(length(min = 1))]
    pub client_id: String,
    #[garde(length(min = 1))]
    pub redirect_uri: String,
    /// Falls back to the provider's minimal default scope when omitted.
    #[serde(default)]
    #[garde(skip)]
    pub scopes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub auth_url: String,
}

/// Both fields optional so a missing parameter reaches the handler's own
/// presence check instead of an opaque query rejection.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub success: bool,
    /// Provider token payload, passed through verbatim.
    pub token: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
