//! Token response normalization.
//!
//! The backend has answered auth calls in several shapes over time. Two
//! spellings of the token fields are accepted:
//!
//! - `{"accessToken": "...", "refreshToken": "..."}`
//! - `{"access_token": "...", "refresh_token": "..."}`
//!
//! Either may also arrive wrapped as `{"data": {...}}`, or with the tokens
//! grouped under a `tokens` object.

use serde_json::Value;

/// Access/refresh pair extracted from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    /// `None` when the backend did not rotate the refresh token.
    pub refresh_token: Option<String>,
}

/// Strip a `{"data": {...}}` envelope if present.
pub(crate) fn unwrap_data(value: &Value) -> &Value {
    match value.get("data") {
        Some(inner) if inner.is_object() || inner.is_array() => inner,
        _ => value,
    }
}

fn string_field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| value.get(*name).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

/// Extract a token pair from any accepted response shape.
pub fn normalize_tokens(body: &Value) -> Option<TokenPair> {
    let body = unwrap_data(body);
    let holder = match body.get("tokens") {
        Some(tokens) if tokens.is_object() => tokens,
        _ => body,
    };

    let access_token = string_field(holder, &["accessToken", "access_token"])?;
    let refresh_token = string_field(holder, &["refreshToken", "refresh_token"]);

    Some(TokenPair {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
    })
}
