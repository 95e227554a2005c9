//! User administration API client.
//!
//! Performs the network IO behind the user commands. Every call needs the
//! bearer token; without one it fails with [`ApiError::Unauthorized`] before
//! touching the network.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use thiserror::Error;
use ustr::Ustr;

use crate::BusinessConfig;
use crate::http::{Client, RequestBuilder, Response};
use crate::users::model::{ApiEnvelope, Role, UpdatePasswordRequest, UpdateUserRequest, User};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No token in the session; never reached the network.
    #[error("Unauthorized: no session token")]
    Unauthorized,
    #[error("Network error: {0}")]
    Transport(String),
    /// The backend answered with `success: false` or a non-2xx status.
    #[error("Server rejected the request with status {status}")]
    Server {
        status: u16,
        message: Option<String>,
        field_errors: BTreeMap<String, String>,
    },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for a notification. Server messages are shown verbatim, anything
    /// else that is not an auth problem becomes `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthorized => "Unauthorized: please sign in again".to_owned(),
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Server { .. } | Self::Transport(_) | Self::Decode(_) => fallback.to_owned(),
        }
    }

    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Server { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Reply of a mutating call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acknowledged {
    pub message: Option<String>,
}

fn authorized(request: RequestBuilder, token: Option<&str>) -> ApiResult<RequestBuilder> {
    match token {
        Some(token) if !token.is_empty() => Ok(request.bearer_auth(token)),
        _ => Err(ApiError::Unauthorized),
    }
}

async fn send(request: RequestBuilder, what: &str) -> ApiResult<Response> {
    request.send().await.map_err(|e| {
        log::warn!("{what}: {e}");
        ApiError::Transport(e.message)
    })
}

/// Split a response into the envelope or a typed error.
fn open_envelope(response: &Response, what: &str) -> ApiResult<ApiEnvelope<serde_json::Value>> {
    let status = response.status;
    match response.json::<ApiEnvelope<serde_json::Value>>() {
        Ok(envelope) if response.is_success() && envelope.success => Ok(envelope),
        Ok(envelope) => Err(ApiError::Server {
            status,
            message: envelope.message,
            field_errors: envelope.errors.unwrap_or_default(),
        }),
        Err(_) if !response.is_success() => Err(ApiError::Server {
            status,
            message: None,
            field_errors: BTreeMap::new(),
        }),
        Err(e) => Err(ApiError::Decode(format!("Failed to parse {what}: {e}"))),
    }
}

fn decode_data<T: DeserializeOwned>(
    envelope: ApiEnvelope<serde_json::Value>,
    what: &str,
) -> ApiResult<T> {
    let data = envelope
        .data
        .ok_or_else(|| ApiError::Decode(format!("{what} response has no data")))?;
    serde_json::from_value(data).map_err(|e| ApiError::Decode(format!("Failed to parse {what}: {e}")))
}

/// GET `/role`
pub async fn list_roles(config: &BusinessConfig, token: Option<&str>) -> ApiResult<Vec<Role>> {
    let request = authorized(Client::get(config.endpoint("role")), token)?;
    let response = send(request, "list roles").await?;
    let envelope = open_envelope(&response, "roles")?;
    decode_data(envelope, "roles")
}

/// GET `/user`
pub async fn list_users(config: &BusinessConfig, token: Option<&str>) -> ApiResult<Vec<User>> {
    let request = authorized(Client::get(config.endpoint("user")), token)?;
    let response = send(request, "list users").await?;
    let envelope = open_envelope(&response, "users")?;
    decode_data(envelope, "users")
}

/// PUT `/user/{id}`
pub async fn update_user(
    config: &BusinessConfig,
    token: Option<&str>,
    id: Ustr,
    body: &UpdateUserRequest,
) -> ApiResult<Acknowledged> {
    let request = authorized(Client::put(config.endpoint(&format!("user/{id}"))), token)?
        .json(body)
        .map_err(|e| ApiError::Decode(format!("Failed to serialize request: {e}")))?;
    let response = send(request, "update user").await?;
    let envelope = open_envelope(&response, "update user")?;
    Ok(Acknowledged {
        message: envelope.message,
    })
}

/// PUT `/user/{id}/password`
pub async fn update_password(
    config: &BusinessConfig,
    token: Option<&str>,
    id: Ustr,
    body: &UpdatePasswordRequest,
) -> ApiResult<Acknowledged> {
    let request = authorized(
        Client::put(config.endpoint(&format!("user/{id}/password"))),
        token,
    )?
    .json(body)
    .map_err(|e| ApiError::Decode(format!("Failed to serialize request: {e}")))?;
    let response = send(request, "update password").await?;
    let envelope = open_envelope(&response, "update password")?;
    Ok(Acknowledged {
        message: envelope.message,
    })
}
