//! Response envelope shared by every endpoint.
//!
//! Success bodies are `{ "success": true, "data": ..., "message"?: ... }` and
//! failure bodies are `{ "success": false, "message": ..., "errors"?: [...] }`.
//! Handlers return [`ApiResponse`] for the former; [`crate::AppError`] renders
//! the latter. [`ApiEnvelope`] decodes either shape into a tagged value so a
//! consumer never has to check for fields by hand.

use std::fmt;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A decoded response body, tagged on the `success` flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiEnvelope<T> {
    Ok {
        data: T,
        message: Option<String>,
    },
    Err {
        message: String,
        errors: Vec<String>,
    },
}

/// Failure half of an [`ApiEnvelope`], as a standalone error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeError {
    pub message: String,
    pub errors: Vec<String>,
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.errors.join("; "))
        }
    }
}

impl std::error::Error for EnvelopeError {}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn into_result(self) -> Result<T, EnvelopeError> {
        match self {
            Self::Ok { data, .. } => Ok(data),
            Self::Err { message, errors } => Err(EnvelopeError { message, errors }),
        }
    }
}

#[derive(Deserialize)]
struct RawEnvelope<U> {
    success: bool,
    data: Option<U>,
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

impl<'de, T> Deserialize<'de> for ApiEnvelope<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;

        if raw.success {
            let data = raw
                .data
                .ok_or_else(|| serde::de::Error::missing_field("data"))?;
            Ok(Self::Ok {
                data,
                message: raw.message,
            })
        } else {
            Ok(Self::Err {
                message: raw.message.unwrap_or_default(),
                errors: raw.errors.unwrap_or_default(),
            })
        }
    }
}
