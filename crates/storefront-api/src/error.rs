// File: storefront-api/src/error.rs
// Purpose: API error type and its JSON error document

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use storefront_dal::{SearchError, WriteError, WriteException};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Header \"sw-access-key\" is required.")]
    MissingAccessKey,

    #[error("Access key is invalid and could not be identified.")]
    InvalidAccessKey,

    #[error("Provided language {language_id} is not in list of available languages.")]
    LanguageNotAvailable { language_id: String },

    #[error("The request body could not be decoded: {0}")]
    InvalidRequestBody(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Write(#[from] WriteException),
}

/// One entry of the `errors` array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub status: String,
    pub code: String,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ErrorMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSource {
    pub pointer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorMeta {
    pub parameters: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ErrorBody {
    errors: Vec<ErrorEntry>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAccessKey | ApiError::InvalidAccessKey => StatusCode::UNAUTHORIZED,
            ApiError::LanguageNotAvailable { .. } => StatusCode::PRECONDITION_FAILED,
            ApiError::InvalidRequestBody(_) | ApiError::Search(_) | ApiError::Write(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingAccessKey => "API_MISSING_ACCESS_KEY",
            ApiError::InvalidAccessKey => "API_INVALID_ACCESS_KEY",
            ApiError::LanguageNotAvailable { .. } => "SALES_CHANNEL_LANGUAGE_NOT_AVAILABLE",
            ApiError::InvalidRequestBody(_) => "INVALID_REQUEST_BODY",
            ApiError::Search(err) => err.code(),
            ApiError::Write(_) => "DAL__WRITE_EXCEPTION",
        }
    }

    /// Entries of the error document
    pub fn entries(&self) -> Vec<ErrorEntry> {
        let status = self.status();
        match self {
            ApiError::Write(exception) => exception
                .errors()
                .iter()
                .flat_map(|err| write_entries(status, err))
                .collect(),
            ApiError::Search(err) => {
                vec![entry(status, err.code(), err.to_string(), Some(err.pointer()))]
            }
            other => vec![entry(status, other.code(), other.to_string(), None)],
        }
    }
}

fn entry(status: StatusCode, code: &str, detail: String, pointer: Option<&str>) -> ErrorEntry {
    ErrorEntry {
        status: status.as_u16().to_string(),
        code: code.to_string(),
        title: status.canonical_reason().unwrap_or_default().to_string(),
        detail,
        source: pointer.map(|pointer| ErrorSource {
            pointer: pointer.to_string(),
        }),
        meta: None,
    }
}

/// One entry per violation for invalid fields, one per error otherwise
fn write_entries(status: StatusCode, err: &WriteError) -> Vec<ErrorEntry> {
    let WriteError::InvalidField(invalid) = err else {
        return vec![entry(status, err.code(), err.to_string(), Some(err.path()))];
    };

    invalid
        .violations
        .iter()
        .map(|violation| {
            let code = violation.code().unwrap_or(err.code());
            let mut entry = entry(status, code, violation.message().to_string(), Some(&invalid.path));
            if !violation.parameters().is_empty() {
                entry.meta = Some(ErrorMeta {
                    parameters: violation.parameters().clone(),
                });
            }
            entry
        })
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        debug!(status = status.as_u16(), code = self.code(), "request rejected");

        let body = Json(ErrorBody {
            errors: self.entries(),
        });
        (status, body).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidRequestBody(err.to_string())
    }
}
