//! Web layer error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use farmx_core::AdvisorError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Configuration file {0} not found")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Form validation failures. The messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Please fill in all fields.")]
    MissingFields,

    #[error("Please fill in all fields for both crops.")]
    MissingComparisonFields,

    #[error("{label} must be a number.")]
    NotANumber { label: &'static str },

    #[error("{label} must be {bounds}.")]
    OutOfRange { label: &'static str, bounds: String },

    #[error("Invalid crop selection.")]
    InvalidCrop,
}

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// A failed submission: either the input or the inference was rejected.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Error in prediction: {0}")]
    Prediction(#[from] AdvisorError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::Form(_) => StatusCode::BAD_REQUEST,
            SubmitError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// JSON error body for the API routes
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        Self::new(err.status(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}
