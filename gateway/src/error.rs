use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

use crate::{analytics, panel};

/// why a request to the gateway failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read request body")]
    ReadBody(#[source] BytesRejection),
    #[error("invalid JSON format")]
    InvalidJson(#[source] serde_json::Error),
    #[error("invalid base url")]
    InvalidUrl(#[source] ParseError),
    #[error("failed to get server stats")]
    Panel(#[from] panel::Error),
    #[error("failed to get analytics stats")]
    Analytics(#[from] analytics::Error),
}

/// the body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ReadBody(_) | Self::InvalidJson(_) | Self::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Panel(_) | Self::Analytics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// every cause of this error, outermost first.
    pub fn details(&self) -> String {
        let mut causes = Vec::new();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        causes.join(": ")
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        tracing::warn!("{}: {}", body.error, body.details);

        (self.status(), Json(body)).into_response()
    }
}
