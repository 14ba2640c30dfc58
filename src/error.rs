use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use log::error;
use thiserror::Error;

/// Everything that can go wrong inside one update cycle.
///
/// Each variant knows the HTTP status it maps to; the `Display` text is the
/// plain-text body the DDNS client receives. Handlers return
/// `Result<_, GatewayError>` so every failure funnels through the single
/// [`IntoResponse`] mapping below.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport not confirmed to be HTTPS (URL scheme or forwarded header).
    #[error("Please use a HTTPS connection.")]
    InsecureTransport,

    /// No `Authorization` header at all.
    #[error("Please provide valid credentials.")]
    MissingCredentials,

    /// `Authorization` header present but undecodable: wrong scheme, bad
    /// base64, no colon, or control characters in the payload.
    #[error("Invalid authorization value.")]
    MalformedCredentials,

    #[error("You must specify a hostname")]
    MissingHostname,

    #[error("You must specify an ip address")]
    MissingIp,

    /// Upstream zone/record lookup or update failed, including transport
    /// errors talking to the API. Never retried.
    #[error("{0}")]
    Upstream(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InsecureTransport
            | Self::MissingCredentials
            | Self::MalformedCredentials
            | Self::MissingHostname
            | Self::MissingIp => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::InsecureTransport => "InsecureTransport",
            Self::MissingCredentials => "MissingCredentials",
            Self::MalformedCredentials => "MalformedCredentials",
            Self::MissingHostname => "MissingHostname",
            Self::MissingIp => "MissingIp",
            Self::Upstream(_) => "Upstream",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        // Operator side channel; the client only sees the message text.
        error!("{} {}", self.kind(), message);

        match Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
            .header(header::CACHE_CONTROL, "no-store")
            .header(header::CONTENT_LENGTH, message.len())
            .body(Body::from(message))
        {
            Ok(response) => response,
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Unknown Error").into_response(),
        }
    }
}
