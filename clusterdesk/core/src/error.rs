use std::collections::BTreeMap;

use clusterdesk_proto::prelude::ErrorBody;
use thiserror::Error;

/// Coarse classification of a failed request, derived from the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
    BadRequest,
    Unauthorized,
    NotFound,
    Validation,
    Server,
    Other,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::BadRequest,
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            422 => ErrorKind::Validation,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("JSON parsing error: {0}")]
    Json(String),

    #[error("HTTP error {status}: {message}")]
    Http {
        status: u16,
        kind: ErrorKind,
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    #[error("no {0} selected")]
    MissingParent(&'static str),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Json(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Json(err.to_string())
    }
}

impl GatewayError {
    /// Build an HTTP error from a status code and the raw response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        GatewayError::Http {
            status,
            kind: ErrorKind::from_status(status),
            message,
            field_errors: parsed.field_errors(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Network(_) => ErrorKind::Network,
            GatewayError::Json(_) => ErrorKind::Decode,
            GatewayError::Http { kind, .. } => *kind,
            GatewayError::MissingParent(_) => ErrorKind::BadRequest,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-reported per-field messages, if any.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            GatewayError::Http { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }

    /// Server-provided message for generic failures.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Http { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Only transport failures and 5xx responses are worth retrying, and only for GETs.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Server)
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeError {
    #[error("cannot select a {child} before a {parent}")]
    ParentNotSelected {
        child: &'static str,
        parent: &'static str,
    },
}

/// Required inputs of the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Country,
    State,
    City,
    Location,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Country,
        FormField::State,
        FormField::City,
        FormField::Location,
    ];

    /// Field key as used in request bodies and server error maps.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Country => "country_id",
            FormField::State => "state_id",
            FormField::City => "city_id",
            FormField::Location => "location",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("required fields missing: {}", .0.iter().map(|f| f.key()).collect::<Vec<_>>().join(", "))]
    Required(Vec<FormField>),

    #[error("a submit is already in flight")]
    InFlight,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    #[error("another change is still in flight")]
    Busy,

    #[error(transparent)]
    Incomplete(#[from] FormError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
