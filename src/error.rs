use crate::controller::{Action, Phase};
use crate::models::BusinessField;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API credential is not configured")]
    CredentialMissing,
    #[error("Http request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider responded with status {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Image generation returned no images")]
    EmptyImageResult,
}

impl GenerationError {
    /// The only text the screen ever shows for a failed generation.
    pub const USER_MESSAGE: &'static str =
        "Failed to generate ad. Please check your inputs or try again later.";

    pub fn kind(&self) -> FailureKind {
        match self {
            GenerationError::CredentialMissing => FailureKind::CredentialMissing,
            GenerationError::Network(_) => FailureKind::Network,
            GenerationError::Provider { .. } => FailureKind::Provider,
            GenerationError::MalformedResponse(_) => FailureKind::MalformedResponse,
            GenerationError::EmptyImageResult => FailureKind::EmptyImageResult,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CredentialMissing,
    Network,
    Provider,
    MalformedResponse,
    EmptyImageResult,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<BusinessField>),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot {action} while in the {from} state")]
    Invalid { from: Phase, action: Action },
    #[error(transparent)]
    Form(#[from] FormError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Url Error")]
    Url(#[from] url::ParseError),
    #[error("Invalid bind address: {0}")]
    BindAddr(String),
    #[error("Invalid call-to-action label mode: {0}")]
    CtaLabelMode(String),
}
