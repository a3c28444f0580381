//! Error types for the onboarding tracker.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OnboardError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OnboardError {
    pub fn code(&self) -> i32 {
        match self {
            OnboardError::Catalog(_) => -32010,
            OnboardError::Knowledge(_) => -32011,
            OnboardError::InvalidDate(_) => -32602,
            OnboardError::UnknownValue { .. } => -32603,
            OnboardError::MissingField(_) => -32604,
            OnboardError::Yaml(_) => -32701,
        }
    }

    /// True for errors caused by caller input rather than by loaded data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            OnboardError::InvalidDate(_)
                | OnboardError::UnknownValue { .. }
                | OnboardError::MissingField(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;
