use thiserror::Error;

use crate::store::Resource;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request could not be completed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    #[error("JSON parsing failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No timetable entries to export")]
    EmptyTimetable,

    #[error("Startup load failed for: {}", format_resources(.failed))]
    Startup { failed: Vec<Resource> },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Status code of a rejected response, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn format_resources(resources: &[Resource]) -> String {
    resources
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
