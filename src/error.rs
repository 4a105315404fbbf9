use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authenticated")]
    Auth,
    #[error("server responded with {status}: {body}")]
    Server { status: u16, body: String },
    #[error(transparent)]
    Malformed(#[from] MalformedResponseError),
}

impl ApiError {
    /// Text shown to the user when this error reaches the controller boundary.
    pub fn notification_text(&self) -> String {
        match self {
            Self::Network(message) => message.clone(),
            Self::Auth => "session expired, please sign in again".to_string(),
            Self::Server { status, body } => {
                let body = body.trim_end();
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.to_string()
                }
            }
            Self::Malformed(error) => error.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum MalformedResponseError {
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response rows are not an array")]
    RowsNotAnArray,
    #[error("response is missing pagination.totalItems")]
    MissingTotalItems,
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page size {0} is outside of 1..={max}", max = crate::model::PageSize::MAX)]
pub struct PageSizeError(pub u32);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot determine config location: {0} is not set")]
    MissingEnv(&'static str),
}
