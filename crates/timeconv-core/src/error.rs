//! Core error types

use thiserror::Error;

use crate::cron::CronError;
use crate::layout::LayoutError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown time zone {name}")]
    UnknownLocation { name: String },

    #[error("parsing time {input:?} as {layout:?}: {source}")]
    Parse {
        layout: String,
        input: String,
        #[source]
        source: LayoutError,
    },

    #[error(transparent)]
    Cron(#[from] CronError),

    #[error("{stage}: {source}")]
    Query {
        stage: &'static str,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Unknown query key: {key}")]
    UnknownQueryKey { key: String },

    #[error("Invalid --set format: '{arg}'. Expected key=value")]
    InvalidOverride { arg: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Wrap an error with the query stage it happened in
    pub(crate) fn in_stage(self, stage: &'static str) -> Self {
        CoreError::Query {
            stage,
            source: Box::new(self),
        }
    }

    /// True when the error was caused by the caller's input rather than the environment
    pub fn is_input_error(&self) -> bool {
        match self {
            CoreError::Io(_) => false,
            CoreError::Query { source, .. } => source.is_input_error(),
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
