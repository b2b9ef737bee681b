use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Decode error at line {line}, column {column}: {reason}")]
    Decode {
        reason: String,
        line: usize,
        column: usize,
    },

    #[error("Missing field `{field}`{}", describe_event(.event_id))]
    MissingField {
        field: String,
        event_id: Option<u64>,
    },

    #[error("Field `{field}` is not a valid {expected}{}", describe_event(.event_id))]
    TypeMismatch {
        field: String,
        expected: String,
        event_id: Option<u64>,
    },

    #[error("Event #{index}{} failed to parse: {source}", describe_event(.event_id))]
    Event {
        index: usize,
        event_id: Option<u64>,
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    /// Builds a decode error without a source position.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            line: 0,
            column: 0,
        }
    }

    /// The innermost error, looking through `Event` wrappers.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Event { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            reason: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

fn describe_event(event_id: &Option<u64>) -> String {
    event_id.map_or_else(String::new, |id| format!(" (event id {id})"))
}

pub type Result<T> = std::result::Result<T, IngestError>;
