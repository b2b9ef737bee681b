use config::{Config, ConfigError, Environment, File};
use matchlog_models::{wyscout::MATCH_FILES, IngestError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Generic,
    Wyscout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub event_schema: SchemaKind,
    pub json_file_path: Option<String>,
    pub wyscout_path: Option<String>,
    pub wyscout_match: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            // Start with default values
            .set_default("event_schema", "wyscout")?
            .set_default("wyscout_match", MATCH_FILES[0])?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from environment variables
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    /// Path of the export to load for the configured schema.
    pub fn source_path(&self) -> Result<PathBuf, IngestError> {
        match self.event_schema {
            SchemaKind::Generic => self
                .json_file_path
                .as_deref()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| IngestError::Config("JSON_FILE_PATH is not set".to_string())),
            SchemaKind::Wyscout => {
                let base = self
                    .wyscout_path
                    .as_deref()
                    .filter(|path| !path.is_empty())
                    .ok_or_else(|| IngestError::Config("WYSCOUT_PATH is not set".to_string()))?;

                if !MATCH_FILES.contains(&self.wyscout_match.as_str()) {
                    return Err(IngestError::Config(format!(
                        "unknown Wyscout match {}, expected one of {}",
                        self.wyscout_match,
                        MATCH_FILES.join(", ")
                    )));
                }

                Ok(PathBuf::from(format!("{base}{}.json", self.wyscout_match)))
            }
        }
    }
}
