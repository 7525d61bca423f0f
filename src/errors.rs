// src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Solve endpoint returned status {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Language '{0}' is not in the catalog")]
    UnknownLanguage(String),

    #[error("Difficulty '{0}' is not one of Easy, Medium, Hard")]
    UnknownDifficulty(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    #[error("Code block {0} not found")]
    BlockNotFound(usize),

    #[error("No response to copy")]
    NothingToCopy,
}

pub type Result<T> = std::result::Result<T, SolverError>;
