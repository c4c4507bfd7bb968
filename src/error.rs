//! Error types for configuration loading and high-score persistence.
//!
//! The simulation tick itself never fails; only the edges of the program
//! (reading a config file, touching the score file) produce these.

/// Error type for everything outside the tick boundary.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A tunable is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file is not valid JSON for `GameConfig`.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// IO error from the filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
