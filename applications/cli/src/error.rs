/// CLI error types
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0} (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Invalid argument for '{command}': {value}")]
    InvalidArgument { command: &'static str, value: String },

    #[error(transparent)]
    Load(#[from] riff_playback::LoadError),
}

pub type Result<T> = std::result::Result<T, CliError>;
