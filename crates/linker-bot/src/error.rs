use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("message is not a command")]
    NotACommand,
    #[error("unknown command /{0}")]
    UnknownCommand(String),
    #[error("malformed arguments for /{0}")]
    MalformedArguments(String),
    #[error("invalid command pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
