use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Result type for linker operations.
pub type Result<T> = std::result::Result<T, LinkerError>;

/// Errors reported by a [`UserTopicLinkStore`](crate::store::UserTopicLinkStore).
///
/// "Zero rows affected" is never an error at this level; stores report it
/// through `Option`, `bool` or counts and the registries classify it.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors reported by an external [`UrlShortener`](crate::shortener::UrlShortener).
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("shortener request failed: {0}")]
    Transport(String),
    #[error("shortener rejected the request: {0}")]
    Rejected(String),
    #[error("shortener response is invalid: {0}")]
    InvalidResponse(String),
    #[error("shortener call timed out")]
    Timeout,
}

/// The domain error taxonomy shared by every front-end.
#[derive(Debug, Clone, Error)]
pub enum LinkerError {
    #[error("user not found")]
    UserNotFound,
    #[error("topic not found")]
    TopicNotFound,
    #[error("topic already exists")]
    TopicAlreadyExists,
    #[error("alias not found")]
    AliasNotFound,
    #[error("alias already exists")]
    AliasAlreadyExists,
    #[error("username must be at least {min} characters long")]
    InvalidUsername { min: usize },
    #[error("link is not a valid url: {0}")]
    InvalidLink(String),
    #[error("alias must not be empty")]
    EmptyAlias,
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("internal error: {0}")]
    Internal(String),
}

impl LinkerError {
    /// Returns the stable kind used to look up user-facing messages.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LinkerError::UserNotFound => ErrorKind::UserNotFound,
            LinkerError::TopicNotFound => ErrorKind::TopicNotFound,
            LinkerError::TopicAlreadyExists => ErrorKind::TopicAlreadyExists,
            LinkerError::AliasNotFound => ErrorKind::AliasNotFound,
            LinkerError::AliasAlreadyExists => ErrorKind::AliasAlreadyExists,
            LinkerError::InvalidUsername { .. } => ErrorKind::InvalidUsername,
            LinkerError::InvalidLink(_) => ErrorKind::InvalidLink,
            LinkerError::EmptyAlias => ErrorKind::EmptyAlias,
            LinkerError::EmptyTopic => ErrorKind::EmptyTopic,
            LinkerError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StorageError> for LinkerError {
    fn from(error: StorageError) -> Self {
        LinkerError::Internal(error.to_string())
    }
}

/// Fieldless mirror of [`LinkerError`], used as the key of message tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UserNotFound,
    TopicNotFound,
    TopicAlreadyExists,
    AliasNotFound,
    AliasAlreadyExists,
    InvalidUsername,
    InvalidLink,
    EmptyAlias,
    EmptyTopic,
    Internal,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::UserNotFound,
        ErrorKind::TopicNotFound,
        ErrorKind::TopicAlreadyExists,
        ErrorKind::AliasNotFound,
        ErrorKind::AliasAlreadyExists,
        ErrorKind::InvalidUsername,
        ErrorKind::InvalidLink,
        ErrorKind::EmptyAlias,
        ErrorKind::EmptyTopic,
        ErrorKind::Internal,
    ];

    /// Transport-neutral class of the error.
    ///
    /// Every front-end encodes the class (status code, gRPC code) and never
    /// the kind directly, so the mapping stays identical across transports.
    pub fn class(self) -> ErrorClass {
        match self {
            ErrorKind::InvalidUsername
            | ErrorKind::InvalidLink
            | ErrorKind::EmptyAlias
            | ErrorKind::EmptyTopic => ErrorClass::InvalidArgument,
            ErrorKind::UserNotFound | ErrorKind::TopicNotFound | ErrorKind::AliasNotFound => {
                ErrorClass::NotFound
            }
            ErrorKind::TopicAlreadyExists | ErrorKind::AliasAlreadyExists => {
                ErrorClass::AlreadyExists
            }
            ErrorKind::Internal => ErrorClass::Internal,
        }
    }

    /// Machine-readable code, e.g. `alias_not_found`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UserNotFound => "user_not_found",
            ErrorKind::TopicNotFound => "topic_not_found",
            ErrorKind::TopicAlreadyExists => "topic_already_exists",
            ErrorKind::AliasNotFound => "alias_not_found",
            ErrorKind::AliasAlreadyExists => "alias_already_exists",
            ErrorKind::InvalidUsername => "invalid_username",
            ErrorKind::InvalidLink => "invalid_link",
            ErrorKind::EmptyAlias => "empty_alias",
            ErrorKind::EmptyTopic => "empty_topic",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Internal,
}
