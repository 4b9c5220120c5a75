use crate::error::{ErrorKind, LinkerError};
use std::collections::HashMap;

/// User-facing messages keyed by [`ErrorKind`].
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
/// Every kind always has a message: the constructors fill the whole table.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: HashMap<ErrorKind, &'static str>,
}

impl MessageCatalog {
    /// Messages for structured API responses (gRPC status, HTTP body).
    pub fn api() -> Self {
        Self::from_fn(|kind| match kind {
            ErrorKind::UserNotFound => "unknown username",
            ErrorKind::TopicNotFound => "unknown topic",
            ErrorKind::TopicAlreadyExists => "topic with such name already exists",
            ErrorKind::AliasNotFound => "link with this alias was not found",
            ErrorKind::AliasAlreadyExists => "link with such an alias already exists",
            ErrorKind::InvalidUsername => "username must be at least 8 characters long",
            ErrorKind::InvalidLink => "link is not a valid url",
            ErrorKind::EmptyAlias => "alias must not be empty",
            ErrorKind::EmptyTopic => "topic name must not be empty",
            ErrorKind::Internal => "something went wrong",
        })
    }

    /// Messages for chat replies.
    pub fn chat() -> Self {
        Self::from_fn(|kind| match kind {
            ErrorKind::UserNotFound => "You have no topics yet. Create one with /post_topic.",
            ErrorKind::TopicNotFound => "Topic not found.",
            ErrorKind::TopicAlreadyExists => "A topic with this name already exists.",
            ErrorKind::AliasNotFound => "Link not found.",
            ErrorKind::AliasAlreadyExists => "A link with this alias already exists.",
            ErrorKind::InvalidUsername => {
                "Your chat username must be at least 8 characters long to use this bot."
            }
            ErrorKind::InvalidLink => "That does not look like a link. Pass it as link:<url>.",
            ErrorKind::EmptyAlias => "The alias:<alias> argument is required.",
            ErrorKind::EmptyTopic => "The topic:<name> argument is required.",
            ErrorKind::Internal => "Something went wrong, please try again later.",
        })
    }

    fn from_fn(f: impl Fn(ErrorKind) -> &'static str) -> Self {
        let messages = ErrorKind::ALL
            .into_iter()
            .map(|kind| (kind, f(kind)))
            .collect();
        Self { messages }
    }

    pub fn get(&self, kind: ErrorKind) -> &str {
        self.messages
            .get(&kind)
            .copied()
            .unwrap_or("something went wrong")
    }

    /// Message for an error, never the error's own (internal) text.
    pub fn for_error(&self, error: &LinkerError) -> &str {
        self.get(error.kind())
    }
}
