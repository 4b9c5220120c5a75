use crate::error::StorageError;
use crate::model::{Alias, LinkEntry, TopicId, TopicName, UserId, Username};
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence contract for users, topics and links.
///
/// Each method is a single store statement. Uniqueness is enforced by the
/// store: inserts that violate it return [`StorageError::Conflict`].
/// "No matching row" is reported through the return value, never as an
/// error, so callers can tell it apart from infrastructure failures.
#[async_trait]
pub trait UserTopicLinkStore: Send + Sync + 'static {
    /// Returns the id of `username`, inserting the user if it is absent.
    ///
    /// Idempotent: concurrent calls for the same name return the same id.
    async fn upsert_user(&self, username: &Username) -> Result<UserId>;

    /// Looks up a user without creating it.
    async fn find_user(&self, username: &Username) -> Result<Option<UserId>>;

    /// Inserts a topic for `user`. Returns `Err(Conflict)` if the user
    /// already owns a topic with that name.
    async fn insert_topic(&self, user: UserId, topic: &TopicName) -> Result<TopicId>;

    /// Looks up a topic owned by `user`.
    async fn find_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>>;

    /// Deletes the topic row and returns its id, or `None` if no row matched.
    async fn delete_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>>;

    /// Names of all topics owned by `user`, in store order.
    async fn list_topics(&self, user: UserId) -> Result<Vec<TopicName>>;

    /// Inserts a link. Returns `Err(Conflict)` if the alias is already taken
    /// within (user, topic).
    async fn insert_link(&self, user: UserId, topic: TopicId, alias: &Alias, link: &str)
        -> Result<()>;

    /// Looks up the link stored under an exact (user, topic, alias).
    async fn find_link(&self, user: UserId, topic: TopicId, alias: &Alias)
        -> Result<Option<String>>;

    /// Deletes a link and returns the stored value, or `None` if no row matched.
    async fn delete_link(&self, user: UserId, topic: TopicId, alias: &Alias)
        -> Result<Option<String>>;

    /// Deletes every link of a topic and returns how many were removed.
    /// Removing zero links is not an error.
    async fn delete_topic_links(&self, user: UserId, topic: TopicId) -> Result<u64>;

    /// All links of a topic, in store order.
    async fn list_links(&self, user: UserId, topic: TopicId) -> Result<Vec<LinkEntry>>;
}
