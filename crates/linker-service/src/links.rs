use async_trait::async_trait;
use linker_core::error::{LinkerError, Result, StorageError};
use linker_core::linker::LinkListing;
use linker_core::model::{Alias, TopicId, UserId};
use linker_core::store::UserTopicLinkStore;
use std::sync::Arc;

/// Link operations within an already resolved (user, topic) scope.
///
/// [`LinkRegistry`] talks to the store; decorators such as
/// [`ShorteningLinks`](crate::shortening::ShorteningLinks) wrap it.
#[async_trait]
pub trait Links: Send + Sync + 'static {
    async fn create(&self, user: UserId, topic: TopicId, alias: &Alias, link: &str) -> Result<()>;

    async fn pick(&self, user: UserId, topic: TopicId, alias: &Alias) -> Result<String>;

    /// Removes the link and returns the value that was stored.
    async fn delete(&self, user: UserId, topic: TopicId, alias: &Alias) -> Result<String>;

    async fn list(&self, user: UserId, topic: TopicId) -> Result<LinkListing>;
}

#[derive(Debug)]
pub struct LinkRegistry<S> {
    store: Arc<S>,
}

impl<S> Clone for LinkRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UserTopicLinkStore> LinkRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: UserTopicLinkStore> Links for LinkRegistry<S> {
    async fn create(&self, user: UserId, topic: TopicId, alias: &Alias, link: &str) -> Result<()> {
        match self.store.insert_link(user, topic, alias, link).await {
            Ok(()) => Ok(()),
            Err(StorageError::Conflict(_)) => Err(LinkerError::AliasAlreadyExists),
            Err(err) => Err(err.into()),
        }
    }

    async fn pick(&self, user: UserId, topic: TopicId, alias: &Alias) -> Result<String> {
        self.store
            .find_link(user, topic, alias)
            .await?
            .ok_or(LinkerError::AliasNotFound)
    }

    async fn delete(&self, user: UserId, topic: TopicId, alias: &Alias) -> Result<String> {
        self.store
            .delete_link(user, topic, alias)
            .await?
            .ok_or(LinkerError::AliasNotFound)
    }

    async fn list(&self, user: UserId, topic: TopicId) -> Result<LinkListing> {
        Ok(self.store.list_links(user, topic).await?.into_iter().collect())
    }
}
