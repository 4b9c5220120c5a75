use linker_core::error::{LinkerError, Result, StorageError};
use linker_core::model::{TopicId, TopicName, UserId};
use linker_core::store::UserTopicLinkStore;
use std::sync::Arc;
use tracing::debug;

/// Topic lifecycle for a resolved user.
#[derive(Debug)]
pub struct TopicRegistry<S> {
    store: Arc<S>,
}

impl<S> Clone for TopicRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UserTopicLinkStore> TopicRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user: UserId, topic: &TopicName) -> Result<TopicId> {
        match self.store.insert_topic(user, topic).await {
            Ok(id) => Ok(id),
            Err(StorageError::Conflict(_)) => Err(LinkerError::TopicAlreadyExists),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn resolve(&self, user: UserId, topic: &TopicName) -> Result<TopicId> {
        self.store
            .find_topic(user, topic)
            .await?
            .ok_or(LinkerError::TopicNotFound)
    }

    /// Removes the topic's links, then the topic itself.
    ///
    /// The two steps are separate statements. If another request deletes the
    /// topic in between, this call reports `TopicNotFound`.
    pub async fn delete(&self, user: UserId, topic: &TopicName) -> Result<TopicId> {
        let id = self.resolve(user, topic).await?;

        let removed = self.store.delete_topic_links(user, id).await?;
        debug!(user_id = %user, topic_id = %id, removed, "removed topic links");

        self.store
            .delete_topic(user, topic)
            .await?
            .ok_or(LinkerError::TopicNotFound)
    }

    pub async fn list(&self, user: UserId) -> Result<Vec<TopicName>> {
        Ok(self.store.list_topics(user).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linker_core::model::{Alias, Username};
    use linker_storage::InMemoryStore;

    async fn setup() -> (InMemoryStore, TopicRegistry<InMemoryStore>, UserId) {
        let store = InMemoryStore::new();
        let user = store
            .upsert_user(&Username::new_unchecked("alice1234"))
            .await
            .unwrap();
        (store.clone(), TopicRegistry::new(Arc::new(store)), user)
    }

    fn topic(name: &str) -> TopicName {
        TopicName::new(name).unwrap()
    }

    #[tokio::test]
    async fn duplicate_topic() {
        let (_, registry, user) = setup().await;

        registry.create(user, &topic("reading")).await.unwrap();
        let err = registry.create(user, &topic("reading")).await.unwrap_err();

        assert!(matches!(err, LinkerError::TopicAlreadyExists));
    }

    #[tokio::test]
    async fn delete_missing_topic() {
        let (_, registry, user) = setup().await;

        let err = registry.delete(user, &topic("reading")).await.unwrap_err();

        assert!(matches!(err, LinkerError::TopicNotFound));
    }

    #[tokio::test]
    async fn delete_cascades_to_links() {
        let (store, registry, user) = setup().await;
        let id = registry.create(user, &topic("reading")).await.unwrap();
        for i in 0..3 {
            store
                .insert_link(
                    user,
                    id,
                    &Alias::new_unchecked(format!("doc{i}")),
                    "https://example.com",
                )
                .await
                .unwrap();
        }

        let deleted = registry.delete(user, &topic("reading")).await.unwrap();

        assert_eq!(deleted, id);
        assert_eq!(store.link_count(), 0);
        assert!(registry.list(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_topic_without_links() {
        let (_, registry, user) = setup().await;
        let id = registry.create(user, &topic("empty")).await.unwrap();

        assert_eq!(registry.delete(user, &topic("empty")).await.unwrap(), id);
    }

    #[tokio::test]
    async fn concurrent_delete_has_one_winner() {
        let (_, registry, user) = setup().await;
        registry.create(user, &topic("reading")).await.unwrap();

        let (topic_a, topic_b) = (topic("reading"), topic("reading"));
        let (first, second) = tokio::join!(
            registry.delete(user, &topic_a),
            registry.delete(user, &topic_b),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(LinkerError::TopicNotFound))));
    }
}
