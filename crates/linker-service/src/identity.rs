use linker_core::error::{LinkerError, Result};
use linker_core::model::{UserId, Username};
use linker_core::store::UserTopicLinkStore;
use std::sync::Arc;
use tracing::trace;

/// Maps usernames to durable user ids.
///
/// Only topic creation materializes users; every other operation goes
/// through [`resolve`](Self::resolve) and fails with `UserNotFound`.
#[derive(Debug)]
pub struct IdentityResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for IdentityResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UserTopicLinkStore> IdentityResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn resolve_or_create(&self, username: &Username) -> Result<UserId> {
        let id = self.store.upsert_user(username).await?;
        trace!(username = %username, user_id = %id, "resolved or created user");
        Ok(id)
    }

    pub async fn resolve(&self, username: &Username) -> Result<UserId> {
        self.store
            .find_user(username)
            .await?
            .ok_or(LinkerError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linker_storage::InMemoryStore;

    #[tokio::test]
    async fn resolve_missing_user() {
        let resolver = IdentityResolver::new(Arc::new(InMemoryStore::new()));

        let err = resolver
            .resolve(&Username::new_unchecked("alice1234"))
            .await
            .unwrap_err();

        assert!(matches!(err, LinkerError::UserNotFound));
    }

    #[tokio::test]
    async fn resolve_after_create() {
        let resolver = IdentityResolver::new(Arc::new(InMemoryStore::new()));
        let username = Username::new_unchecked("alice1234");

        let created = resolver.resolve_or_create(&username).await.unwrap();
        let again = resolver.resolve_or_create(&username).await.unwrap();

        assert_eq!(created, again);
        assert_eq!(resolver.resolve(&username).await.unwrap(), created);
    }
}
