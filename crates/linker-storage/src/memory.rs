use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use linker_core::error::StorageError;
use linker_core::model::{Alias, LinkEntry, TopicId, TopicName, UserId, Username};
use linker_core::store::{Result, UserTopicLinkStore};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Records {
    users: DashMap<String, UserId>,
    topics: DashMap<(UserId, String), TopicId>,
    owners: DashMap<TopicId, UserId>,
    links: DashMap<(UserId, TopicId), Vec<LinkEntry>>,
    last_user_id: AtomicI64,
    last_topic_id: AtomicI64,
}

/// In-memory implementation of the store contract using DashMap.
///
/// Records are grouped per owner the way a document store would keep them:
/// one entry per user, per (user, topic name) and per (user, topic) link
/// collection, plus a topic id to owner index. Uniqueness checks and inserts
/// happen under the entry lock of the owning shard, so two concurrent
/// inserts of the same key cannot both succeed. Ids are never reused.
///
/// Deleting a topic also drops its link collection, so a link inserted
/// between the cascade and the topic removal does not outlive the topic.
///
/// Cloning is cheap and clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Records>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users ever created.
    pub fn user_count(&self) -> usize {
        self.records.users.len()
    }

    /// Number of links across all users and topics.
    pub fn link_count(&self) -> usize {
        self.records.links.iter().map(|entry| entry.value().len()).sum()
    }

    fn owns_topic(&self, user: UserId, topic: TopicId) -> bool {
        self.records
            .owners
            .get(&topic)
            .is_some_and(|owner| *owner == user)
    }
}

#[async_trait]
impl UserTopicLinkStore for InMemoryStore {
    async fn upsert_user(&self, username: &Username) -> Result<UserId> {
        let id = *self
            .records
            .users
            .entry(username.as_str().to_owned())
            .or_insert_with(|| UserId(self.records.last_user_id.fetch_add(1, Ordering::SeqCst) + 1));
        Ok(id)
    }

    async fn find_user(&self, username: &Username) -> Result<Option<UserId>> {
        Ok(self.records.users.get(username.as_str()).map(|id| *id))
    }

    async fn insert_topic(&self, user: UserId, topic: &TopicName) -> Result<TopicId> {
        match self.records.topics.entry((user, topic.as_str().to_owned())) {
            Entry::Occupied(_) => Err(StorageError::Conflict(topic.to_string())),
            Entry::Vacant(vacant) => {
                let id = TopicId(self.records.last_topic_id.fetch_add(1, Ordering::SeqCst) + 1);
                self.records.owners.insert(id, user);
                vacant.insert(id);
                Ok(id)
            }
        }
    }

    async fn find_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>> {
        let key = (user, topic.as_str().to_owned());
        Ok(self.records.topics.get(&key).map(|id| *id))
    }

    async fn delete_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>> {
        let key = (user, topic.as_str().to_owned());
        let Some((_, id)) = self.records.topics.remove(&key) else {
            return Ok(None);
        };
        // owner first: inserts check it under the collection lock
        self.records.owners.remove(&id);
        self.records.links.remove(&(user, id));
        Ok(Some(id))
    }

    async fn list_topics(&self, user: UserId) -> Result<Vec<TopicName>> {
        let mut topics: Vec<(TopicId, String)> = self
            .records
            .topics
            .iter()
            .filter(|entry| entry.key().0 == user)
            .map(|entry| (*entry.value(), entry.key().1.clone()))
            .collect();
        topics.sort_unstable_by_key(|(id, _)| *id);

        topics
            .into_iter()
            .map(|(_, name)| {
                TopicName::new(name)
                    .map_err(|_| StorageError::InvalidData("topic with empty name".to_string()))
            })
            .collect()
    }

    async fn insert_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
        link: &str,
    ) -> Result<()> {
        // Mirrors the foreign key on links.topic_id. The owner is checked
        // while the collection entry is held; `delete_topic` drops the owner
        // before the collection.
        let entry = self.records.links.entry((user, topic));
        if !self.owns_topic(user, topic) {
            return Err(StorageError::Query(format!(
                "topic {topic} does not exist for user {user}"
            )));
        }

        let mut links = entry.or_default();
        if links.iter().any(|entry| entry.alias == alias.as_str()) {
            return Err(StorageError::Conflict(alias.to_string()));
        }
        links.push(LinkEntry {
            alias: alias.as_str().to_owned(),
            link: link.to_owned(),
        });
        Ok(())
    }

    async fn find_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
    ) -> Result<Option<String>> {
        let Some(links) = self.records.links.get(&(user, topic)) else {
            return Ok(None);
        };

        Ok(links
            .iter()
            .find(|entry| entry.alias == alias.as_str())
            .map(|entry| entry.link.clone()))
    }

    async fn delete_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
    ) -> Result<Option<String>> {
        let Some(mut links) = self.records.links.get_mut(&(user, topic)) else {
            return Ok(None);
        };

        let Some(position) = links.iter().position(|entry| entry.alias == alias.as_str()) else {
            return Ok(None);
        };
        Ok(Some(links.remove(position).link))
    }

    async fn delete_topic_links(&self, user: UserId, topic: TopicId) -> Result<u64> {
        let removed = self
            .records
            .links
            .remove(&(user, topic))
            .map_or(0, |(_, links)| links.len());
        Ok(removed as u64)
    }

    async fn list_links(&self, user: UserId, topic: TopicId) -> Result<Vec<LinkEntry>> {
        Ok(self
            .records
            .links
            .get(&(user, topic))
            .map(|links| links.clone())
            .unwrap_or_default())
    }
}
