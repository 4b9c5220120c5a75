use async_trait::async_trait;
use futures_util::TryStreamExt;
use linker_core::error::StorageError;
use linker_core::model::{Alias, LinkEntry, TopicId, TopicName, UserId, Username};
use linker_core::store::{Result, UserTopicLinkStore};
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DUPLICATE_KEY: i32 = 11000;

const USERS: &str = "users";
const TOPICS: &str = "topics";
const LINKS: &str = "links";
const COUNTERS: &str = "counters";

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: i64,
    username: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TopicDocument {
    #[serde(rename = "_id")]
    id: i64,
    user_id: i64,
    topic: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkDocument {
    user_id: i64,
    topic_id: i64,
    alias: String,
    link: String,
}

#[derive(Debug, Deserialize)]
struct Counter {
    seq: i64,
}

/// MongoDB implementation of the store contract.
///
/// Users, topics and links live in their own collections. Numeric ids come
/// from a `counters` collection so they are never reused, and uniqueness is
/// enforced by the indexes [`MongoStore::init`] creates. A duplicate-key
/// write (code 11000) is reported as [`StorageError::Conflict`].
#[derive(Debug, Clone)]
pub struct MongoStore {
    users: Collection<UserDocument>,
    topics: Collection<TopicDocument>,
    links: Collection<LinkDocument>,
    counters: Collection<Document>,
}

impl MongoStore {
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection(USERS),
            topics: database.collection(TOPICS),
            links: database.collection(LINKS),
            counters: database.collection(COUNTERS),
        }
    }

    /// Connects to `uri`, checks the server answers and opens `database`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(map_mongo_error)?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_mongo_error)?;
        Ok(Self::new(&database))
    }

    /// Creates the unique indexes on users, topics and links. Idempotent.
    pub async fn init(&self) -> Result<()> {
        self.users
            .create_index(unique_index(doc! { "username": 1 }))
            .await
            .map_err(map_mongo_error)?;
        self.topics
            .create_index(unique_index(doc! { "user_id": 1, "topic": 1 }))
            .await
            .map_err(map_mongo_error)?;
        self.links
            .create_index(unique_index(doc! { "user_id": 1, "topic_id": 1, "alias": 1 }))
            .await
            .map_err(map_mongo_error)?;
        debug!("mongo indexes are up to date");
        Ok(())
    }

    async fn next_id(&self, sequence: &str) -> Result<i64> {
        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_mongo_error)?
            .ok_or_else(|| StorageError::InvalidData(format!("counter {sequence} is missing")))?;

        mongodb::bson::from_document::<Counter>(counter)
            .map(|counter| counter.seq)
            .map_err(|err| StorageError::InvalidData(err.to_string()))
    }

    async fn owns_topic(&self, user: UserId, topic: TopicId) -> Result<bool> {
        let found = self
            .topics
            .find_one(doc! { "_id": topic.0, "user_id": user.0 })
            .await
            .map_err(map_mongo_error)?;
        Ok(found.is_some())
    }
}

fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn map_mongo_error(err: mongodb::error::Error) -> StorageError {
    let message = err.to_string();

    match err.kind.as_ref() {
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StorageError::Unavailable(message),
        ErrorKind::BsonDeserialization(_) => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn link_filter(user: UserId, topic: TopicId, alias: &Alias) -> Document {
    doc! { "user_id": user.0, "topic_id": topic.0, "alias": alias.as_str() }
}

#[async_trait]
impl UserTopicLinkStore for MongoStore {
    async fn upsert_user(&self, username: &Username) -> Result<UserId> {
        if let Some(id) = self.find_user(username).await? {
            return Ok(id);
        }

        let id = self.next_id(USERS).await?;
        let user = UserDocument {
            id,
            username: username.as_str().to_owned(),
        };
        match self.users.insert_one(user).await {
            Ok(_) => Ok(UserId(id)),
            // lost the race to a concurrent upsert; its id wins
            Err(err) if is_duplicate_key(&err) => self
                .find_user(username)
                .await?
                .ok_or_else(|| StorageError::Conflict(username.to_string())),
            Err(err) => Err(map_mongo_error(err)),
        }
    }

    async fn find_user(&self, username: &Username) -> Result<Option<UserId>> {
        let user = self
            .users
            .find_one(doc! { "username": username.as_str() })
            .await
            .map_err(map_mongo_error)?;
        Ok(user.map(|user| UserId(user.id)))
    }

    async fn insert_topic(&self, user: UserId, topic: &TopicName) -> Result<TopicId> {
        let id = self.next_id(TOPICS).await?;
        let document = TopicDocument {
            id,
            user_id: user.0,
            topic: topic.as_str().to_owned(),
        };

        match self.topics.insert_one(document).await {
            Ok(_) => Ok(TopicId(id)),
            Err(err) if is_duplicate_key(&err) => Err(StorageError::Conflict(topic.to_string())),
            Err(err) => Err(map_mongo_error(err)),
        }
    }

    async fn find_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>> {
        let found = self
            .topics
            .find_one(doc! { "user_id": user.0, "topic": topic.as_str() })
            .await
            .map_err(map_mongo_error)?;
        Ok(found.map(|topic| TopicId(topic.id)))
    }

    async fn delete_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>> {
        let Some(removed) = self
            .topics
            .find_one_and_delete(doc! { "user_id": user.0, "topic": topic.as_str() })
            .await
            .map_err(map_mongo_error)?
        else {
            return Ok(None);
        };

        // no foreign keys: sweep links inserted after the cascade
        self.links
            .delete_many(doc! { "user_id": user.0, "topic_id": removed.id })
            .await
            .map_err(map_mongo_error)?;
        Ok(Some(TopicId(removed.id)))
    }

    async fn list_topics(&self, user: UserId) -> Result<Vec<TopicName>> {
        let topics: Vec<TopicDocument> = self
            .topics
            .find(doc! { "user_id": user.0 })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(map_mongo_error)?
            .try_collect()
            .await
            .map_err(map_mongo_error)?;

        topics
            .into_iter()
            .map(|document| {
                TopicName::new(document.topic)
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
        if !self.owns_topic(user, topic).await? {
            return Err(StorageError::Query(format!(
                "topic {topic} does not exist for user {user}"
            )));
        }

        let document = LinkDocument {
            user_id: user.0,
            topic_id: topic.0,
            alias: alias.as_str().to_owned(),
            link: link.to_owned(),
        };
        match self.links.insert_one(document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StorageError::Conflict(alias.to_string())),
            Err(err) => Err(map_mongo_error(err)),
        }
    }

    async fn find_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
    ) -> Result<Option<String>> {
        let found = self
            .links
            .find_one(link_filter(user, topic, alias))
            .await
            .map_err(map_mongo_error)?;
        Ok(found.map(|document| document.link))
    }

    async fn delete_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
    ) -> Result<Option<String>> {
        let removed = self
            .links
            .find_one_and_delete(link_filter(user, topic, alias))
            .await
            .map_err(map_mongo_error)?;
        Ok(removed.map(|document| document.link))
    }

    async fn delete_topic_links(&self, user: UserId, topic: TopicId) -> Result<u64> {
        let result = self
            .links
            .delete_many(doc! { "user_id": user.0, "topic_id": topic.0 })
            .await
            .map_err(map_mongo_error)?;
        Ok(result.deleted_count)
    }

    async fn list_links(&self, user: UserId, topic: TopicId) -> Result<Vec<LinkEntry>> {
        let links: Vec<LinkDocument> = self
            .links
            .find(doc! { "user_id": user.0, "topic_id": topic.0 })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(map_mongo_error)?
            .try_collect()
            .await
            .map_err(map_mongo_error)?;

        Ok(links
            .into_iter()
            .map(|document| LinkEntry {
                alias: document.alias,
                link: document.link,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_filter_matches_the_unique_index() {
        let filter = link_filter(UserId(1), TopicId(2), &Alias::new_unchecked("doc1"));

        let keys: Vec<&str> = filter.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["user_id", "topic_id", "alias"]);
        assert_eq!(filter.get_i64("topic_id").unwrap(), 2);
    }

    #[test]
    fn link_documents_ignore_the_object_id() {
        let stored = doc! {
            "_id": mongodb::bson::oid::ObjectId::new(),
            "user_id": 1_i64,
            "topic_id": 2_i64,
            "alias": "doc1",
            "link": "https://example.com",
        };

        let link: LinkDocument = mongodb::bson::from_document(stored).unwrap();

        assert_eq!(link.alias, "doc1");
        assert_eq!(link.link, "https://example.com");
    }
}
