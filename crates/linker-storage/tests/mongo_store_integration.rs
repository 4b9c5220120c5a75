use std::time::Duration;

use linker_core::model::{Alias, TopicName, Username};
use linker_storage::{MongoStore, StorageError, UserTopicLinkStore};
use linker_test_infra::mongo::{MongoConfig, MongoServer};

struct Fixture {
    mongo: MongoServer,
    store: MongoStore,
}

impl Fixture {
    async fn start() -> Self {
        let mongo = MongoServer::new(MongoConfig::builder().build())
            .await
            .expect("start mongo");
        let uri = mongo.uri().await.expect("mongo uri");
        let store = connect_with_retry(&uri, mongo.database()).await;
        store.init().await.expect("create indexes");

        Self {
            mongo,
            store,
        }
    }
}

async fn connect_with_retry(uri: &str, database: &str) -> MongoStore {
    let mut last_error = None;

    for _ in 0..20 {
        match MongoStore::connect(uri, database).await {
            Ok(store) => return store,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mongo: {last_error:?}");
}

fn user(name: &str) -> Username {
    Username::new(name).unwrap()
}

fn topic(name: &str) -> TopicName {
    TopicName::new(name).unwrap()
}

fn alias(value: &str) -> Alias {
    Alias::new(value).unwrap()
}

#[tokio::test]
#[ignore = "requires docker"]
async fn init_is_repeatable() {
    let fixture = Fixture::start().await;

    fixture.store.init().await.unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
async fn upsert_user_returns_existing_id() {
    let fixture = Fixture::start().await;

    let first = fixture.store.upsert_user(&user("alice1234")).await.unwrap();
    let second = fixture.store.upsert_user(&user("alice1234")).await.unwrap();
    let other = fixture.store.upsert_user(&user("bobby1234")).await.unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert!(fixture
        .store
        .find_user(&user("nobody123"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn duplicate_keys_are_conflicts() {
    let fixture = Fixture::start().await;
    let alice = fixture.store.upsert_user(&user("alice1234")).await.unwrap();
    let bob = fixture.store.upsert_user(&user("bobby1234")).await.unwrap();

    let topic_id = fixture
        .store
        .insert_topic(alice, &topic("reading"))
        .await
        .unwrap();
    let err = fixture
        .store
        .insert_topic(alice, &topic("reading"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
    fixture
        .store
        .insert_topic(bob, &topic("reading"))
        .await
        .unwrap();

    fixture
        .store
        .insert_link(alice, topic_id, &alias("doc1"), "https://one.example")
        .await
        .unwrap();
    let err = fixture
        .store
        .insert_link(alice, topic_id, &alias("doc1"), "https://two.example")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn links_lifecycle() {
    let fixture = Fixture::start().await;
    let user_id = fixture.store.upsert_user(&user("alice1234")).await.unwrap();
    let topic_id = fixture
        .store
        .insert_topic(user_id, &topic("reading"))
        .await
        .unwrap();

    for (name, link) in [("doc1", "https://one.example"), ("doc2", "https://two.example")] {
        fixture
            .store
            .insert_link(user_id, topic_id, &alias(name), link)
            .await
            .unwrap();
    }

    let links = fixture.store.list_links(user_id, topic_id).await.unwrap();
    let aliases: Vec<_> = links.iter().map(|entry| entry.alias.as_str()).collect();
    assert_eq!(aliases, vec!["doc1", "doc2"]);

    let removed = fixture
        .store
        .delete_link(user_id, topic_id, &alias("doc1"))
        .await
        .unwrap();
    assert_eq!(removed.as_deref(), Some("https://one.example"));
    assert!(fixture
        .store
        .find_link(user_id, topic_id, &alias("doc1"))
        .await
        .unwrap()
        .is_none());

    assert_eq!(
        fixture
            .store
            .delete_topic_links(user_id, topic_id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        fixture
            .store
            .delete_topic(user_id, &topic("reading"))
            .await
            .unwrap(),
        Some(topic_id)
    );
    assert!(fixture.store.list_topics(user_id).await.unwrap().is_empty());

    let err = fixture
        .store
        .insert_link(user_id, topic_id, &alias("doc3"), "https://three.example")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Query(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn bookmarks_survive_a_new_connection() {
    let fixture = Fixture::start().await;
    let user_id = fixture.store.upsert_user(&user("alice1234")).await.unwrap();
    let topic_id = fixture
        .store
        .insert_topic(user_id, &topic("reading"))
        .await
        .unwrap();
    fixture
        .store
        .insert_link(user_id, topic_id, &alias("doc1"), "https://example.com")
        .await
        .unwrap();

    let uri = fixture.mongo.uri().await.unwrap();
    let reopened = MongoStore::connect(&uri, fixture.mongo.database())
        .await
        .unwrap();

    assert_eq!(reopened.find_user(&user("alice1234")).await.unwrap(), Some(user_id));
    assert_eq!(
        reopened
            .find_link(user_id, topic_id, &alias("doc1"))
            .await
            .unwrap()
            .as_deref(),
        Some("https://example.com")
    );
}
