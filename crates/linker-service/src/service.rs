use crate::identity::IdentityResolver;
use crate::links::{LinkRegistry, Links};
use crate::topics::TopicRegistry;
use async_trait::async_trait;
use linker_core::alias::{AliasGenerator, RandomAliasGenerator};
use linker_core::error::{LinkerError, Result};
use linker_core::linker::{CreateLinkParams, LinkListing, Linker};
use linker_core::model::{Alias, LinkUrl, TopicId, TopicName, Username};
use linker_core::store::UserTopicLinkStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Default deadline for a single service operation.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The [`Linker`] implementation shared by every front-end.
///
/// Inputs are validated in a fixed order (username, topic, alias, link)
/// before any store access. Every operation runs under a deadline; when it
/// expires the pending store call is dropped and the caller gets
/// `Internal`.
#[derive(Debug)]
pub struct LinkerService<S, L, G = RandomAliasGenerator> {
    identity: IdentityResolver<S>,
    topics: TopicRegistry<S>,
    links: L,
    generator: G,
    deadline: Duration,
}

impl<S: UserTopicLinkStore> LinkerService<S, LinkRegistry<S>, RandomAliasGenerator> {
    /// Creates a service that stores links as given, without a shortener.
    pub fn with_store(store: S) -> Self {
        let store = Arc::new(store);
        Self::new(
            Arc::clone(&store),
            LinkRegistry::new(store),
            RandomAliasGenerator::new(),
        )
    }
}

impl<S, L, G> LinkerService<S, L, G>
where
    S: UserTopicLinkStore,
    L: Links,
    G: AliasGenerator,
{
    pub fn new(store: Arc<S>, links: L, generator: G) -> Self {
        Self {
            identity: IdentityResolver::new(Arc::clone(&store)),
            topics: TopicRegistry::new(store),
            links,
            generator,
            deadline: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    async fn within_deadline<T: Send>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        let outcome = match tokio::time::timeout(self.deadline, fut).await {
            Ok(outcome) => outcome,
            Err(_) => Err(LinkerError::Internal(format!(
                "{operation} exceeded deadline of {:?}",
                self.deadline
            ))),
        };

        match &outcome {
            Err(LinkerError::Internal(detail)) => {
                error!(operation, error = %detail, "operation failed");
            }
            Err(err) => debug!(operation, error = %err, "operation rejected"),
            Ok(_) => trace!(operation, "operation succeeded"),
        }
        outcome
    }

    fn alias_or_generate(&self, alias: Option<String>) -> Alias {
        match alias.filter(|alias| !alias.is_empty()) {
            Some(alias) => Alias::new_unchecked(alias),
            None => self.generator.generate(),
        }
    }
}

#[async_trait]
impl<S, L, G> Linker for LinkerService<S, L, G>
where
    S: UserTopicLinkStore,
    L: Links,
    G: AliasGenerator,
{
    async fn create_topic(&self, username: &str, topic: &str) -> Result<TopicId> {
        let username = Username::new(username)?;
        let topic = TopicName::new(topic)?;

        self.within_deadline("create_topic", async {
            let user = self.identity.resolve_or_create(&username).await?;
            let id = self.topics.create(user, &topic).await?;
            info!(username = %username, topic = %topic, topic_id = %id, "topic created");
            Ok(id)
        })
        .await
    }

    async fn delete_topic(&self, username: &str, topic: &str) -> Result<TopicId> {
        let username = Username::new(username)?;
        let topic = TopicName::new(topic)?;

        self.within_deadline("delete_topic", async {
            let user = self.identity.resolve(&username).await?;
            let id = self.topics.delete(user, &topic).await?;
            info!(username = %username, topic = %topic, topic_id = %id, "topic deleted");
            Ok(id)
        })
        .await
    }

    async fn list_topics(&self, username: &str) -> Result<Vec<String>> {
        let username = Username::new(username)?;

        self.within_deadline("list_topics", async {
            let user = self.identity.resolve(&username).await?;
            let topics = self.topics.list(user).await?;
            Ok(topics.into_iter().map(TopicName::into_string).collect())
        })
        .await
    }

    async fn create_link(&self, params: CreateLinkParams) -> Result<Alias> {
        let username = Username::new(params.username)?;
        let topic = TopicName::new(params.topic)?;
        let alias = self.alias_or_generate(params.alias);
        let link = LinkUrl::parse(params.link)?;

        self.within_deadline("create_link", async {
            let user = self.identity.resolve(&username).await?;
            let topic_id = self.topics.resolve(user, &topic).await?;
            self.links
                .create(user, topic_id, &alias, link.as_str())
                .await?;
            info!(username = %username, topic = %topic, alias = %alias, "link created");
            Ok(alias)
        })
        .await
    }

    async fn pick_link(&self, username: &str, topic: &str, alias: &str) -> Result<String> {
        let username = Username::new(username)?;
        let topic = TopicName::new(topic)?;
        let alias = Alias::new(alias)?;

        self.within_deadline("pick_link", async {
            let user = self.identity.resolve(&username).await?;
            let topic_id = self.topics.resolve(user, &topic).await?;
            self.links.pick(user, topic_id, &alias).await
        })
        .await
    }

    async fn delete_link(&self, username: &str, topic: &str, alias: &str) -> Result<Alias> {
        let username = Username::new(username)?;
        let topic = TopicName::new(topic)?;
        let alias = Alias::new(alias)?;

        self.within_deadline("delete_link", async {
            let user = self.identity.resolve(&username).await?;
            let topic_id = self.topics.resolve(user, &topic).await?;
            self.links.delete(user, topic_id, &alias).await?;
            info!(username = %username, topic = %topic, alias = %alias, "link deleted");
            Ok(alias)
        })
        .await
    }

    async fn list_links(&self, username: &str, topic: &str) -> Result<LinkListing> {
        let username = Username::new(username)?;
        let topic = TopicName::new(topic)?;

        self.within_deadline("list_links", async {
            let user = self.identity.resolve(&username).await?;
            let topic_id = self.topics.resolve(user, &topic).await?;
            self.links.list(user, topic_id).await
        })
        .await
    }
}
