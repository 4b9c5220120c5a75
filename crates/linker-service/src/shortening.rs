use crate::links::Links;
use async_trait::async_trait;
use linker_core::error::Result;
use linker_core::linker::LinkListing;
use linker_core::model::{Alias, TopicId, UserId};
use linker_core::shortener::UrlShortener;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default bound for a single call to the external shortener.
pub const DEFAULT_SHORTENER_TIMEOUT: Duration = Duration::from_secs(2);

/// A [`Links`] decorator that registers links with an external shortener.
///
/// On create the shortened URL is stored when the shortener answers in
/// time; otherwise the original link is stored. On delete the alias is
/// released after the primary delete succeeded. Shortener failures are
/// logged and never change the result of the wrapped operation.
#[derive(Debug)]
pub struct ShorteningLinks<L, U> {
    inner: L,
    shortener: Arc<U>,
    timeout: Duration,
}

impl<L: Links, U: UrlShortener> ShorteningLinks<L, U> {
    pub fn new(inner: L, shortener: U) -> Self {
        Self {
            inner,
            shortener: Arc::new(shortener),
            timeout: DEFAULT_SHORTENER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn shorten_or_keep(&self, link: &str, alias: &Alias) -> String {
        match tokio::time::timeout(self.timeout, self.shortener.shorten(link, alias)).await {
            Ok(Ok(short)) => {
                debug!(alias = %alias, short = %short, "link shortened");
                short
            }
            Ok(Err(err)) => {
                warn!(alias = %alias, error = %err, "shortener failed, storing original link");
                link.to_owned()
            }
            Err(_) => {
                warn!(alias = %alias, timeout = ?self.timeout, "shortener timed out, storing original link");
                link.to_owned()
            }
        }
    }

    async fn release(&self, stored: &str) {
        let Some(segment) = last_path_segment(stored) else {
            debug!(link = %stored, "stored link has no path segment to release");
            return;
        };

        match tokio::time::timeout(self.timeout, self.shortener.release(&segment)).await {
            Ok(Ok(())) => debug!(alias = %segment, "shortened alias released"),
            Ok(Err(err)) => warn!(alias = %segment, error = %err, "failed to release alias"),
            Err(_) => warn!(alias = %segment, timeout = ?self.timeout, "alias release timed out"),
        }
    }
}

fn last_path_segment(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_owned)
}

#[async_trait]
impl<L: Links, U: UrlShortener> Links for ShorteningLinks<L, U> {
    async fn create(&self, user: UserId, topic: TopicId, alias: &Alias, link: &str) -> Result<()> {
        let stored = self.shorten_or_keep(link, alias).await;
        self.inner.create(user, topic, alias, &stored).await
    }

    async fn pick(&self, user: UserId, topic: TopicId, alias: &Alias) -> Result<String> {
        self.inner.pick(user, topic, alias).await
    }

    async fn delete(&self, user: UserId, topic: TopicId, alias: &Alias) -> Result<String> {
        let stored = self.inner.delete(user, topic, alias).await?;
        self.release(&stored).await;
        Ok(stored)
    }

    async fn list(&self, user: UserId, topic: TopicId) -> Result<LinkListing> {
        self.inner.list(user, topic).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkRegistry;
    use linker_core::error::{LinkerError, ShortenerError};
    use linker_core::model::{TopicName, Username};
    use linker_core::store::UserTopicLinkStore;
    use linker_storage::InMemoryStore;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Hang,
    }

    #[derive(Debug)]
    struct ScriptedShortener {
        behavior: Behavior,
        released: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedShortener {
        fn new(behavior: Behavior) -> (Self, Arc<Mutex<Vec<String>>>) {
            let released = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    behavior,
                    released: released.clone(),
                },
                released,
            )
        }

        async fn act(&self) -> std::result::Result<(), ShortenerError> {
            match self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(ShortenerError::Rejected("boom".to_string())),
                Behavior::Hang => std::future::pending().await,
            }
        }
    }

    #[async_trait]
    impl UrlShortener for ScriptedShortener {
        async fn shorten(
            &self,
            _url: &str,
            desired_alias: &Alias,
        ) -> std::result::Result<String, ShortenerError> {
            self.act().await?;
            Ok(format!("https://short.example/{desired_alias}"))
        }

        async fn release(&self, alias: &str) -> std::result::Result<(), ShortenerError> {
            self.act().await?;
            self.released.lock().unwrap().push(alias.to_string());
            Ok(())
        }
    }

    async fn setup(
        behavior: Behavior,
    ) -> (
        ShorteningLinks<LinkRegistry<InMemoryStore>, ScriptedShortener>,
        Arc<Mutex<Vec<String>>>,
        UserId,
        TopicId,
    ) {
        let store = InMemoryStore::new();
        let user = store
            .upsert_user(&Username::new_unchecked("alice1234"))
            .await
            .unwrap();
        let topic = store
            .insert_topic(user, &TopicName::new("reading").unwrap())
            .await
            .unwrap();
        let (shortener, released) = ScriptedShortener::new(behavior);
        let links = ShorteningLinks::new(LinkRegistry::new(Arc::new(store)), shortener)
            .with_timeout(Duration::from_millis(50));
        (links, released, user, topic)
    }

    fn alias(value: &str) -> Alias {
        Alias::new_unchecked(value)
    }

    #[tokio::test]
    async fn successful_shortening_stores_short_url() {
        let (links, released, user, topic) = setup(Behavior::Succeed).await;

        links
            .create(user, topic, &alias("doc1"), "https://example.com/long/path")
            .await
            .unwrap();
        assert_eq!(
            links.pick(user, topic, &alias("doc1")).await.unwrap(),
            "https://short.example/doc1"
        );

        links.delete(user, topic, &alias("doc1")).await.unwrap();
        assert_eq!(*released.lock().unwrap(), vec!["doc1".to_string()]);
    }

    #[tokio::test]
    async fn failing_shortener_keeps_original_link() {
        let (links, released, user, topic) = setup(Behavior::Fail).await;

        links
            .create(user, topic, &alias("doc1"), "https://example.com")
            .await
            .unwrap();
        assert_eq!(
            links.pick(user, topic, &alias("doc1")).await.unwrap(),
            "https://example.com"
        );

        let stored = links.delete(user, topic, &alias("doc1")).await.unwrap();
        assert_eq!(stored, "https://example.com");
        assert!(released.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn hanging_shortener_is_bounded() {
        let (links, _, user, topic) = setup(Behavior::Hang).await;

        links
            .create(user, topic, &alias("doc1"), "https://example.com/a")
            .await
            .unwrap();
        assert_eq!(
            links.delete(user, topic, &alias("doc1")).await.unwrap(),
            "https://example.com/a"
        );
    }

    #[tokio::test]
    async fn primary_failure_is_not_masked() {
        let (links, released, user, topic) = setup(Behavior::Succeed).await;

        let err = links.delete(user, topic, &alias("missing")).await.unwrap_err();

        assert!(matches!(err, LinkerError::AliasNotFound));
        assert!(released.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_alias_still_rejected() {
        let (links, _, user, topic) = setup(Behavior::Succeed).await;

        links
            .create(user, topic, &alias("doc1"), "https://one.example")
            .await
            .unwrap();
        let err = links
            .create(user, topic, &alias("doc1"), "https://two.example")
            .await
            .unwrap_err();

        assert!(matches!(err, LinkerError::AliasAlreadyExists));
    }

    #[test]
    fn last_segment_of_links() {
        assert_eq!(
            last_path_segment("https://short.example/abc").as_deref(),
            Some("abc")
        );
        assert_eq!(
            last_path_segment("https://short.example/x/abc/").as_deref(),
            Some("abc")
        );
        assert_eq!(last_path_segment("https://short.example"), None);
        assert_eq!(last_path_segment("mailto:someone@example.com"), None);
    }
}
