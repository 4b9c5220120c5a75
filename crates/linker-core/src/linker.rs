use crate::error::Result;
use crate::model::{Alias, LinkEntry, TopicId};
use async_trait::async_trait;
use serde::Serialize;

/// Raw, unvalidated parameters for creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLinkParams {
    pub username: String,
    pub topic: String,
    /// The URL to store.
    pub link: String,
    /// Optional alias; `None` or an empty string means "generate one".
    pub alias: Option<String>,
}

/// Links of a topic as parallel arrays: `aliases[i]` names `links[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkListing {
    pub links: Vec<String>,
    pub aliases: Vec<String>,
}

impl LinkListing {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterates `(alias, link)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .zip(self.links.iter())
            .map(|(alias, link)| (alias.as_str(), link.as_str()))
    }
}

impl FromIterator<LinkEntry> for LinkListing {
    fn from_iter<I: IntoIterator<Item = LinkEntry>>(iter: I) -> Self {
        let (aliases, links) = iter
            .into_iter()
            .map(|entry| (entry.alias, entry.link))
            .unzip();
        Self { links, aliases }
    }
}

/// The operations every front-end exposes.
///
/// Implementations validate their raw string inputs before touching any
/// store and report failures as [`LinkerError`](crate::LinkerError).
#[async_trait]
pub trait Linker: Send + Sync + 'static {
    /// Creates a topic, creating the user on first use. Returns the topic id.
    async fn create_topic(&self, username: &str, topic: &str) -> Result<TopicId>;

    /// Deletes a topic and all of its links. Returns the removed topic's id.
    async fn delete_topic(&self, username: &str, topic: &str) -> Result<TopicId>;

    /// Lists topic names of a user.
    async fn list_topics(&self, username: &str) -> Result<Vec<String>>;

    /// Creates a link and returns its alias, generated if none was given.
    async fn create_link(&self, params: CreateLinkParams) -> Result<Alias>;

    /// Returns the link stored under an alias.
    async fn pick_link(&self, username: &str, topic: &str, alias: &str) -> Result<String>;

    /// Deletes a link and returns its alias.
    async fn delete_link(&self, username: &str, topic: &str, alias: &str) -> Result<Alias>;

    /// Lists every link of a topic.
    async fn list_links(&self, username: &str, topic: &str) -> Result<LinkListing>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_keeps_pairs_aligned() {
        let listing: LinkListing = vec![
            LinkEntry {
                alias: "a".to_string(),
                link: "https://a.example".to_string(),
            },
            LinkEntry {
                alias: "b".to_string(),
                link: "https://b.example".to_string(),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing.aliases, vec!["a", "b"]);
        assert_eq!(listing.links, vec!["https://a.example", "https://b.example"]);
        let pairs: Vec<_> = listing.iter().collect();
        assert_eq!(pairs[1], ("b", "https://b.example"));
    }

    #[test]
    fn empty_listing() {
        let listing: LinkListing = std::iter::empty().collect();
        assert!(listing.is_empty());
        assert!(listing.aliases.is_empty());
    }
}
