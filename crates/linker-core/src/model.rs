use crate::error::LinkerError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Usernames shorter than this are rejected before any store access.
pub const MIN_USERNAME_LENGTH: usize = 8;

/// Numeric identifier of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Numeric identifier of a topic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated username.
///
/// Usernames are case-sensitive and must be at least
/// [`MIN_USERNAME_LENGTH`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(name: impl Into<String>) -> Result<Self, LinkerError> {
        let name = name.into();
        if name.chars().count() < MIN_USERNAME_LENGTH {
            return Err(LinkerError::InvalidUsername {
                min: MIN_USERNAME_LENGTH,
            });
        }
        Ok(Self(name))
    }

    /// Creates a `Username` without the length check.
    ///
    /// Stores accept any username; only the front-ends enforce the length.
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A non-empty topic name, unique per user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicName(String);

impl TopicName {
    pub fn new(name: impl Into<String>) -> Result<Self, LinkerError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LinkerError::EmptyTopic);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A non-empty alias, unique per (user, topic).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(String);

impl Alias {
    pub fn new(alias: impl Into<String>) -> Result<Self, LinkerError> {
        let alias = alias.into();
        if alias.is_empty() {
            return Err(LinkerError::EmptyAlias);
        }
        Ok(Self(alias))
    }

    /// Creates an `Alias` without validation.
    ///
    /// Use this only for aliases produced by an
    /// [`AliasGenerator`](crate::alias::AliasGenerator) or read back from a store.
    pub fn new_unchecked(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A link value that passed URL syntax validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkUrl(String);

impl LinkUrl {
    /// Parses `link` as an absolute URL. The original text is kept as-is.
    pub fn parse(link: impl Into<String>) -> Result<Self, LinkerError> {
        let link = link.into();
        if link.is_empty() {
            return Err(LinkerError::InvalidLink("link is empty".to_string()));
        }
        url::Url::parse(&link).map_err(|e| LinkerError::InvalidLink(format!("{link}: {e}")))?;
        Ok(Self(link))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

impl_display!(Username, TopicName, Alias, LinkUrl);

/// A stored link together with its alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub alias: String,
    pub link: String,
}
