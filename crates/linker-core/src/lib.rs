//! Core types and traits for the linker bookmarking service.
//!
//! This crate provides the domain types, the error taxonomy and the
//! traits shared by the storage backends, the service layer and every
//! front-end (gRPC, HTTP and chat bot).

pub mod alias;
pub mod error;
pub mod linker;
pub mod messages;
pub mod model;
pub mod shortener;
pub mod store;

pub use alias::{AliasGenerator, RandomAliasGenerator};
pub use error::{ErrorClass, ErrorKind, LinkerError, ShortenerError, StorageError};
pub use linker::{CreateLinkParams, LinkListing, Linker};
pub use messages::MessageCatalog;
pub use model::{Alias, LinkEntry, LinkUrl, TopicId, TopicName, UserId, Username};
pub use shortener::UrlShortener;
pub use store::UserTopicLinkStore;
