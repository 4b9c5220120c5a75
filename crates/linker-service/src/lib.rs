//! Service layer of the linker.
//!
//! Registries for users, topics and links sit on top of a
//! [`UserTopicLinkStore`](linker_core::UserTopicLinkStore). [`LinkerService`]
//! validates raw requests, runs them under a deadline and implements the
//! [`Linker`](linker_core::Linker) trait every front-end talks to.

pub mod bootstrap;
pub mod http_shortener;
pub mod identity;
pub mod links;
pub mod service;
pub mod shortening;
pub mod topics;

pub use bootstrap::{BootstrapError, ServiceArgs, StorageBackendArg};
pub use http_shortener::HttpUrlShortener;
pub use links::{LinkRegistry, Links};
pub use service::LinkerService;
pub use shortening::ShorteningLinks;
