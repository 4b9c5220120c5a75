//! Storage backends for the linker service.
//!
//! Every backend implements [`UserTopicLinkStore`]; a process picks one at
//! startup and never mixes them. PostgreSQL and MongoDB are the durable
//! backends; the in-memory store keeps nothing across restarts and is meant
//! for development and tests.

pub mod memory;
pub mod mongo;
pub mod postgres;

pub use linker_core::error::StorageError;
pub use linker_core::store::UserTopicLinkStore;
pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use postgres::PostgresStore;
