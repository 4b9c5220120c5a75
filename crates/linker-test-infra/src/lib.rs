//! Disposable containers and log capture for tests.

pub mod error;
pub mod logs;
pub mod mongo;
pub mod postgres;

pub use error::{Result, TestInfraError};
pub use logs::ErrorEvents;
