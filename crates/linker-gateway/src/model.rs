//! Request and response bodies. Missing request fields deserialize as
//! empty strings so the service validates them like any other front-end.

mod link;
mod topic;

use serde::Serialize;

pub use link::*;
pub use topic::*;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: &'static str,
}
