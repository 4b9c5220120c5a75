use std::sync::Arc;

use linker_core::{Linker, LinkerError, MessageCatalog};
use tracing::debug;

use crate::error::GatewayError;

#[derive(Clone)]
pub struct AppState {
    linker: Arc<dyn Linker>,
    catalog: Arc<MessageCatalog>,
}

impl AppState {
    pub fn new(linker: Arc<dyn Linker>, catalog: Arc<MessageCatalog>) -> Self {
        Self { linker, catalog }
    }

    pub fn linker(&self) -> &dyn Linker {
        self.linker.as_ref()
    }

    /// Converts a domain error into the response sent to the client.
    ///
    /// Internal failures are already logged by the service.
    pub fn reject(&self, err: LinkerError) -> GatewayError {
        let rejection = GatewayError::from_linker(&err, &self.catalog);
        debug!(status = %rejection.status(), error = %err, "request rejected");
        rejection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use linker_service::LinkerService;
    use linker_storage::InMemoryStore;
    use linker_test_infra::ErrorEvents;

    #[test]
    fn internal_rejection_is_not_logged_again() {
        let state = AppState::new(
            Arc::new(LinkerService::with_store(InMemoryStore::new())),
            Arc::new(MessageCatalog::api()),
        );
        let events = ErrorEvents::capture();

        let rejection = state.reject(LinkerError::Internal("pool closed".to_string()));

        assert_eq!(rejection.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(events.count(), 0);
    }
}
