use linker_core::{ErrorClass, LinkerError, MessageCatalog};
use std::sync::Arc;
use tonic::{Code, Status};
use tracing::debug;

pub(crate) fn code_for(class: ErrorClass) -> Code {
    match class {
        ErrorClass::InvalidArgument => Code::InvalidArgument,
        ErrorClass::NotFound => Code::NotFound,
        ErrorClass::AlreadyExists => Code::AlreadyExists,
        ErrorClass::Internal => Code::Internal,
    }
}

/// Turns domain errors into gRPC statuses carrying catalog messages.
#[derive(Debug, Clone)]
pub(crate) struct StatusMapper {
    catalog: Arc<MessageCatalog>,
}

impl StatusMapper {
    pub(crate) fn new(catalog: Arc<MessageCatalog>) -> Self {
        Self { catalog }
    }

    /// Internal failures are already logged by the service.
    pub(crate) fn status(&self, err: LinkerError) -> Status {
        let code = code_for(err.kind().class());
        debug!(code = ?code, error = %err, "request rejected");
        Status::new(code, self.catalog.for_error(&err))
    }
}
