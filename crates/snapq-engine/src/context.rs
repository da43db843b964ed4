use snapq_core::errors::{ExError, Result};
use snapq_core_types::RequestContext;
use tokio_util::sync::CancellationToken;

/// Per-request execution context: correlation ids and cancellation
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub request: RequestContext,
    pub cancel: CancellationToken,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with `Cancelled` once the token has fired
    ///
    /// # Errors
    ///
    /// `Cancelled`, tagged with `op` and the request id.
    pub fn checkpoint(&self, op: &str) -> Result<()> {
        if self.is_cancelled() {
            Err(ExError::cancelled(op).with_request_id(self.request.request_id.clone()))
        } else {
            Ok(())
        }
    }
}
