//! Request-scoped context handed to collection factories.
//!
//! The binder never inspects the payload; it only threads it through to
//! [`CollectionFactory::collection`](crate::CollectionFactory::collection).

use std::any::Any;
use std::sync::Arc;

/// Opaque request-scoped data, e.g. the caller's authentication.
#[derive(Clone, Default)]
pub struct RequestContext {
    /// Request ID for tracing and correlation.
    request_id: Option<String>,
    data: Option<Arc<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates a context carrying `data`.
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self {
            request_id: None,
            data: Some(Arc::new(data)),
        }
    }

    /// Creates a context without payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Returns the request ID, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the payload if it is of type `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.data.as_deref().and_then(|data| data.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}
