//! Correlation ids for request tracking
//!
//! A listing request fans out to one task per repository. These ids tie every
//! log line emitted by those tasks back to the request that spawned them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh time-ordered id (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifies one listing request
    RequestId
);

correlation_id!(
    /// Trace id handed in by an upstream caller
    TraceId
);

/// Correlation carried into every per-repository task of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a caller-supplied request id
    pub fn with_request_id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Trace id for log fields; empty when none was supplied
    pub fn trace_id_str(&self) -> &str {
        self.trace_id.as_ref().map_or("", TraceId::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_request_contexts_differ() {
        let a = RequestContext::new();
        let b = RequestContext::new();
        assert_ne!(a.request_id, b.request_id);
        assert!(a.trace_id.is_none());
        assert_eq!(a.trace_id_str(), "");
    }

    #[test]
    fn test_adopted_ids() {
        let ctx = RequestContext::new()
            .with_request_id("req-1")
            .with_trace_id("trace-9");
        assert_eq!(ctx.request_id.to_string(), "req-1");
        assert_eq!(ctx.trace_id_str(), "trace-9");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = RequestId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
