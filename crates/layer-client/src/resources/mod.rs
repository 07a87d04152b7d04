//! API resource endpoints
//!
//! One handle per resource family, borrowed from the [`Client`]. Every
//! operation builds one request, runs it through the client's backoff
//! executor, then checks the final status against what that operation
//! accepts before decoding.

pub mod conversations;
pub mod identities;
pub mod messages;
pub mod webhooks;

pub use conversations::Conversations;
pub use identities::Identities;
pub use messages::Messages;
pub use webhooks::WebHooks;

use crate::client::Client;

/// Base trait for API resources.
pub trait Resource {
    /// Get a reference to the client.
    fn client(&self) -> &Client;
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::client::Client;
    use crate::http::{BackoffPolicy, PreparedRequest, Transport, TransportResponse};
    use async_trait::async_trait;
    use http::StatusCode;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replies with queued responses and keeps every request it saw.
    #[derive(Debug, Default)]
    pub(crate) struct StubTransport {
        replies: Mutex<VecDeque<(u16, String)>>,
        seen: Mutex<Vec<PreparedRequest>>,
    }

    impl StubTransport {
        pub(crate) fn reply(self: &Arc<Self>, status: u16, body: impl Into<String>) -> Arc<Self> {
            self.replies
                .lock()
                .unwrap()
                .push_back((status, body.into()));
            Arc::clone(self)
        }

        pub(crate) fn requests(&self) -> Vec<PreparedRequest> {
            self.seen.lock().unwrap().clone()
        }

        pub(crate) fn last(&self) -> PreparedRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }

        pub(crate) fn last_body(&self) -> serde_json::Value {
            serde_json::from_slice(self.last().body().unwrap()).unwrap()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: &PreparedRequest) -> anyhow::Result<TransportResponse> {
            self.seen.lock().unwrap().push(request.clone());
            let (status, body) = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((200, "{}".to_string()));
            Ok(TransportResponse::new(
                StatusCode::from_u16(status)?,
                body,
            ))
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    /// A client with a single-attempt policy wired to `transport`.
    pub(crate) fn client(transport: &Arc<StubTransport>) -> Client {
        Client::builder()
            .account_id("app-1")
            .token("tok")
            .base_url("https://api.example.com")
            .backoff(BackoffPolicy::none())
            .transport(transport.clone())
            .build()
            .unwrap()
    }
}
