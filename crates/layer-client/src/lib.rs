//! # Layer Client
//!
//! Async Rust client for the Layer Platform API:
//! - Conversations, messages and identities
//! - Webhook registration and delivery payload types
//! - Exponential backoff on every request, with per-attempt observation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use layer_client::{BackoffPolicy, Client, NewConversation, NewMessage, Sender};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("app-id", "platform-token", "1.0", BackoffPolicy::default())?;
//!
//!     let conversation = client
//!         .conversations()
//!         .create(&NewConversation::new(["alice", "bob"]).distinct(true))
//!         .await?;
//!
//!     let message = client
//!         .messages()
//!         .send(&conversation.id, &NewMessage::new(Sender::user("alice")).text("Hello!"))
//!         .await?;
//!
//!     println!("{}", message.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! Each operation is retried under a [`BackoffPolicy`] until a status in
//! `200..=398` arrives. When every attempt fails the error is
//! [`Error::Exhausted`], carrying one entry per attempt.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{AggregatedFailure, AttemptError, Error, HttpStatusError, Result};
pub use crate::http::{BackoffExecutor, BackoffPolicy};
pub use ids::{extract_uuid, parse_uuid};
pub use observability::{AttemptObserver, AttemptRecord};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod ids;
pub mod observability;
pub mod resources;
pub mod types;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;
pub use serde_json::Value as JsonValue;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use layer_client::prelude::*;
/// ```
pub mod prelude {

    pub use crate::{
        BackoffPolicy, Client, ClientConfig, Error, Result,
        types::{
            Conversation, EditOperation, Identity, Message, NewConversation, NewMessage,
            NewWebHook, Page, Sender, WebHook,
        },
    };
}

/// Client version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.layer.com";

/// Default API version sent in the `Accept` header
pub const DEFAULT_API_VERSION: &str = "1.0";
