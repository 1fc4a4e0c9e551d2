//! # apinode - typed client for paginated, token-authenticated REST APIs
//!
//! A blocking Rust client for REST APIs that authenticate with an opaque
//! app access token and wrap their payloads in optional `data` / `meta`
//! envelopes. It resolves every response shape into a typed, paginated
//! list of entities and regenerates the access token when it expires.
//!
//! ## Features
//!
//! - Endpoint tables with positional path placeholders (`entities/%s`)
//! - Transparent handling of response shapes:
//!   - bare objects and bare arrays
//!   - `{"data": {...}}`, `{"data": [...]}` and `{"data": {"<key>": [...]}}`
//!   - `meta.pagination` with forward-only `next_page`
//! - One automatic token regeneration and retry on HTTP 401
//! - Entities keep the exact JSON they were decoded from
//! - Pluggable HTTP transport, `reqwest` by default
//! - Cancellation of in-flight calls and retry delays
//!
//! ## Basic Usage
//!
//! ```no_run
//! use apinode::{endpoint, ApiContext, ApiRequest, Entity, NodeMeta};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Item {
//!     id: String,
//!     name: String,
//!     #[serde(skip)]
//!     meta: NodeMeta,
//! }
//!
//! impl Entity for Item {
//!     fn id(&self) -> Option<&str> {
//!         Some(&self.id)
//!     }
//!     fn meta(&self) -> &NodeMeta {
//!         &self.meta
//!     }
//!     fn meta_mut(&mut self) -> &mut NodeMeta {
//!         &mut self.meta
//!     }
//! }
//!
//! fn main() -> Result<(), apinode::ApiError> {
//!     let ctx = ApiContext::new("my-app-id", "my-app-secret")?;
//!
//!     let request = ApiRequest::new(&ctx, &endpoint::GET_ENTITIES, &[])?
//!         .with_param("limit", 50);
//!     let mut page = request.execute::<Item>()?;
//!
//!     loop {
//!         for item in &page {
//!             println!("{} ({})", item.name, item.id);
//!         }
//!         if !page.has_next_page() {
//!             break;
//!         }
//!         page = page.next_page_with(50)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use apinode::{ApiContext, Config};
//! use std::time::Duration;
//!
//! let config = Config::new("https://api.example.com", "v2")
//!     .with_retry_token_delay(Duration::from_millis(250))
//!     .with_items_per_page(100);
//!
//! let ctx = ApiContext::builder("my-app-id", "my-app-secret")
//!     .config(config)
//!     .token("previously-issued-token")
//!     .build()?;
//! # Ok::<(), apinode::ApiError>(())
//! ```
//!
//! ## Concurrency
//!
//! Calls are synchronous. A context may be shared across threads, but token
//! regeneration is not coordinated between concurrent calls on the same
//! context; serialize them if that matters.

pub mod app;
pub mod cancel;
pub mod client;
pub mod context;
mod dispatch;
pub mod endpoint;
pub mod entity;
pub mod error;
pub mod node_list;
pub mod pagination;
pub mod request;
pub mod resolver;
pub mod time;
pub mod transport;

// Re-export main types for convenience
pub use app::App;
pub use cancel::CancelToken;
pub use client::Config;
pub use context::{ApiContext, ApiContextBuilder};
pub use endpoint::{Endpoint, HttpMethod};
pub use entity::{decode, Entity, NodeMeta};
pub use error::{ApiError, Result};
pub use node_list::NodeList;
pub use pagination::Pagination;
pub use request::{ApiRequest, Param};
pub use resolver::resolve;
pub use time::Time;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

// Re-export serde_json for convenience
pub use serde_json::json;
