//! Sourdough Gateway Client
//!
//! Provides a typed HTTP client for the gateway's generic record API. Every
//! record call resolves to an [`Envelope`]; transport failures and non-2xx
//! responses are normalized into `{ success: false, error }` so callers only
//! handle one failure shape.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::{json, Value};
//! use sourdough_client::{Environment, GatewayClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::for_environment(&Environment::Development)?;
//!
//!     let created = client
//!         .create::<Value, _>("contacts", &json!({"name": "Ada", "email": "ada@example.com"}))
//!         .await;
//!     if !created.success {
//!         eprintln!("{}", created.error.unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module runs a router on an ephemeral port:
//!
//! ```rust,ignore
//! use sourdough_client::testing::TestServer;
//! use sourdough_api::{create_router, AppState};
//!
//! let server = TestServer::start(create_router(state)).await?;
//! let contacts = server.client.list::<Value>("contacts", &Filters::new()).await;
//! ```

mod client;
mod error;
pub mod testing;
mod types;

pub use client::{Environment, GatewayClient, DEVELOPMENT_BASE_URL};
pub use error::{ClientError, Result};
pub use types::*;

// Re-export core types for convenience
pub use sourdough_core::{Envelope, Filters, Record, RecordId, ID_FIELD};
