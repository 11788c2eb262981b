// terra-api: Async Rust client for the Terra DC SDN controller REST API
//
// Transport with connectivity retry, bearer-token session, identifier
// resolution by (origin, original_id), and one endpoint group per resource.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod requests;
pub mod resolve;
mod resources;
pub mod retry;
pub mod transport;

pub use auth::{Credentials, Session};
pub use client::TerraClient;
pub use config::ClientConfig;
pub use error::Error;
pub use reqwest::Method;
pub use resolve::{ResourceKind, ResourceRef};
pub use retry::RetryPolicy;
pub use transport::{TlsMode, TransportConfig};
