//! Outbound adapters: HTTP transport and local credential storage.

pub mod http;
pub mod storage;

pub use http::{HttpAuthenticationService, HttpManualGateway};
pub use storage::JsonFileCredentialStore;
