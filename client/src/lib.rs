//! Client for the judicial bench-manual review service.
//!
//! Three thin components cooperate over the service's JSON API: the session
//! manager gates access and persists credentials across runs, the registry
//! cache mirrors the server's manual sections, and the submission workflow
//! fans a four-field review form out into entry writes and folds the
//! replies back into the cache.

pub mod app;
pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;
