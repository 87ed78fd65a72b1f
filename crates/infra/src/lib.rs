//! # LinkBio Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The PostgREST data service adapter
//! - The hosted-auth identity provider
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `linkbio-core`
//! - Depends on `linkbio-domain` and `linkbio-core`
//! - Contains all "impure" code (HTTP, environment, files)

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod postgrest;
pub mod services;

// Re-export commonly used items
pub use auth::{AccessTokenProvider, SessionTokenStore, SupabaseIdentityProvider};
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::{init_tracing, LogFormat};
pub use postgrest::PostgrestDataService;
pub use services::LinkBioServices;
