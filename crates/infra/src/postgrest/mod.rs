//! PostgREST adapter for the remote data service port

pub mod client;
pub mod errors;
pub mod query;

pub use client::PostgrestDataService;
pub use errors::PostgrestError;
