//! # LinkBio Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the remote data service and identity provider
//! - The per-session table resolver
//! - Profile loading, mutation and public read services
//!
//! ## Architecture Principles
//! - Only depends on `linkbio-domain`
//! - No HTTP or wire-format code
//! - All external dependencies via traits

pub mod profile;

pub use profile::ports::{DataService, Filter, IdentityProvider, Order, Row, SelectQuery};
pub use profile::{
    ProfileLoad, ProfileLoader, ProfileMutator, ProfileSession, PublicProfileReader,
    TableResolver,
};
