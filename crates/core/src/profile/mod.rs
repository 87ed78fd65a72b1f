//! Profile data synchronization
//!
//! Table resolution, owner-side loading and mutation, and the anonymous
//! public read path, all behind the [`ports::DataService`] boundary.

pub mod loader;
pub mod mutator;
pub mod ports;
pub mod public;
pub mod resolver;
mod rows;
pub mod session;

pub use loader::{ProfileLoad, ProfileLoader};
pub use mutator::ProfileMutator;
pub use ports::*;
pub use public::PublicProfileReader;
pub use resolver::TableResolver;
pub use session::ProfileSession;
