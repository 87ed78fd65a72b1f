//! # LinkBio Domain
//!
//! Business domain types and models for LinkBio.
//!
//! This crate contains:
//! - Profile, theme and link records plus their partial-update forms
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Caller-facing validation rules
//!
//! ## Architecture
//! - No dependencies on other LinkBio crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::{FieldError, ValidationError, ValidationResult};
