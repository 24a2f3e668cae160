//! iconloom Core - Foundational types for the iconloom pipeline
//!
//! This crate provides the types every other iconloom crate depends on:
//! - `IconloomError` and the `Result` alias
//! - `ContentHash` - SHA-256 based content hashing for rendered files

mod error;
mod hash;

pub use error::{IconloomError, Result};
pub use hash::ContentHash;
