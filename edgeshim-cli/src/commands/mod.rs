//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`build_id`] - Print the build id
//! - [`resolve`] - Resolve a page to its built file
//! - [`cat`] - Print an asset

pub mod build_id;
pub mod cat;
pub mod resolve;
