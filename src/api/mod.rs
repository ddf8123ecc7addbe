//! # API Module
//!
//! Business logic behind the medical record endpoints.
//!
//! ## Modules
//!
//! - [`token`] - Bearer token verification and caller identity
//! - [`ownership`] - Pet ownership checks against the pet directory
//! - [`revision`] - Append-only revision engine used by updates
//! - [`medical`] - The create, read, update and delete operations

pub mod medical;
pub mod ownership;
pub mod revision;
pub mod token;
