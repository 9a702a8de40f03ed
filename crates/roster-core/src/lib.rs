//! # Roster Core
//!
//! Core types and error definitions for Roster.
//! This crate provides the domain entities, typed ids, and the unified
//! error taxonomy shared by every layer above it.

pub mod error;
pub mod id;
pub mod result;
pub mod user;

pub use error::*;
pub use id::*;
pub use result::*;
pub use user::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
