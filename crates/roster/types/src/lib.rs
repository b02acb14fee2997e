//! Roster Domain Types
//!
//! This crate defines the domain types for assigning people to roles within
//! one assignment context (an event, or a group being created).
//!
//! # Key Concepts
//!
//! - **Member**: a person eligible for assignment, supplied by the directory.
//! - **Role Catalog**: the named slots a context defines, which of them keep
//!   an explicit order, how many members each may hold, and which roles form
//!   **exclusivity groups** (a person holds at most one role per group).
//! - **Assignment Set**: role → ordered list of assignments, with diffing and
//!   a flat record form for persistence.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. Every mutation is
//! synchronous and all-or-nothing: inputs are validated before anything is
//! touched. IDs use the newtype pattern and implement `Display` and `new()`.

#![deny(unsafe_code)]

mod assignment;
mod context;
mod diff;
mod errors;
mod member;
mod record;
mod role;

pub use assignment::*;
pub use context::*;
pub use diff::*;
pub use errors::*;
pub use member::*;
pub use record::*;
pub use role::*;
