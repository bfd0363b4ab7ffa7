//! # Taskdeck Shared Library
//!
//! This crate contains the types, storage interfaces, and authentication
//! machinery shared by the Taskdeck API server.
//!
//! ## Module Organization
//!
//! - `models`: Account, task, and comment data structures
//! - `store`: Credential and task store traits with Postgres and in-memory
//!   implementations
//! - `auth`: Password hashing, access-token codec, session manager, and the
//!   authorization policy
//! - `db`: Connection pool and migration helpers

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
