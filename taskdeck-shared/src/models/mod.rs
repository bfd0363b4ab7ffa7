/// Data models for Taskdeck
///
/// This module contains the persistent data structures shared between the
/// stores and the API layer.
///
/// # Models
///
/// - `account`: User accounts, roles, and the single-slot refresh token
/// - `task`: Tasks with status, priority, and assignee
/// - `comment`: Comments attached to tasks

pub mod account;
pub mod comment;
pub mod task;
