//! Typed endpoint functions.
//!
//! Each function builds a [`RequestDescriptor`](crate::transport::RequestDescriptor)
//! and runs it through the executor. Most callers use the same operations
//! through [`ProjectDeskClient`](crate::ProjectDeskClient).

pub mod admin;
pub mod auth;
pub mod health;
pub mod projects;
pub mod users;
