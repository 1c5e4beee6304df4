//! Shared domain types for Zeny.
//!
//! This crate contains the domain types used across the Zeny service:
//! users, avatar personas, conversations, summaries, service configuration
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod avatar;
pub mod config;
pub mod conversation;
pub mod error;
mod id;
pub mod summary;
pub mod user;
