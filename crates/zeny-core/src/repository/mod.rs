//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (zeny-infra) implements. The core crate never depends on any specific
//! storage technology.

pub mod avatar;
pub mod conversation;
pub mod summary;
pub mod user;
