//! Business logic and repository trait definitions for Zeny.
//!
//! This crate defines the "ports" (repository, hashing, token and reply
//! generation traits) that the infrastructure layer implements, plus the
//! services that enforce the domain rules on top of them. It depends only on
//! `zeny-types` -- never on `zeny-infra` or any database/IO crate.

pub mod auth;
pub mod reply;
pub mod repository;
pub mod service;
pub mod text;

#[cfg(test)]
pub(crate) mod testing;
