//! HTTP/REST API layer for Zeny.
//!
//! Axum-based REST API at `/api/` with bearer token authentication, raw JSON
//! success bodies, an error envelope, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
