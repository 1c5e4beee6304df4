//! Domain services enforcing the persona, conversation and summary rules.

pub mod avatar;
pub mod conversation;
pub mod summary;
