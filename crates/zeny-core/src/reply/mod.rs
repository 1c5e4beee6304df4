//! ReplyGenerator trait: the only coupling between conversations and text
//! generation.
//!
//! The conversation service calls this after storing every non-avatar
//! message. A deterministic template implementation ships in [`template`];
//! a model-backed generator can be swapped in without touching the service.

pub mod template;

use thiserror::Error;

/// Reply generation failed.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply generator unavailable: {0}")]
    Unavailable(String),
}

/// Produces the avatar's reply to one inbound message.
pub trait ReplyGenerator: Send + Sync {
    fn generate_reply(
        &self,
        persona_name: &str,
        persona_personality: &str,
        triggering_text: &str,
    ) -> impl std::future::Future<Output = Result<String, ReplyError>> + Send;
}
