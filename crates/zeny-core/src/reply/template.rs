//! Deterministic, template-based reply generator.

use crate::reply::{ReplyError, ReplyGenerator};
use crate::text::prefix;

/// Characters of the inbound message quoted back in the reply.
const QUOTED_CHARS: usize = 50;

/// Characters of the personality text echoed in the reply.
const PERSONALITY_CHARS: usize = 100;

/// Echoes a prefix of the inbound message and of the avatar's personality.
///
/// Never fails. Stands in for a real language model.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateReplyGenerator;

impl TemplateReplyGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReplyGenerator for TemplateReplyGenerator {
    async fn generate_reply(
        &self,
        persona_name: &str,
        persona_personality: &str,
        triggering_text: &str,
    ) -> Result<String, ReplyError> {
        Ok(format!(
            "As {persona_name}, I understand your message about '{}...'. \
             Let me respond based on my personality: {}...",
            prefix(triggering_text, QUOTED_CHARS),
            prefix(persona_personality, PERSONALITY_CHARS),
        ))
    }
}
