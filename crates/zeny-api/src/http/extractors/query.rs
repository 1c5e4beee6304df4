//! Query parameter extractors for list endpoints.

use serde::Deserialize;
use zeny_types::avatar::AvatarId;

/// Query parameters for the conversation and summary list endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct AvatarFilterQuery {
    /// Restrict results to one avatar.
    pub avatar_id: Option<AvatarId>,
}
