//! Application state wiring all services together.
//!
//! Services are generic over repository/hasher/token traits, but AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use chrono::Duration;
use secrecy::SecretString;
use zeny_core::auth::identity::{BootstrapOutcome, IdentityService};
use zeny_core::reply::template::TemplateReplyGenerator;
use zeny_core::service::avatar::AvatarService;
use zeny_core::service::conversation::ConversationService;
use zeny_core::service::summary::SummaryService;
use zeny_infra::crypto::password::Argon2CredentialHasher;
use zeny_infra::crypto::token::HmacTokenService;
use zeny_infra::sqlite::avatar::SqliteAvatarRepository;
use zeny_infra::sqlite::conversation::SqliteConversationRepository;
use zeny_infra::sqlite::pool::DatabasePool;
use zeny_infra::sqlite::summary::SqliteSummaryRepository;
use zeny_infra::sqlite::user::SqliteUserRepository;
use zeny_types::config::ServiceConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteIdentityService =
    IdentityService<SqliteUserRepository, Argon2CredentialHasher, HmacTokenService>;

pub type ConcreteAvatarService = AvatarService<SqliteAvatarRepository>;

pub type ConcreteConversationService = ConversationService<
    SqliteConversationRepository,
    SqliteAvatarRepository,
    TemplateReplyGenerator,
>;

pub type ConcreteSummaryService = SummaryService<
    SqliteSummaryRepository,
    SqliteConversationRepository,
    SqliteAvatarRepository,
>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<ConcreteIdentityService>,
    pub avatars: Arc<ConcreteAvatarService>,
    pub conversations: Arc<ConcreteConversationService>,
    pub summaries: Arc<ConcreteSummaryService>,
}

impl AppState {
    /// Wire every service over an already opened pool.
    pub fn from_pool(db_pool: DatabasePool, token_secret: &SecretString, token_ttl: Duration) -> Self {
        let identity = IdentityService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2CredentialHasher::new(),
            HmacTokenService::new(token_secret, token_ttl),
        );

        let avatars = AvatarService::new(SqliteAvatarRepository::new(db_pool.clone()));

        let conversations = ConversationService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteAvatarRepository::new(db_pool.clone()),
            TemplateReplyGenerator::new(),
        );

        let summaries = SummaryService::new(
            SqliteSummaryRepository::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteAvatarRepository::new(db_pool),
        );

        Self {
            identity: Arc::new(identity),
            avatars: Arc::new(avatars),
            conversations: Arc::new(conversations),
            summaries: Arc::new(summaries),
        }
    }

    /// Initialize the application state: validate config, open the store
    /// (running migrations), wire services and bootstrap the admin account.
    pub async fn init(config: &ServiceConfig) -> anyhow::Result<(Self, BootstrapOutcome)> {
        config.validate()?;

        let db_pool = DatabasePool::open(&config.store).await?;
        let ttl = Duration::hours(i64::from(config.settings.auth.token_ttl_hours));
        let state = Self::from_pool(db_pool, &config.token_secret, ttl);

        let outcome = state.identity.ensure_bootstrap_admin(&config.admin).await?;
        Ok((state, outcome))
    }
}
