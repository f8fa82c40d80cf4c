/// Application context and dependency injection
use crate::{
    activity::ActivityLog,
    admin::{
        AdminSession, Dashboard, ModerationQueue, PlatformConfig, PremiumAdmin, UserDirectory,
        VerificationQueue,
    },
    billing::PaymentLedger,
    config::{ServerConfig, StoreBackend},
    error::AmoraResult,
    matching::{MatchingService, RandomMatching},
    member::{
        AuthService, ChatService, DiscoveryService, LikedYouService, OnboardingService,
        PremiumService, ProfileService, SafetyService, SettingsService,
    },
    store::{sqlite::DatabaseOptions, DocumentStore, MemoryStore, Repository, SqliteStore},
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub repo: Repository,
    pub activity: ActivityLog,
    // Member
    pub auth: AuthService,
    pub onboarding: OnboardingService,
    pub profile: ProfileService,
    pub discovery: DiscoveryService,
    pub liked_you: LikedYouService,
    pub chats: ChatService,
    pub settings: SettingsService,
    pub safety: SafetyService,
    pub premium: PremiumService,
    // Admin
    pub admin_session: AdminSession,
    pub dashboard: Dashboard,
    pub users: UserDirectory,
    pub verification: VerificationQueue,
    pub moderation: ModerationQueue,
    pub premium_admin: PremiumAdmin,
    pub platform: PlatformConfig,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> AmoraResult<Self> {
        // Validate configuration
        config.validate()?;

        let store: Arc<dyn DocumentStore> = match &config.storage.backend {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory document store");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Sqlite { path } => {
                tracing::info!("Opening SQLite document store at {:?}", path);
                let store = SqliteStore::open(path, DatabaseOptions::default()).await?;
                store.ping().await?;
                Arc::new(store)
            }
        };

        let matching = Arc::new(RandomMatching::from_config(&config.matching));
        Ok(Self::with_store(config, store, matching))
    }

    /// Wire every service over an existing store and matching source
    pub fn with_store(
        config: ServerConfig,
        store: Arc<dyn DocumentStore>,
        matching: Arc<dyn MatchingService>,
    ) -> Self {
        let config = Arc::new(config);
        let repo = Repository::new(store);
        let activity = ActivityLog::new(repo.clone());
        let ledger = PaymentLedger::new(repo.clone());

        let users = UserDirectory::new(repo.clone(), activity.clone());
        let verification = VerificationQueue::new(repo.clone(), users.clone(), activity.clone());
        let moderation = ModerationQueue::new(repo.clone(), users.clone(), activity.clone());
        let dashboard = Dashboard::new(
            users.clone(),
            verification.clone(),
            moderation.clone(),
            ledger.clone(),
            activity.clone(),
        );

        Self {
            auth: AuthService::new(repo.clone(), config.clone()),
            onboarding: OnboardingService::new(repo.clone()),
            profile: ProfileService::new(repo.clone()),
            discovery: DiscoveryService::new(repo.clone(), matching.clone()),
            liked_you: LikedYouService::new(repo.clone(), matching),
            chats: ChatService::new(repo.clone()),
            settings: SettingsService::new(repo.clone()),
            safety: SafetyService::new(repo.clone()),
            premium: PremiumService::new(repo.clone(), ledger.clone()),
            admin_session: AdminSession::new(repo.clone(), config.clone(), activity.clone()),
            premium_admin: PremiumAdmin::new(repo.clone(), users.clone(), ledger, activity.clone()),
            platform: PlatformConfig::new(repo.clone(), activity.clone()),
            dashboard,
            users,
            verification,
            moderation,
            activity,
            repo,
            config,
        }
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
