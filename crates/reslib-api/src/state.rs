//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use reslib_core::config::AppConfig;
use reslib_core::traits::ExpiryScheduler;
use reslib_database::Stores;
use reslib_lease::{CollectionLocks, LeaseManager, TokenIssuer, TokenVerifier};
use reslib_service::{CollectionBrowser, ProjectService, ResourceService, TemplateService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the state was built
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Document stores
    pub stores: Stores,

    // ── Sessions ─────────────────────────────────────────────
    /// Lease manager: sessions, checkouts and subresources
    pub lease: LeaseManager,
    /// Bearer credential verifier
    pub verifier: Arc<TokenVerifier>,

    // ── Services ─────────────────────────────────────────────
    /// Template catalog
    pub template_service: Arc<TemplateService>,
    /// Project catalog
    pub project_service: Arc<ProjectService>,
    /// Resource catalog
    pub resource_service: Arc<ResourceService>,
    /// Read-only collection dumps
    pub collection_browser: Arc<CollectionBrowser>,
}

impl AppState {
    /// Wire the lease manager and catalog services over `stores`.
    ///
    /// All of them share one collection lock set.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        scheduler: Arc<dyn ExpiryScheduler>,
        signing_key: &[u8],
    ) -> Self {
        let locks = Arc::new(CollectionLocks::new());

        let lease = LeaseManager::new(
            stores.clone(),
            Arc::clone(&locks),
            scheduler,
            TokenIssuer::new(signing_key),
            config.session.clone(),
        );
        let verifier = Arc::new(TokenVerifier::new(
            signing_key,
            config.auth.token_leeway_seconds,
        ));

        let template_service = Arc::new(TemplateService::new(stores.clone(), Arc::clone(&locks)));
        let project_service = Arc::new(ProjectService::new(
            stores.clone(),
            Arc::clone(&locks),
            &config.auth,
        ));
        let resource_service = Arc::new(ResourceService::new(stores.clone(), Arc::clone(&locks)));
        let collection_browser = Arc::new(CollectionBrowser::new(stores.clone(), locks));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            stores,
            lease,
            verifier,
            template_service,
            project_service,
            resource_service,
            collection_browser,
        }
    }
}
