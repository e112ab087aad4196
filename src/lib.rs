pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod reports;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use ai::client::ModelClient;
use ai::flows::FlowRegistry;
use config::AppConfig;
use i18n::Localizer;
use storage::Storage;

/// Shared application state passed to every REST handler.
///
/// All cross-cutting collaborators live here — there are no process
/// globals. Handlers receive an `Arc<AppContext>` through axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub storage: Arc<Storage>,
    /// Language-pack lookup. Injected explicitly; the request's
    /// `Accept-Language` header selects the pack per call.
    pub i18n: Arc<Localizer>,
    /// The hosted text-generation service behind a trait so tests can
    /// substitute a scripted client.
    pub model: Arc<dyn ModelClient>,
    /// The two AI flows (project risk, business insight), pre-built from
    /// config at startup.
    pub flows: Arc<FlowRegistry>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Assemble a context from its parts. `model` is separated out so
    /// tests can pass a scripted client while production passes the
    /// hosted one built from config.
    pub fn new(
        config: Arc<AppConfig>,
        storage: Arc<Storage>,
        model: Arc<dyn ModelClient>,
    ) -> Self {
        let flows = Arc::new(FlowRegistry::new(&config.ai));
        Self {
            config,
            storage,
            i18n: Arc::new(Localizer::new()),
            model,
            flows,
            started_at: std::time::Instant::now(),
        }
    }
}
