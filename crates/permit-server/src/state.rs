use std::sync::Arc;

use permit_core::PermitConfig;
use permit_policy::IntakeRules;
use permit_store::Store;

use crate::auth::{SessionProvider, StaticSessionProvider};

/// Shared application state.
///
/// The session provider is behind a trait object so a real external
/// authentication service can replace the config-backed token map without
/// touching handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PermitConfig>,
    pub store: Store,
    pub sessions: Arc<dyn SessionProvider>,
    pub intake_rules: Arc<IntakeRules>,
}

impl AppState {
    pub async fn init(config: PermitConfig) -> anyhow::Result<Self> {
        let store = Store::connect(&config.database, config.licensing.clone()).await?;
        let sessions = Arc::new(StaticSessionProvider::new(&config.sessions));
        let intake_rules = Arc::new(IntakeRules::new(&config.licensing));

        Ok(Self {
            config: Arc::new(config),
            store,
            sessions,
            intake_rules,
        })
    }
}
