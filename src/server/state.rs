use std::sync::Arc;
use tracing::warn;

use crate::auth::password::PasswordHasher;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::db::DbConnection;
use crate::db::users::UsersStorage;
use crate::error::HubError;
use crate::seed::SeedAdmin;

/// Shared handler state. Cloning is cheap; every clone talks to the same
/// connection manager.
#[derive(Clone)]
pub struct HubState {
    pub db: DbConnection,
    pub auth: AuthService,
    /// Present only when the seed route is enabled for this deployment.
    pub seed: Option<Arc<SeedAdmin>>,
}

impl HubState {
    pub fn new(cfg: &Config) -> Result<Self, HubError> {
        let db = DbConnection::from_config(cfg);
        Self::with_connection(cfg, db)
    }

    pub fn with_connection(cfg: &Config, db: DbConnection) -> Result<Self, HubError> {
        let hasher = PasswordHasher::with_cost(cfg.bcrypt_cost)?;
        let auth = AuthService::new(UsersStorage::new(db.clone()), hasher);

        let seed = match (cfg.enable_seed_route, cfg.is_production()) {
            (true, false) => Some(Arc::new(SeedAdmin::from_config(cfg)?)),
            (true, true) => {
                warn!("ENABLE_SEED_ROUTE ignored in production");
                None
            }
            (false, _) => None,
        };

        Ok(Self { db, auth, seed })
    }
}
