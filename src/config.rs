use figment::{Figment, providers::Env};
use serde::Deserialize;

use crate::auth::password::DEFAULT_COST_FACTOR;
use crate::error::HubError;

/// Environment keys read into [`Config`]. Anything else in the process
/// environment is ignored.
const ENV_KEYS: &[&str] = &[
    "DATABASE_URL",
    "LOGLEVEL",
    "LISTEN_ADDR",
    "BCRYPT_COST",
    "ENABLE_SEED_ROUTE",
    "APP_ENV",
    "SEED_ADMIN_EMAIL",
    "SEED_ADMIN_PASSWORD",
    "SEED_ADMIN_NAME",
    "SEED_ADMIN_FIRST_NAME",
    "SEED_ADMIN_LAST_NAME",
];

/// Process configuration. Loaded once by `main` and passed down as `&Config`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite address, e.g. `sqlite:data/coursehub.sqlite`. Required before
    /// any persistence happens; absence surfaces as `MissingDatabaseUrl`.
    pub database_url: Option<String>,
    pub loglevel: String,
    pub listen_addr: String,
    pub bcrypt_cost: u32,
    pub enable_seed_route: bool,
    pub app_env: String,
    pub seed_admin_email: String,
    pub seed_admin_password: Option<String>,
    pub seed_admin_name: String,
    pub seed_admin_first_name: String,
    pub seed_admin_last_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            loglevel: "info".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            bcrypt_cost: DEFAULT_COST_FACTOR,
            enable_seed_route: false,
            app_env: "development".to_string(),
            seed_admin_email: "admin@coursehub.local".to_string(),
            seed_admin_password: None,
            seed_admin_name: "Admin User".to_string(),
            seed_admin_first_name: "Admin".to_string(),
            seed_admin_last_name: "User".to_string(),
        }
    }
}

impl Config {
    /// Read the allow-listed variables from the process environment on top
    /// of the defaults.
    pub fn from_env() -> Result<Self, HubError> {
        Self::from_figment(Figment::new().merge(Env::raw().only(ENV_KEYS)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, HubError> {
        let cfg: Config = figment.extract().map_err(Box::new)?;
        Ok(cfg)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}
