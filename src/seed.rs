//! Bootstrap administrator account.
//!
//! The profile comes from `SEED_ADMIN_*`; the password has no default and
//! must be supplied by the operator.

use tracing::{error, info, warn};

use crate::auth::service::{AuthService, SignUpEmail};
use crate::config::Config;
use crate::db::models::{Role, User};
use crate::error::HubError;

#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
}

impl SeedAdmin {
    pub fn from_config(cfg: &Config) -> Result<Self, HubError> {
        let password = cfg
            .seed_admin_password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(HubError::MissingSeedPassword)?;
        Ok(Self {
            email: cfg.seed_admin_email.clone(),
            password,
            name: cfg.seed_admin_name.clone(),
            first_name: cfg.seed_admin_first_name.clone(),
            last_name: cfg.seed_admin_last_name.clone(),
        })
    }
}

/// Gate for the `seed-admin` command: production needs an explicit
/// `--force`.
pub fn authorize_cli(cfg: &Config, force: bool) -> Result<(), HubError> {
    if cfg.is_production() && !force {
        return Err(HubError::SeedRefused);
    }
    if cfg.is_production() {
        warn!("seeding an admin in production (--force)");
    }
    Ok(())
}

/// Create the administrator once. Not idempotent: a second run reports the
/// auth service's duplicate-account error.
pub async fn seed_admin(auth: &AuthService, admin: &SeedAdmin) -> Result<User, HubError> {
    let req = SignUpEmail {
        email: admin.email.clone(),
        password: admin.password.clone(),
        name: admin.name.clone(),
        first_name: admin.first_name.clone(),
        last_name: admin.last_name.clone(),
    };
    match auth.sign_up_email(req, Role::Admin).await {
        Ok(user) => {
            info!(user_id = user.id, email = %user.email, "admin user seeded");
            Ok(user)
        }
        Err(e) => {
            error!(email = %admin.email, error = %e, "admin seeding failed");
            Err(e)
        }
    }
}
