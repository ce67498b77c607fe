use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::auth::password::PasswordHasher;
use crate::db::models::{NewUser, Role, User, require};
use crate::db::users::UsersStorage;
use crate::error::HubError;

/// Payload for email sign-up.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpEmail {
    pub email: String,
    pub password: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUpEmail {
    fn validate(&self) -> Result<(), HubError> {
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(HubError::Validation("email is invalid".to_string()));
        }
        if self.password.is_empty() {
            return Err(HubError::Validation("password is required".to_string()));
        }
        require("name", &self.name)
    }
}

/// Email/password accounts backed by [`UsersStorage`].
#[derive(Clone)]
pub struct AuthService {
    users: UsersStorage,
    hasher: PasswordHasher,
    // Hash at the configured cost, verified against when the email is
    // unknown so both rejection paths pay for one bcrypt verify.
    decoy_hash: Arc<OnceCell<String>>,
}

/// Plaintext behind the decoy hash. Never matches a real account because
/// the decoy is only consulted when no account exists.
const DECOY_PASSWORD: &str = "coursehub-decoy-credential";

impl AuthService {
    pub fn new(users: UsersStorage, hasher: PasswordHasher) -> Self {
        Self {
            users,
            hasher,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Create an account. An email that is already registered fails with
    /// `Conflict`.
    pub async fn sign_up_email(&self, req: SignUpEmail, role: Role) -> Result<User, HubError> {
        req.validate()?;
        let email = normalize_email(&req.email);
        let password_hash = self.hasher.hash(&req.password).await?;
        let user = self
            .users
            .insert(NewUser {
                email,
                name: req.name.trim().to_string(),
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                role,
                password_hash,
            })
            .await?;
        info!(user_id = user.id, role = user.role.as_str(), "account created");
        Ok(user)
    }

    /// Check an email/password pair. Unknown email and wrong password return
    /// the same error after the same amount of hashing work.
    pub async fn sign_in_email(&self, email: &str, password: &str) -> Result<User, HubError> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            let decoy = self
                .decoy_hash
                .get_or_try_init(|| self.hasher.hash(DECOY_PASSWORD))
                .await?;
            self.hasher.verify(password, decoy).await?;
            return Err(HubError::InvalidCredentials);
        };
        if !self.hasher.verify(password, &user.password_hash).await? {
            warn!(user_id = user.id, "sign-in rejected: wrong password");
            return Err(HubError::InvalidCredentials);
        }
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
