pub mod password;
pub mod service;

pub use password::{DEFAULT_COST_FACTOR, PasswordHasher};
pub use service::{AuthService, SignUpEmail};
