pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod seed;
pub mod server;

pub use db::DbConnection;
pub use error::HubError;
