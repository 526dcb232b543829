pub mod auth;
pub mod config;
pub mod events;
pub mod persistence;
pub mod telemetry;

pub use auth::{HttpAuthRepository, InMemoryAuthRepository};
pub use events::AuthEventBus;
pub use persistence::{FileSecureStorage, InMemorySecureStorage};
pub use self::config::Settings;
