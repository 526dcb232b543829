pub mod client;
pub mod registry;

pub use client::{ClientSessionStore, DynAuthRepository, DynSecureStorage, TetherClient, TetherClientBuilder};
pub use registry::ServiceRegistry;
