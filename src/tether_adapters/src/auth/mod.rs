mod error_mapping;
pub mod http_auth_repository;
pub mod in_memory_auth_repository;

pub use http_auth_repository::{HttpAuthRepository, PROVIDER_SESSION_KEY};
pub use in_memory_auth_repository::{
    InMemoryAuthRepository, MOCK_ACCESS_TOKEN, MOCK_REFRESH_TOKEN, MOCK_SESSION_TTL_SECS,
};
