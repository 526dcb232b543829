pub mod file_secure_storage;
pub mod in_memory_secure_storage;

pub use file_secure_storage::FileSecureStorage;
pub use in_memory_secure_storage::InMemorySecureStorage;
