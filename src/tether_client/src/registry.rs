use std::sync::{Arc, OnceLock};

use tether_core::{AppError, AuthRepository, SecureStorage};

/// Configure-once slots for the services the session store is built from.
///
/// Reading a slot before it was filled is a wiring bug and fails instead of
/// falling back to a default.
#[derive(Default)]
pub struct ServiceRegistry {
    auth_repository: OnceLock<Arc<dyn AuthRepository>>,
    secure_storage: OnceLock<Arc<dyn SecureStorage>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure_auth_repository(
        &self,
        repository: Arc<dyn AuthRepository>,
    ) -> Result<(), AppError> {
        self.auth_repository
            .set(repository)
            .map_err(|_| AppError::conflict("auth repository is already configured"))
    }

    pub fn auth_repository(&self) -> Result<Arc<dyn AuthRepository>, AppError> {
        self.auth_repository
            .get()
            .cloned()
            .ok_or_else(|| AppError::unknown("auth repository has not been configured"))
    }

    pub fn configure_secure_storage(&self, storage: Arc<dyn SecureStorage>) -> Result<(), AppError> {
        self.secure_storage
            .set(storage)
            .map_err(|_| AppError::conflict("secure storage is already configured"))
    }

    pub fn secure_storage(&self) -> Result<Arc<dyn SecureStorage>, AppError> {
        self.secure_storage
            .get()
            .cloned()
            .ok_or_else(|| AppError::unknown("secure storage has not been configured"))
    }
}
