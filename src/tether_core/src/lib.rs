pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

// Re-export commonly used types for convenience
pub use domain::{
    credentials::Credentials,
    email::Email,
    password::{PASSWORD_MIN_LENGTH, Password},
    session::{AuthChangeEvent, Session},
    user::User,
};

pub use error::{AppError, BoxError, ErrorCode, NetworkFailure};

pub use ports::{
    auth_repository::{AuthChangeCallback, AuthRepository, Subscription},
    secure_storage::{SecureStorage, StorageKey},
};

pub use validation::{SignInInput, SignUpInput};
