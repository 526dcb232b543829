use secrecy::{ExposeSecret, Secret};

use crate::error::AppError;

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// A password that satisfied the length policy. Never printed.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(input: String) -> Result<Self, AppError> {
        if input.is_empty() {
            return Err(AppError::validation("Password is required", "password"));
        }
        if input.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(AppError::validation(
                format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
                "password",
            ));
        }

        Ok(Self(Secret::new(input)))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}
