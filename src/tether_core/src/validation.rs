//! Input schemas for the authentication forms.
//!
//! Raw form input is validated and transformed here, before any repository
//! call is made. Failures are always [`AppError::Validation`].

use serde::Deserialize;

use crate::{
    domain::{credentials::Credentials, email::Email, password::Password},
    error::AppError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

impl SignInInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(self) -> Result<Credentials, AppError> {
        let email = Email::parse(&self.email)?;
        let password = Password::parse(self.password)?;
        Ok(Credentials::new(email, password))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpInput {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(self) -> Result<Credentials, AppError> {
        let email = Email::parse(&self.email)?;

        if self.password != self.confirm_password {
            return Err(AppError::validation(
                "Passwords do not match",
                "confirm_password",
            ));
        }

        let password = Password::parse(self.password)?;
        Ok(Credentials::new(email, password))
    }
}
