use std::fmt;

use secrecy::ExposeSecret;

use super::{email::Email, password::Password};

/// Validated sign-in / sign-up input, ready to be sent to the provider.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    email: Email,
    password: Password,
}

impl Credentials {
    pub fn new(email: Email, password: Password) -> Self {
        Self { email, password }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plain password text for the wire. Keep the result out of logs.
    pub fn expose_password(&self) -> &str {
        self.password.as_ref().expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
