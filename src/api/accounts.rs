//! Input for creating accounts.

use super::{ApiError, ApiResult};
use crate::task::domain::Role;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated passwords.
pub const GENERATED_PASSWORD_LEN: usize = 12;

/// Validated details of an account to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    name: String,
    email: String,
    password: String,
    role: Role,
}

impl NewAccount {
    /// Creates a validated account request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the name is blank, the email has
    /// no `@`, or the password is empty.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> ApiResult<Self> {
        let raw_name = name.into();
        let trimmed_name = raw_name.trim();
        if trimmed_name.is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_owned()));
        }
        let raw_email = email.into();
        let trimmed_email = raw_email.trim();
        if !is_plausible_email(trimmed_email) {
            return Err(ApiError::Validation(format!(
                "'{trimmed_email}' is not a valid email address"
            )));
        }
        let password_value = password.into();
        if password_value.is_empty() {
            return Err(ApiError::Validation("password must not be empty".to_owned()));
        }

        Ok(Self {
            name: trimmed_name.to_owned(),
            email: trimmed_email.to_owned(),
            password: password_value,
            role,
        })
    }

    /// Creates a worker account with a generated password.
    ///
    /// # Errors
    ///
    /// Same as [`NewAccount::new`].
    pub fn worker_with_generated_password(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> ApiResult<Self> {
        Self::new(name, email, generate_password(), Role::Worker)
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the initial password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Generates a random alphanumeric password.
#[must_use]
pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        && !email.chars().any(char::is_whitespace)
}
