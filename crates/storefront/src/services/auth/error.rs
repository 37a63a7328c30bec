//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] fluxy_core::EmailError),

    /// National ID is not 11 digits.
    #[error("invalid national ID: {0}")]
    InvalidNationalId(#[from] fluxy_core::NationalIdError),

    /// Birth date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid birth date: {0}")]
    InvalidBirthDate(String),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Another account already uses this email.
    #[error("email already registered")]
    EmailTaken,

    /// Another account already uses this national ID.
    #[error("national ID already registered")]
    NationalIdTaken,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Message code used in the redirect back to the form.
    ///
    /// Returns `None` for server-side failures, which are not the user's to fix.
    #[must_use]
    pub const fn message_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidEmail(_) => Some("invalid_email"),
            Self::InvalidNationalId(_) => Some("invalid_national_id"),
            Self::InvalidBirthDate(_) => Some("invalid_birth_date"),
            Self::WeakPassword(_) => Some("weak_password"),
            Self::EmailTaken => Some("email_taken"),
            Self::NationalIdTaken => Some("national_id_taken"),
            Self::InvalidCredentials => Some("credentials"),
            Self::PasswordHash | Self::Repository(_) => None,
        }
    }
}
