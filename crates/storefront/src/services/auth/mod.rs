//! Authentication service.
//!
//! Password registration and login for customer accounts.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::instrument;

use fluxy_core::{Email, NationalId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw registration form fields.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub name: String,
    pub email: String,
    pub national_id: String,
    /// `YYYY-MM-DD`, as sent by an HTML date input.
    pub birth_date: String,
    pub address: String,
    pub password: String,
}

/// Authentication service.
///
/// Handles account registration and password login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new account.
    ///
    /// Email uniqueness is checked before national-ID uniqueness, so a form
    /// that clashes on both reports the email.
    ///
    /// # Errors
    ///
    /// Returns a validation variant (`InvalidEmail`, `InvalidNationalId`,
    /// `InvalidBirthDate`, `WeakPassword`) for malformed input.
    /// Returns `AuthError::EmailTaken` or `AuthError::NationalIdTaken` if
    /// another account already uses that value.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: &RegistrationInput) -> Result<User, AuthError> {
        let email = Email::parse(&input.email)?;
        let national_id = NationalId::parse(&input.national_id)?;
        let birth_date = NaiveDate::parse_from_str(input.birth_date.trim(), "%Y-%m-%d")
            .map_err(|e| AuthError::InvalidBirthDate(e.to_string()))?;
        validate_password(&input.password)?;

        if self.users.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.users.national_id_exists(&national_id).await? {
            return Err(AuthError::NationalIdTaken);
        }

        let password_hash = hash_password(&input.password)?;
        let new_user = NewUser {
            name: input.name.trim().to_owned(),
            email,
            national_id,
            birth_date,
            address: input.address.trim().to_owned(),
        };

        // A concurrent registration can still win the race past the checks
        // above; the unique indexes catch it.
        let user = self
            .users
            .create(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(ref column) if column == "email" => {
                    AuthError::EmailTaken
                }
                RepositoryError::Conflict(ref column) if column == "national_id" => {
                    AuthError::NationalIdTaken
                }
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    fn input(email: &str, national_id: &str) -> RegistrationInput {
        RegistrationInput {
            name: "Ana Souza".to_owned(),
            email: email.to_owned(),
            national_id: national_id.to_owned(),
            birth_date: "1990-05-17".to_owned(),
            address: "Rua das Flores, 10".to_owned(),
            password: "segredo123".to_owned(),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("segredo123").unwrap();
        assert!(verify_password("segredo123", &hash).is_ok());
        assert!(matches!(
            verify_password("errado123", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("1234567"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("12345678").is_ok());
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);

        let user = auth
            .register(&input("Ana@Example.com", "123.456.789-09"))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "ana@example.com");

        let logged_in = auth.login("ana@example.com", "segredo123").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            auth.login("ana@example.com", "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "segredo123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register(&input("ana@example.com", "12345678909"))
            .await
            .unwrap();

        let err = auth
            .register(&input("ANA@example.com", "98765432100"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.message_code(), Some("email_taken"));
    }

    #[tokio::test]
    async fn test_duplicate_national_id_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register(&input("ana@example.com", "12345678909"))
            .await
            .unwrap();

        let err = auth
            .register(&input("bia@example.com", "123.456.789-09"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NationalIdTaken));
    }

    #[tokio::test]
    async fn test_invalid_fields_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let auth = AuthService::new(&pool);

        let mut bad_date = input("ana@example.com", "12345678909");
        bad_date.birth_date = "17/05/1990".to_owned();
        assert!(matches!(
            auth.register(&bad_date).await,
            Err(AuthError::InvalidBirthDate(_))
        ));

        assert!(matches!(
            auth.register(&input("ana@example.com", "123")).await,
            Err(AuthError::InvalidNationalId(_))
        ));
        assert!(matches!(
            auth.register(&input("not-an-email", "12345678909")).await,
            Err(AuthError::InvalidEmail(_))
        ));
    }
}
