//! User repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use fluxy_core::{Email, NationalId, UserId};

use super::RepositoryError;
use crate::models::user::{NewUser, User};

/// Raw `users` row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    national_id: String,
    birth_date: NaiveDate,
    address: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let national_id = NationalId::parse(&r.national_id).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid national ID in database: {e}"))
        })?;

        Ok(Self {
            id: r.id,
            name: r.name,
            email,
            national_id,
            birth_date: r.birth_date,
            address: r.address,
            created_at: r.created_at,
        })
    }
}

/// Row with the password hash joined in, for login only.
#[derive(Debug, sqlx::FromRow)]
struct UserWithPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, national_id, birth_date, address, created_at
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, national_id, birth_date, address, created_at
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Whether an account already uses this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
            .bind(email.as_str())
            .fetch_one(self.pool)
            .await?;
        Ok(exists != 0)
    }

    /// Whether an account already uses this national ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn national_id_exists(
        &self,
        national_id: &NationalId,
    ) -> Result<bool, RepositoryError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE national_id = ?)")
                .bind(national_id.as_str())
                .fetch_one(self.pool)
                .await?;
        Ok(exists != 0)
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("email")` or
    /// `RepositoryError::Conflict("national_id")` if a unique column clashes.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, password_hash, national_id, birth_date, address, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, national_id, birth_date, address, created_at
            ",
        )
        .bind(&new_user.name)
        .bind(new_user.email.as_str())
        .bind(password_hash)
        .bind(new_user.national_id.as_str())
        .bind(new_user.birth_date)
        .bind(&new_user.address)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        User::try_from(row)
    }

    /// Get a user together with their password hash, by email.
    ///
    /// Returns `None` if no account uses this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPasswordRow>(
            r"
            SELECT id, name, email, national_id, birth_date, address, created_at, password_hash
            FROM users
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(r) = row else {
            return Ok(None);
        };

        let user = User::try_from(r.user)?;
        Ok(Some((user, r.password_hash)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    fn new_user(email: &str, national_id: &str) -> NewUser {
        NewUser {
            name: "Ana Souza".to_owned(),
            email: Email::parse(email).unwrap(),
            national_id: NationalId::parse(national_id).unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            address: "Rua das Flores, 10".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = connect_in_memory().await.unwrap();
        let repo = UserRepository::new(&pool);

        let created = repo
            .create(&new_user("ana@example.com", "123.456.789-09"), "hash")
            .await
            .unwrap();

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email.as_str(), "ana@example.com");
        assert_eq!(by_id.national_id.as_str(), "12345678909");
        assert_eq!(by_id.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());

        let (user, hash) = repo
            .get_password_hash(&by_id.email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(hash, "hash");
    }

    #[tokio::test]
    async fn test_unique_violations_name_the_column() {
        let pool = connect_in_memory().await.unwrap();
        let repo = UserRepository::new(&pool);
        repo.create(&new_user("ana@example.com", "12345678909"), "hash")
            .await
            .unwrap();

        let err = repo
            .create(&new_user("ana@example.com", "98765432100"), "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref c) if c == "email"));

        let err = repo
            .create(&new_user("bia@example.com", "12345678909"), "hash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref c) if c == "national_id"));
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let pool = connect_in_memory().await.unwrap();
        let repo = UserRepository::new(&pool);
        let user = repo
            .create(&new_user("ana@example.com", "12345678909"), "hash")
            .await
            .unwrap();

        assert!(repo.email_exists(&user.email).await.unwrap());
        assert!(repo.national_id_exists(&user.national_id).await.unwrap());
        assert!(
            !repo
                .email_exists(&Email::parse("other@example.com").unwrap())
                .await
                .unwrap()
        );
        assert!(repo.get_by_email(&user.email).await.unwrap().is_some());
    }
}
