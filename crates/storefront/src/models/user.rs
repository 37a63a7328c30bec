//! User domain types.

use chrono::{DateTime, NaiveDate, Utc};

use fluxy_core::{Email, NationalId, UserId};

/// A customer account (domain type).
///
/// The password hash is deliberately not part of this type; it is only read
/// by the login path through `UserRepository::get_password_hash`.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Login email, unique across accounts.
    pub email: Email,
    /// CPF, unique across accounts.
    pub national_id: NationalId,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Delivery address.
    pub address: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Validated registration data, ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub national_id: NationalId,
    pub birth_date: NaiveDate,
    pub address: String,
}
