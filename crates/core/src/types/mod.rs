//! Core types for Fluxy Store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod national_id;
pub mod price;
pub mod status;

pub use cart::{Cart, CartEntry};
pub use email::{Email, EmailError};
pub use id::*;
pub use national_id::{NationalId, NationalIdError};
pub use price::{CurrencyCode, Price, PriceError};
pub use status::OrderStatus;
