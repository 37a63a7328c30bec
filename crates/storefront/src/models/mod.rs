//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{LineItem, NewLineItem, Order, OrderSummary, OrderWithItems};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::{NewUser, User};
