//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `cart` - Cart rendering against the live catalog
//! - `checkout` - Order creation from a cart
//! - `payment` - Simulated PIX payment references

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod payment;

pub use auth::{AuthError, AuthService, RegistrationInput};
pub use cart::{CartLine, CartService, CartView};
pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutService};
pub use payment::{PaymentReference, PaymentStub, PixCharge};
