//! Fluxy Store Core - Shared types library.
//!
//! This crate provides common types used across all Fluxy Store components:
//! - `storefront` - Public-facing e-commerce site
//! - `cli` - Command-line tools for migrations and catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, national IDs,
//!   order statuses, and the session cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
