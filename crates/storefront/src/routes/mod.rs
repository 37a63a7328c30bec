//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Catalog
//! GET  /health                      - Liveness
//! GET  /health/ready                - Readiness (database)
//!
//! # Accounts
//! GET  /cadastro                    - Register page
//! POST /cadastro                    - Register action
//! GET  /login                       - Login page
//! POST /login                       - Login action
//! GET  /logout                      - Logout (clears the whole session)
//!
//! # Cart
//! GET  /add_carrinho/{product_id}   - Add one unit, back to the catalog
//! GET  /carrinho                    - Cart page
//! GET  /checkout                    - Place the order (login required)
//!
//! # Orders
//! GET  /meus_pedidos                - Customer's orders (login required)
//! GET  /admin/pedidos               - All orders (admin allowlist)
//! ```
//!
//! Expected failures redirect with `?error=<code>`; see [`page`].

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod orders;
pub mod page;

use axum::{Router, http::Uri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Accounts
        .route("/cadastro", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Cart and checkout
        .route("/add_carrinho/{product_id}", get(cart::add))
        .route("/carrinho", get(cart::show))
        .route("/checkout", get(cart::checkout))
        // Orders
        .route("/meus_pedidos", get(orders::mine))
        .route("/admin/pedidos", get(admin::orders))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
