//! Session cart extractor.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;

use fluxy_core::{Cart, OrderId};

use crate::models::session_keys;

/// The shopper's cart, loaded from the session for the length of one request.
///
/// Handlers mutate [`SessionCart::cart`] and call [`SessionCart::save`] to
/// persist the change.
pub struct SessionCart {
    session: Session,
    pub cart: Cart,
}

impl SessionCart {
    /// Write the cart back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::CART, &self.cart).await
    }

    /// Write the emptied cart back once `order_id` is stored.
    ///
    /// The order is already committed, so a failed write is logged rather than
    /// returned. Returns whether the cart was saved.
    pub async fn save_after_order(&self, order_id: OrderId) -> bool {
        match self.save().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    order_id = %order_id,
                    "Order placed but the emptied cart could not be saved"
                );
                false
            }
        }
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session layer missing",
        ))?;

        let cart = match session.get::<Cart>(session_keys::CART).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                // An unreadable cart is dropped rather than blocking the shopper.
                tracing::warn!(error = %e, "Discarding unreadable session cart");
                Cart::default()
            }
        };

        Ok(Self { session, cart })
    }
}
