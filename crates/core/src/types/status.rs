//! Order status.

use serde::{Deserialize, Serialize};

/// Status label of an order.
///
/// Status is free text so that back-office tooling can record whatever stage
/// an order is in ("Pago", "Enviado", "Entregue", ...). New orders start as
/// [`OrderStatus::AWAITING_PAYMENT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    /// Status given to every order created at checkout.
    pub const AWAITING_PAYMENT: &'static str = "Aguardando Pagamento";

    /// Create a status from arbitrary text.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Status of a freshly created order.
    #[must_use]
    pub fn awaiting_payment() -> Self {
        Self::new(Self::AWAITING_PAYMENT)
    }

    /// Returns the status label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::awaiting_payment()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_awaiting_payment() {
        assert_eq!(OrderStatus::default().as_str(), "Aguardando Pagamento");
    }

    #[test]
    fn test_free_text_status() {
        let status = OrderStatus::new("Enviado");
        assert_eq!(status.to_string(), "Enviado");
        assert_ne!(status, OrderStatus::awaiting_payment());
    }
}
