//! Simulated PIX payment.
//!
//! No gateway is contacted. Checkout gets a human-readable reference and the
//! charge payload a real gateway would receive is only logged.

use serde::Serialize;

use fluxy_core::{OrderId, Price};

/// Placeholder payment reference shown to the customer after checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReference(String);

impl PaymentReference {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extra field attached to a PIX charge.
#[derive(Debug, Clone, Serialize)]
pub struct PixInfo {
    pub nome: String,
    pub valor: String,
}

/// PIX charge body in the shape the gateway expects.
#[derive(Debug, Clone, Serialize)]
pub struct PixCharge {
    pub valor: String,
    pub chave: String,
    #[serde(rename = "infoAdicionais")]
    pub info_adicionais: Vec<PixInfo>,
}

/// Produces payment references for new orders.
#[derive(Debug, Clone)]
pub struct PaymentStub {
    pix_key: String,
}

impl PaymentStub {
    /// Create a stub that charges into `pix_key`.
    #[must_use]
    pub fn new(pix_key: impl Into<String>) -> Self {
        Self {
            pix_key: pix_key.into(),
        }
    }

    /// Receiving PIX key.
    #[must_use]
    pub fn pix_key(&self) -> &str {
        &self.pix_key
    }

    /// Charge payload for an order.
    #[must_use]
    pub fn charge(&self, total: Price, order_id: OrderId) -> PixCharge {
        PixCharge {
            valor: total.to_plain_string(),
            chave: self.pix_key.clone(),
            info_adicionais: vec![PixInfo {
                nome: "Pedido".to_owned(),
                valor: order_id.to_string(),
            }],
        }
    }

    /// Build the customer-facing reference and log the charge that would be sent.
    #[must_use]
    pub fn request(&self, total: Price, order_id: OrderId) -> PaymentReference {
        let charge = self.charge(total, order_id);
        match serde_json::to_string(&charge) {
            Ok(payload) => tracing::info!(order_id = %order_id, %payload, "Simulated PIX charge"),
            Err(e) => tracing::warn!(order_id = %order_id, error = %e, "Could not encode PIX charge"),
        }

        PaymentReference(format!(
            "Pagamento PIX simulado para R$ {} - Pedido #{order_id}",
            total.to_plain_string()
        ))
    }
}
