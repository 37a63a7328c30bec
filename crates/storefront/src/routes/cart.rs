//! Cart and checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use fluxy_core::ProductId;

use super::page::{MessageQuery, PageContext};
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::{LOGIN_REQUIRED_REDIRECT, OptionalAuth, SessionCart};
use crate::services::{CartService, CartView, CheckoutError, CheckoutReceipt, CheckoutService};
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub page: PageContext,
    pub view: CartView,
}

/// Checkout confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/checkout.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub receipt: CheckoutReceipt,
}

/// Add one unit of a product to the cart.
///
/// The product ID is not checked against the catalog here; unknown IDs are
/// skipped when the cart is viewed or checked out.
#[instrument(skip_all)]
pub async fn add(
    Path(product_id): Path<i64>,
    mut cart: SessionCart,
) -> Result<Redirect, AppError> {
    let product_id = ProductId::new(product_id);
    let quantity = cart.cart.add(product_id);
    cart.save().await?;

    let product = product_id.to_string();
    let quantity = quantity.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.as_str()), ("quantity", quantity.as_str())]),
    );

    Ok(Redirect::to("/?success=added_to_cart"))
}

/// Display the cart with current prices.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    cart: SessionCart,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let view = CartService::new(state.pool()).view(&cart.cart).await?;

    Ok(CartTemplate {
        page: PageContext::new(user, &cart.cart, &query),
        view,
    })
}

/// Turn the cart into an order and show the payment reference.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    mut cart: SessionCart,
) -> Result<Response, AppError> {
    let result = CheckoutService::new(state.pool(), state.payment())
        .checkout(user.as_ref(), &mut cart.cart)
        .await;

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(CheckoutError::Unauthenticated) => {
            return Ok(Redirect::to(LOGIN_REQUIRED_REDIRECT).into_response());
        }
        Err(CheckoutError::EmptyCart) => {
            return Ok(Redirect::to("/?error=empty_cart").into_response());
        }
        Err(CheckoutError::Repository(e)) => return Err(e.into()),
    };

    cart.save_after_order(receipt.order.order.id).await;
    add_breadcrumb("checkout", "Order placed", None);

    Ok(CheckoutTemplate {
        page: PageContext::new(user, &cart.cart, &MessageQuery::default()),
        receipt,
    }
    .into_response())
}
