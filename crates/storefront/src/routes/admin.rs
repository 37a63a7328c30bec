//! Back-office order listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use super::page::{MessageQuery, PageContext};
use crate::db::OrderRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, SessionCart};
use crate::models::OrderSummary;
use crate::state::AppState;

/// All-orders template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderSummary>,
}

/// Every order in the store. Only accounts in `STOREFRONT_ADMIN_EMAILS` get in.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    cart: SessionCart,
) -> Result<Response, AppError> {
    if !state.config().is_admin(&user.email) {
        tracing::warn!("Non-admin tried to open the order listing");
        return Ok(Redirect::to("/?error=forbidden").into_response());
    }

    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(AdminOrdersTemplate {
        page: PageContext::new(Some(user), &cart.cart, &MessageQuery::default()),
        orders,
    }
    .into_response())
}
