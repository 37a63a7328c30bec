//! Customer order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use super::page::{MessageQuery, PageContext};
use crate::db::OrderRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, SessionCart};
use crate::models::OrderWithItems;
use crate::state::AppState;

/// "Meus pedidos" template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/mine.html")]
pub struct MyOrdersTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderWithItems>,
}

/// Orders placed by the logged-in customer, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    cart: SessionCart,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(MyOrdersTemplate {
        page: PageContext::new(Some(user), &cart.cart, &query),
        orders,
    })
}
