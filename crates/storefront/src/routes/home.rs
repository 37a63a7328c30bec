//! Home page: the catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use super::page::{MessageQuery, PageContext};
use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, SessionCart};
use crate::models::Product;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
}

/// List every product.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    cart: SessionCart,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(HomeTemplate {
        page: PageContext::new(user, &cart.cart, &query),
        products,
    })
}
