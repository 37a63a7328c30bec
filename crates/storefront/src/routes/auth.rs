//! Registration, login and logout.
//!
//! Form field names follow the public HTML forms (`nome`, `senha`, `cpf`, ...).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::page::{MessageQuery, PageContext};
use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, SessionCart, clear_session, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService, RegistrationInput};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "cpf")]
    pub national_id: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: String,
    #[serde(rename = "endereco")]
    pub address: String,
}

impl From<RegisterForm> for RegistrationInput {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            national_id: form.national_id,
            birth_date: form.birth_date,
            address: form.address,
            password: form.password,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
}

/// Redirect back to a form with a message code, or fail the request when the
/// error is not something the customer can fix.
fn form_error(path: &str, err: AuthError) -> Response {
    match err.message_code() {
        Some(code) => Redirect::to(&format!("{path}?error={code}")).into_response(),
        None => AppError::from(err).into_response(),
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    cart: SessionCart,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        page: PageContext::new(user, &cart.cart, &query),
    }
}

/// Handle registration form submission.
///
/// The new account is not logged in; the customer is sent to the login page.
#[instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    match AuthService::new(state.pool())
        .register(&RegistrationInput::from(form))
        .await
    {
        Ok(_) => Redirect::to("/login?success=registered").into_response(),
        Err(e) => {
            tracing::info!(error = %e, "Registration rejected");
            form_error("/cadastro", e)
        }
    }
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    cart: SessionCart,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        page: PageContext::new(user, &cart.cart, &query),
    }
}

/// Handle login form submission.
///
/// The cart collected before logging in is kept.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(error = %e, "Login failed");
            return Ok(form_error("/login", e));
        }
    };

    let current = CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
    };
    set_current_user(&session, &current).await?;

    set_sentry_user(&current.id, Some(current.email.as_str()));
    add_breadcrumb("auth", "Logged in", None);
    tracing::info!(user_id = %current.id, "Logged in");

    Ok(Redirect::to("/?success=logged_in").into_response())
}

/// Log out, dropping the cart along with the identity.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    clear_session(&session).await?;
    clear_sentry_user();

    Ok(Redirect::to("/login?success=logged_out"))
}
