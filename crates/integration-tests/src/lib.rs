//! Integration tests for Fluxy Store.
//!
//! Each test spawns the full storefront router on an ephemeral port, backed by
//! a private in-memory database and an in-memory session store, and drives it
//! with a cookie-aware HTTP client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fluxy-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use reqwest::{Client, Response, redirect};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower_sessions::MemoryStore;
use url::Url;

use fluxy_core::Email;
use fluxy_storefront::config::{PaymentConfig, StorefrontConfig};
use fluxy_storefront::db::{self, ProductRepository};
use fluxy_storefront::state::AppState;

/// A running storefront plus a client whose cookie jar acts as one browser.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Start a storefront with the default catalog and no admins.
    pub async fn new() -> Self {
        Self::with_admins(&[]).await
    }

    /// Start a storefront where `admins` may open the admin order listing.
    pub async fn with_admins(admins: &[&str]) -> Self {
        let pool = db::connect_in_memory()
            .await
            .expect("Failed to open in-memory database");
        ProductRepository::new(&pool)
            .seed_defaults_if_empty()
            .await
            .expect("Failed to seed catalog");

        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            base_url: Url::parse("http://localhost:5000").expect("valid URL"),
            session_secret: SecretString::from("kP3#vX9q!Lm2@Rt7$Wz5^Nb8&Hc4*Jd6"),
            admin_emails: admins
                .iter()
                .map(|e| Email::parse(e).expect("valid admin email"))
                .collect(),
            payment: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let app = fluxy_storefront::app(AppState::new(config, pool.clone()), MemoryStore::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server error");
        });

        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// A second browser against the same server, with an empty cookie jar.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            client: new_client(),
            base_url: self.base_url.clone(),
            pool: self.pool.clone(),
        }
    }

    /// GET a path without following redirects.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET a path and return the body text.
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path)
            .await
            .text()
            .await
            .expect("Failed to read response body")
    }

    /// POST a urlencoded form without following redirects.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Submit the registration form.
    pub async fn register(&self, name: &str, email: &str, cpf: &str) -> Response {
        self.post_form(
            "/cadastro",
            &[
                ("nome", name),
                ("email", email),
                ("senha", "segredo123"),
                ("cpf", cpf),
                ("data_nascimento", "1990-05-17"),
                ("endereco", "Rua das Flores, 10"),
            ],
        )
        .await
    }

    /// Submit the login form.
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &[("email", email), ("senha", password)])
            .await
    }

    /// Register and log in, asserting both succeed.
    pub async fn sign_up(&self, name: &str, email: &str, cpf: &str) {
        let resp = self.register(name, email, cpf).await;
        assert_eq!(location(&resp), "/login?success=registered");

        let resp = self.login(email, "segredo123").await;
        assert_eq!(location(&resp), "/?success=logged_in");
    }
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
