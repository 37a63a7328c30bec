//! Integration tests for public pages, accounts and cross-cutting middleware.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use fluxy_integration_tests::{TestContext, location};

// ============================================================================
// Health & Middleware
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx.get("/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let ctx = TestContext::new().await;
    let resp = ctx.get("/").await;

    let headers = resp.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
    assert_eq!(headers["cache-control"], "no-store, max-age=0");
    assert!(!headers["x-request-id"].is_empty());
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .header("x-request-id", "edge-1234")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.headers()["x-request-id"], "edge-1234");
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let ctx = TestContext::new().await;
    let resp = ctx.get("/nao-existe").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("Página não encontrada"));
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_home_lists_default_catalog() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/").await;

    for name in [
        "Pendrive Boot Linux",
        "Pendrive Boot Android",
        "Pendrive Android TV",
        "Pendrive Google TV",
        "Lista IPTV",
    ] {
        assert!(body.contains(name), "missing {name}");
    }
    assert!(body.contains("R$ 40.00"));
    assert!(body.contains("/add_carrinho/1"));
}

#[tokio::test]
async fn test_unknown_message_codes_are_ignored() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/?error=%3Cscript%3E&success=bogus").await;

    assert!(!body.contains("<script>"));
    assert!(!body.contains("bogus"));
}

// ============================================================================
// Registration & Login
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .register("Ana Souza", "ana@example.com", "123.456.789-09")
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?success=registered");

    let body = ctx.get_text("/login?success=registered").await;
    assert!(body.contains("Cadastro realizado com sucesso!"));

    // Registration alone does not log the customer in.
    let body = ctx.get_text("/").await;
    assert!(!body.contains("Ana Souza"));

    let resp = ctx.login("ANA@example.com", "segredo123").await;
    assert_eq!(location(&resp), "/?success=logged_in");

    let body = ctx.get_text("/").await;
    assert!(body.contains("Ana Souza"));
    assert!(body.contains("Login realizado com sucesso!"));
}

#[tokio::test]
async fn test_duplicate_email_and_national_id_rejected() {
    let ctx = TestContext::new().await;
    ctx.register("Ana Souza", "ana@example.com", "12345678909")
        .await;

    let resp = ctx
        .register("Outra Ana", "Ana@Example.com", "98765432100")
        .await;
    assert_eq!(location(&resp), "/cadastro?error=email_taken");
    let body = ctx.get_text(location(&resp)).await;
    assert!(body.contains("Email já cadastrado!"));

    let resp = ctx
        .register("Bia Lima", "bia@example.com", "123.456.789-09")
        .await;
    assert_eq!(location(&resp), "/cadastro?error=national_id_taken");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new().await;

    let resp = ctx.register("Ana", "not-an-email", "12345678909").await;
    assert_eq!(location(&resp), "/cadastro?error=invalid_email");

    let resp = ctx.register("Ana", "ana@example.com", "123").await;
    assert_eq!(location(&resp), "/cadastro?error=invalid_national_id");

    let resp = ctx
        .post_form(
            "/cadastro",
            &[
                ("nome", "Ana"),
                ("email", "ana@example.com"),
                ("senha", "curta"),
                ("cpf", "12345678909"),
                ("data_nascimento", "1990-05-17"),
                ("endereco", "Rua A"),
            ],
        )
        .await;
    assert_eq!(location(&resp), "/cadastro?error=weak_password");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let ctx = TestContext::new().await;
    ctx.register("Ana Souza", "ana@example.com", "12345678909")
        .await;

    let resp = ctx.login("ana@example.com", "errado123").await;
    assert_eq!(location(&resp), "/login?error=credentials");

    let resp = ctx.login("ninguem@example.com", "segredo123").await;
    assert_eq!(location(&resp), "/login?error=credentials");

    let body = ctx.get_text("/login?error=credentials").await;
    assert!(body.contains("Email ou senha inválidos!"));
}

#[tokio::test]
async fn test_logout_drops_identity_and_cart() {
    let ctx = TestContext::new().await;
    ctx.sign_up("Ana Souza", "ana@example.com", "12345678909")
        .await;
    ctx.get("/add_carrinho/1").await;

    let resp = ctx.get("/logout").await;
    assert_eq!(location(&resp), "/login?success=logged_out");

    let body = ctx.get_text("/carrinho").await;
    assert!(body.contains("Seu carrinho está vazio."));
    assert!(!body.contains("Ana Souza"));
}
