//! Shared page context and user-visible messages.
//!
//! Handlers never render free text from the query string: `?error=` and
//! `?success=` carry a code, and only known codes turn into a message.

use serde::Deserialize;

use fluxy_core::Cart;

use crate::models::CurrentUser;

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Data every page layout needs.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    /// Units in the cart, shown as a badge.
    pub cart_count: u32,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

impl PageContext {
    #[must_use]
    pub fn new(user: Option<CurrentUser>, cart: &Cart, query: &MessageQuery) -> Self {
        Self {
            user,
            cart_count: cart.item_count(),
            error: query.error.as_deref().and_then(error_message),
            success: query.success.as_deref().and_then(success_message),
        }
    }
}

/// Text for an `?error=` code.
#[must_use]
pub fn error_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "email_taken" => "Email já cadastrado!",
        "national_id_taken" => "CPF já cadastrado!",
        "invalid_email" => "Informe um email válido.",
        "invalid_national_id" => "CPF inválido: informe os 11 dígitos.",
        "invalid_birth_date" => "Data de nascimento inválida.",
        "weak_password" => "A senha deve ter pelo menos 8 caracteres.",
        "credentials" => "Email ou senha inválidos!",
        "login_required" => "Faça login para continuar.",
        "forbidden" => "Acesso restrito à administração.",
        "empty_cart" => "Seu carrinho está vazio.",
        _ => return None,
    })
}

/// Text for a `?success=` code.
#[must_use]
pub fn success_message(code: &str) -> Option<&'static str> {
    Some(match code {
        "registered" => "Cadastro realizado com sucesso!",
        "logged_in" => "Login realizado com sucesso!",
        "logged_out" => "Logout realizado com sucesso!",
        "added_to_cart" => "Produto adicionado ao carrinho!",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use fluxy_core::ProductId;

    use super::*;

    #[test]
    fn test_unknown_codes_are_ignored() {
        let query = MessageQuery {
            error: Some("<script>alert(1)</script>".to_string()),
            success: Some("registered".to_string()),
        };
        let page = PageContext::new(None, &Cart::new(), &query);
        assert_eq!(page.error, None);
        assert_eq!(page.success, Some("Cadastro realizado com sucesso!"));
    }

    #[test]
    fn test_cart_count_sums_quantities() {
        let mut cart = Cart::new();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(3));
        let page = PageContext::new(None, &cart, &MessageQuery::default());
        assert_eq!(page.cart_count, 3);
    }

    #[test]
    fn test_every_auth_code_has_a_message() {
        for code in [
            "email_taken",
            "national_id_taken",
            "invalid_email",
            "invalid_national_id",
            "invalid_birth_date",
            "weak_password",
            "credentials",
        ] {
            assert!(error_message(code).is_some(), "{code}");
        }
    }
}
