//! Wire records for the fake-store API
//!
//! Response bodies are decoded into these types exactly once, at the
//! client boundary. Fields the store omits on some endpoints are
//! `Option` or defaulted so a partial payload never fails the decode.

use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A catalog product as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: u64,
    pub images: Vec<String>,
}

/// A store account. The profile endpoint returns the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Payload for creating or replacing a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
}

/// Response of the email availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAvailability {
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
}

/// One line item in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "productId")]
    pub product_id: u64,
    pub quantity: u32,
}

/// A shopping cart. `id` is absent on payloads that have not been
/// stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub date: String,
    #[serde(default)]
    pub products: Vec<CartItem>,
}

/// Credentials for the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl From<&stampede_config::LoginConfig> for LoginCredentials {
    fn from(login: &stampede_config::LoginConfig) -> Self {
        Self::new(&login.email, &login.password)
    }
}

/// Token pair issued by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
