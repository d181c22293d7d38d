//! Typed clients for the fake-store REST API
//!
//! One session ([`FakeStoreApi`]) per virtual user wraps a
//! [`StoreClient`](stampede_http::StoreClient) and exposes resource
//! clients for products, users, carts, categories and auth. Response
//! bodies are decoded into the [`records`] types exactly once, at the
//! client boundary; load behaviors never touch raw JSON.

pub mod auth;
pub mod carts;
pub mod categories;
pub mod error;
pub mod generators;
pub mod products;
pub mod records;
pub mod session;
pub mod users;

pub use auth::AuthApi;
pub use carts::CartsApi;
pub use categories::CategoriesApi;
pub use error::{ApiError, ApiResult};
pub use generators::{random_cart, random_product, random_user};
pub use products::ProductsApi;
pub use records::{
    AuthTokens, Cart, CartItem, Category, EmailAvailability, LoginCredentials, NewProduct, NewUser,
    Product, User,
};
pub use session::FakeStoreApi;
pub use users::UsersApi;

use serde::de::DeserializeOwned;
use stampede_http::ApiResponse;

/// Decode a response body, labeling the record kind on failure.
pub(crate) fn decode_body<T: DeserializeOwned>(what: &'static str, response: &ApiResponse) -> ApiResult<T> {
    response.decode().map_err(|err| ApiError::decode(what, err))
}
