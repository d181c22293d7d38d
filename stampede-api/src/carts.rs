//! Shopping cart endpoints

use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use stampede_http::{BatchRequest, StoreClient};

use crate::decode_body;
use crate::error::ApiResult;
use crate::records::Cart;

/// Client for `/carts`.
#[derive(Debug)]
pub struct CartsApi<'a> {
    client: &'a StoreClient,
}

impl<'a> CartsApi<'a> {
    pub(crate) fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Cart>> {
        let response = self.client.get("list_carts", "/carts").await?;
        decode_body("cart list", &response)
    }

    pub async fn by_id(&self, id: u64) -> ApiResult<Cart> {
        let response = self.client.get("cart_by_id", &format!("/carts/{id}")).await?;
        decode_body("cart", &response)
    }

    /// Fetch every cart belonging to one user.
    pub async fn for_user(&self, user_id: u64) -> ApiResult<Vec<Cart>> {
        let response = self.client.get("carts_for_user", &format!("/carts/user/{user_id}")).await?;
        decode_body("cart list", &response)
    }

    /// Fetch carts dated within `[start, end]`.
    pub async fn in_date_range(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<Cart>> {
        let path = format!("/carts?startdate={start}&enddate={end}");
        let response = self.client.get("carts_in_range", &path).await?;
        decode_body("cart list", &response)
    }

    /// Store a new cart; the submitted `id` field, if any, is ignored.
    pub async fn create(&self, cart: &Cart) -> ApiResult<Cart> {
        let body = serde_json::to_value(cart).map_err(|err| crate::ApiError::decode("cart payload", err))?;
        let response = self.client.post("create_cart", "/carts", &body).await?;
        decode_body("created cart", &response)
    }

    pub async fn update(&self, id: u64, cart: &Cart) -> ApiResult<Cart> {
        let body = serde_json::to_value(cart).map_err(|err| crate::ApiError::decode("cart payload", err))?;
        let response = self.client.put("update_cart", &format!("/carts/{id}"), &body).await?;
        decode_body("updated cart", &response)
    }

    /// Apply a partial update, e.g. `json!({"userId": 4})`.
    pub async fn patch(&self, id: u64, changes: &JsonValue) -> ApiResult<Cart> {
        let response = self.client.patch("patch_cart", &format!("/carts/{id}"), changes).await?;
        decode_body("patched cart", &response)
    }

    pub async fn delete(&self, id: u64) -> ApiResult<bool> {
        let response = self.client.delete("delete_cart", &format!("/carts/{id}")).await?;
        decode_body("delete result", &response)
    }

    /// Fetch several carts by id in parallel, preserving input order.
    pub async fn batch_by_ids(&self, ids: &[u64]) -> Vec<ApiResult<Cart>> {
        let requests = ids
            .iter()
            .map(|id| BatchRequest::get("cart_by_id", format!("/carts/{id}")))
            .collect();

        self.client
            .batch(requests)
            .await
            .into_iter()
            .map(|result| decode_body("cart", &result?))
            .collect()
    }
}
