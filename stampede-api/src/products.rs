//! Product catalog endpoints

use serde_json::Value as JsonValue;
use stampede_http::{BatchRequest, StoreClient};

use crate::decode_body;
use crate::error::ApiResult;
use crate::records::{NewProduct, Product};

/// Client for `/products`.
#[derive(Debug)]
pub struct ProductsApi<'a> {
    client: &'a StoreClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Fetch a page of the catalog.
    pub async fn list(&self, offset: u32, limit: u32) -> ApiResult<Vec<Product>> {
        let path = format!("/products?offset={offset}&limit={limit}");
        let response = self.client.get("list_products", &path).await?;
        decode_body("product page", &response)
    }

    pub async fn by_id(&self, id: u64) -> ApiResult<Product> {
        let response = self.client.get("product_by_id", &format!("/products/{id}")).await?;
        decode_body("product", &response)
    }

    /// Fetch a page of one category's products.
    pub async fn by_category(&self, category_id: u64, offset: u32, limit: u32) -> ApiResult<Vec<Product>> {
        let path = format!("/products?categoryId={category_id}&offset={offset}&limit={limit}");
        let response = self.client.get("products_by_category", &path).await?;
        decode_body("product page", &response)
    }

    /// Fetch products priced within `[min, max]`.
    pub async fn by_price_range(&self, min: u32, max: u32) -> ApiResult<Vec<Product>> {
        let path = format!("/products?price_min={min}&price_max={max}");
        let response = self.client.get("products_by_price", &path).await?;
        decode_body("product page", &response)
    }

    /// Search the catalog by title substring.
    pub async fn search(&self, title: &str) -> ApiResult<Vec<Product>> {
        let path = format!("/products?title={title}");
        let response = self.client.get("search_products", &path).await?;
        decode_body("product page", &response)
    }

    pub async fn create(&self, product: &NewProduct) -> ApiResult<Product> {
        let body = serde_json::to_value(product).map_err(|err| crate::ApiError::decode("product payload", err))?;
        let response = self.client.post("create_product", "/products", &body).await?;
        decode_body("created product", &response)
    }

    /// Replace a product wholesale.
    pub async fn update(&self, id: u64, product: &NewProduct) -> ApiResult<Product> {
        let body = serde_json::to_value(product).map_err(|err| crate::ApiError::decode("product payload", err))?;
        let response = self.client.put("update_product", &format!("/products/{id}"), &body).await?;
        decode_body("updated product", &response)
    }

    /// Apply a partial update, e.g. `json!({"price": 12.5})`.
    pub async fn patch(&self, id: u64, changes: &JsonValue) -> ApiResult<Product> {
        let response = self.client.patch("patch_product", &format!("/products/{id}"), changes).await?;
        decode_body("patched product", &response)
    }

    /// Delete a product; the store answers with a bare boolean.
    pub async fn delete(&self, id: u64) -> ApiResult<bool> {
        let response = self.client.delete("delete_product", &format!("/products/{id}")).await?;
        decode_body("delete result", &response)
    }

    /// Fetch several products by id in parallel. Output order matches the
    /// input ids; each entry fails or decodes independently.
    pub async fn batch_by_ids(&self, ids: &[u64]) -> Vec<ApiResult<Product>> {
        let requests = ids
            .iter()
            .map(|id| BatchRequest::get("product_by_id", format!("/products/{id}")))
            .collect();

        self.client
            .batch(requests)
            .await
            .into_iter()
            .map(|result| decode_body("product", &result?))
            .collect()
    }
}
