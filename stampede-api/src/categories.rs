//! Category endpoints

use stampede_http::{BatchRequest, StoreClient};

use crate::decode_body;
use crate::error::ApiResult;
use crate::records::{Category, Product};

/// Client for `/categories`. The store treats categories as read-only
/// reference data, so only lookups are exposed.
#[derive(Debug)]
pub struct CategoriesApi<'a> {
    client: &'a StoreClient,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, offset: u32, limit: u32) -> ApiResult<Vec<Category>> {
        let path = format!("/categories?offset={offset}&limit={limit}");
        let response = self.client.get("list_categories", &path).await?;
        decode_body("category page", &response)
    }

    pub async fn by_id(&self, id: u64) -> ApiResult<Category> {
        let response = self.client.get("category_by_id", &format!("/categories/{id}")).await?;
        decode_body("category", &response)
    }

    /// Fetch a page of products filed under one category.
    pub async fn products_in(&self, category_id: u64, offset: u32, limit: u32) -> ApiResult<Vec<Product>> {
        let path = format!("/categories/{category_id}/products?offset={offset}&limit={limit}");
        let response = self.client.get("category_products", &path).await?;
        decode_body("product page", &response)
    }

    /// Fetch several categories by id in parallel, preserving input order.
    pub async fn batch_by_ids(&self, ids: &[u64]) -> Vec<ApiResult<Category>> {
        let requests = ids
            .iter()
            .map(|id| BatchRequest::get("category_by_id", format!("/categories/{id}")))
            .collect();

        self.client
            .batch(requests)
            .await
            .into_iter()
            .map(|result| decode_body("category", &result?))
            .collect()
    }
}
