//! Per-virtual-user store session

use stampede_config::{TargetConfig, TestDataConfig};
use stampede_http::{SharedMetrics, StoreClient};

use crate::auth::AuthApi;
use crate::carts::CartsApi;
use crate::categories::CategoriesApi;
use crate::error::ApiResult;
use crate::products::ProductsApi;
use crate::users::UsersApi;

/// Facade over every resource client plus the session state they share.
///
/// Each virtual user owns one `FakeStoreApi`; the bearer token captured by
/// a login is scoped to that user and never leaks across sessions. All
/// request outcomes flow to whatever metrics sink the underlying client
/// was built with.
#[derive(Debug)]
pub struct FakeStoreApi {
    client: StoreClient,
    data: TestDataConfig,
}

impl FakeStoreApi {
    pub fn new(client: StoreClient, data: TestDataConfig) -> Self {
        Self { client, data }
    }

    /// Build a session talking to `target`, reporting to `metrics`.
    pub fn connect(target: &TargetConfig, data: TestDataConfig, metrics: SharedMetrics) -> ApiResult<Self> {
        let client = StoreClient::new(target.clone())?.with_metrics(metrics);
        Ok(Self::new(client, data))
    }

    /// Build a session that answers from registered mocks only.
    pub fn offline(data: TestDataConfig) -> ApiResult<Self> {
        let mut client = StoreClient::new(TargetConfig::default())?;
        client.set_offline();
        Ok(Self::new(client, data))
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(&self.client)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(&self.client)
    }

    pub fn carts(&self) -> CartsApi<'_> {
        CartsApi::new(&self.client)
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(&self.client)
    }

    /// Auth operations borrow mutably; a login rewrites the token every
    /// later request sends.
    pub fn auth(&mut self) -> AuthApi<'_> {
        AuthApi::new(&mut self.client)
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.has_bearer_token()
    }

    /// Test-data pools (sample ids, price windows, login credentials).
    pub fn data(&self) -> &TestDataConfig {
        &self.data
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut StoreClient {
        &mut self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stampede_http::HttpMethod;

    #[tokio::test]
    async fn test_token_is_shared_across_resource_clients() {
        let mut store = FakeStoreApi::offline(TestDataConfig::default()).unwrap();
        store.client_mut().add_mock_with_status(
            HttpMethod::Post,
            "/auth/login",
            201,
            json!({"access_token": "jwt-a"}),
        );

        let login = store.data().login.clone();
        store.auth().login(&crate::LoginCredentials::from(&login)).await.unwrap();

        assert!(store.is_authenticated());
        assert!(store.client().has_bearer_token());
    }

    #[tokio::test]
    async fn test_data_pools_reach_behaviors() {
        let store = FakeStoreApi::offline(TestDataConfig::default()).unwrap();
        assert!(!store.data().product_sample_ids.is_empty());
        assert_eq!(store.data().login.email, "john@mail.com");
    }
}
