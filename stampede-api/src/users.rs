//! User account endpoints

use serde_json::{json, Value as JsonValue};
use stampede_http::{BatchRequest, StoreClient};

use crate::decode_body;
use crate::error::ApiResult;
use crate::records::{EmailAvailability, NewUser, User};

/// Client for `/users`.
#[derive(Debug)]
pub struct UsersApi<'a> {
    client: &'a StoreClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a StoreClient) -> Self {
        Self { client }
    }

    /// Fetch a page of accounts.
    pub async fn list(&self, offset: u32, limit: u32) -> ApiResult<Vec<User>> {
        let path = format!("/users?offset={offset}&limit={limit}");
        let response = self.client.get("list_users", &path).await?;
        decode_body("user page", &response)
    }

    pub async fn by_id(&self, id: u64) -> ApiResult<User> {
        let response = self.client.get("user_by_id", &format!("/users/{id}")).await?;
        decode_body("user", &response)
    }

    pub async fn create(&self, user: &NewUser) -> ApiResult<User> {
        let body = serde_json::to_value(user).map_err(|err| crate::ApiError::decode("user payload", err))?;
        let response = self.client.post("create_user", "/users", &body).await?;
        decode_body("created user", &response)
    }

    pub async fn update(&self, id: u64, user: &NewUser) -> ApiResult<User> {
        let body = serde_json::to_value(user).map_err(|err| crate::ApiError::decode("user payload", err))?;
        let response = self.client.put("update_user", &format!("/users/{id}"), &body).await?;
        decode_body("updated user", &response)
    }

    /// Apply a partial update, e.g. `json!({"name": "Updated"})`.
    pub async fn patch(&self, id: u64, changes: &JsonValue) -> ApiResult<User> {
        let response = self.client.patch("patch_user", &format!("/users/{id}"), changes).await?;
        decode_body("patched user", &response)
    }

    pub async fn delete(&self, id: u64) -> ApiResult<bool> {
        let response = self.client.delete("delete_user", &format!("/users/{id}")).await?;
        decode_body("delete result", &response)
    }

    /// Ask the store whether an email can still be registered.
    pub async fn is_email_available(&self, email: &str) -> ApiResult<bool> {
        let body = json!({ "email": email });
        let response = self.client.post("check_email", "/users/is-available", &body).await?;
        let availability: EmailAvailability = decode_body("availability", &response)?;
        Ok(availability.is_available)
    }

    /// Fetch several users by id in parallel, preserving input order.
    pub async fn batch_by_ids(&self, ids: &[u64]) -> Vec<ApiResult<User>> {
        let requests = ids
            .iter()
            .map(|id| BatchRequest::get("user_by_id", format!("/users/{id}")))
            .collect();

        self.client
            .batch(requests)
            .await
            .into_iter()
            .map(|result| decode_body("user", &result?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FakeStoreApi;
    use stampede_config::TestDataConfig;
    use stampede_http::HttpMethod;

    #[tokio::test]
    async fn test_list_and_by_id() {
        let mut store = FakeStoreApi::offline(TestDataConfig::default()).unwrap();
        store.client_mut().add_mock(
            HttpMethod::Get,
            "/users?offset=0&limit=10",
            json!([{"id": 1, "email": "john@mail.com", "role": "customer"}]),
        );
        store
            .client_mut()
            .add_mock(HttpMethod::Get, "/users/1", json!({"id": 1, "email": "john@mail.com"}));

        let page = store.users().list(0, 10).await.unwrap();
        assert_eq!(page[0].role.as_deref(), Some("customer"));

        let user = store.users().by_id(1).await.unwrap();
        assert_eq!(user.email, "john@mail.com");
    }

    #[tokio::test]
    async fn test_email_availability_unwraps_flag() {
        let mut store = FakeStoreApi::offline(TestDataConfig::default()).unwrap();
        store.client_mut().add_mock(
            HttpMethod::Post,
            "/users/is-available",
            json!({"isAvailable": false}),
        );

        assert!(!store.users().is_email_available("john@mail.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let mut store = FakeStoreApi::offline(TestDataConfig::default()).unwrap();
        store.client_mut().add_mock(
            HttpMethod::Post,
            "/users",
            json!({"id": 31, "email": "new@example.com", "name": "Test User"}),
        );

        let payload = NewUser {
            name: "Test User".to_string(),
            email: "new@example.com".to_string(),
            password: "testpassword123".to_string(),
            avatar: "https://via.placeholder.com/150".to_string(),
        };
        let created = store.users().create(&payload).await.unwrap();
        assert_eq!(created.id, 31);
        assert_eq!(created.name.as_deref(), Some("Test User"));
    }
}
