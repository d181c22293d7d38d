//! Authentication endpoints and token lifecycle

use serde_json::json;
use stampede_http::StoreClient;
use tracing::debug;

use crate::decode_body;
use crate::error::{ApiError, ApiResult};
use crate::records::{AuthTokens, LoginCredentials, User};

/// Client for `/auth`. Holds a mutable borrow of the store client so a
/// successful login can install the bearer token used by every
/// subsequent request.
#[derive(Debug)]
pub struct AuthApi<'a> {
    client: &'a mut StoreClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a mut StoreClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token pair.
    ///
    /// On a 2xx answer the access token is stored and the pair returned.
    /// A rejection (wrong password, rate limit) yields `Ok(None)`; the
    /// failed check is already recorded against the request, and callers
    /// branch on [`is_authenticated`](Self::is_authenticated) exactly as
    /// they would after a silent login failure.
    pub async fn login(&mut self, credentials: &LoginCredentials) -> ApiResult<Option<AuthTokens>> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let response = self.client.post("login", "/auth/login", &body).await?;

        if !response.ok() {
            debug!(status = response.status, "login rejected");
            return Ok(None);
        }

        let tokens: AuthTokens = decode_body("token pair", &response)?;
        self.client.set_bearer_token(Some(tokens.access_token.clone()));
        debug!("login succeeded, bearer token installed");
        Ok(Some(tokens))
    }

    /// Fetch the profile of the logged-in account.
    pub async fn profile(&mut self) -> ApiResult<User> {
        if !self.client.has_bearer_token() {
            return Err(ApiError::NotAuthenticated);
        }
        let response = self.client.get("profile", "/auth/profile").await?;
        decode_body("profile", &response)
    }

    /// Trade a refresh token for a fresh pair, replacing the stored
    /// access token on success.
    pub async fn refresh(&mut self, refresh_token: &str) -> ApiResult<Option<AuthTokens>> {
        let body = json!({ "refreshToken": refresh_token });
        let response = self.client.post("refresh_token", "/auth/refresh-token", &body).await?;

        if !response.ok() {
            debug!(status = response.status, "token refresh rejected");
            return Ok(None);
        }

        let tokens: AuthTokens = decode_body("token pair", &response)?;
        self.client.set_bearer_token(Some(tokens.access_token.clone()));
        Ok(Some(tokens))
    }

    /// Drop the stored token.
    pub fn logout(&mut self) {
        if self.client.has_bearer_token() {
            debug!("logging out, clearing bearer token");
        }
        self.client.set_bearer_token(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.has_bearer_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FakeStoreApi;
    use stampede_config::TestDataConfig;
    use stampede_http::HttpMethod;

    fn store_with_login(status: u16, body: serde_json::Value) -> FakeStoreApi {
        let mut store = FakeStoreApi::offline(TestDataConfig::default()).unwrap();
        store
            .client_mut()
            .add_mock_with_status(HttpMethod::Post, "/auth/login", status, body);
        store
    }

    #[tokio::test]
    async fn test_login_installs_token() {
        let mut store = store_with_login(201, json!({"access_token": "jwt-a", "refresh_token": "jwt-r"}));

        let tokens = store.auth().login(&LoginCredentials::new("john@mail.com", "changeme")).await.unwrap();
        assert_eq!(tokens.unwrap().access_token, "jwt-a");
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_session_anonymous() {
        let mut store = store_with_login(401, json!({"message": "Unauthorized"}));

        let tokens = store.auth().login(&LoginCredentials::new("john@mail.com", "wrong")).await.unwrap();
        assert!(tokens.is_none());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let mut store = store_with_login(201, json!({"access_token": "jwt-a"}));

        let err = store.auth().profile().await.unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));

        store.auth().login(&LoginCredentials::new("john@mail.com", "changeme")).await.unwrap();
        store.client_mut().add_mock(
            HttpMethod::Get,
            "/auth/profile",
            json!({"id": 1, "email": "john@mail.com", "role": "customer"}),
        );

        let profile = store.auth().profile().await.unwrap();
        assert_eq!(profile.id, 1);
    }

    #[tokio::test]
    async fn test_refresh_replaces_token() {
        let mut store = store_with_login(201, json!({"access_token": "jwt-a", "refresh_token": "jwt-r"}));
        store.client_mut().add_mock(
            HttpMethod::Post,
            "/auth/refresh-token",
            json!({"access_token": "jwt-b", "refresh_token": "jwt-r2"}),
        );

        store.auth().login(&LoginCredentials::new("john@mail.com", "changeme")).await.unwrap();
        let refreshed = store.auth().refresh("jwt-r").await.unwrap().unwrap();
        assert_eq!(refreshed.access_token, "jwt-b");
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let mut store = store_with_login(201, json!({"access_token": "jwt-a"}));
        store.auth().login(&LoginCredentials::new("john@mail.com", "changeme")).await.unwrap();
        assert!(store.is_authenticated());

        store.auth().logout();
        assert!(!store.is_authenticated());
    }
}
