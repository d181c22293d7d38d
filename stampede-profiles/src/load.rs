//! Steady-traffic profile
//!
//! Ordinary storefront usage at a constant user count: catalog browsing,
//! search, product detail views and the occasional login. The baseline the
//! other profiles are compared against.

use std::sync::Arc;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use stampede_api::{ApiError, ApiResult, FakeStoreApi, LoginCredentials};
use stampede_config::{Stage, ThinkTime, Threshold};
use stampede_core::{CoreResult, IterationInfo, ScenarioCatalog, ScenarioKey, ScenarioSpec};

use crate::definition::ProfileDefinition;
use crate::support::{pause, sample_id, sample_range};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadScenario {
    BrowseCatalog,
    SearchAndFilter,
    ViewProductDetails,
    UserManagement,
    CategoryBrowsing,
    AuthenticationFlow,
}

impl ScenarioKey for LoadScenario {
    fn name(&self) -> &'static str {
        match self {
            Self::BrowseCatalog => "browse_catalog",
            Self::SearchAndFilter => "search_and_filter",
            Self::ViewProductDetails => "view_product_details",
            Self::UserManagement => "user_management",
            Self::CategoryBrowsing => "category_browsing",
            Self::AuthenticationFlow => "authentication_flow",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::BrowseCatalog,
            Self::SearchAndFilter,
            Self::ViewProductDetails,
            Self::UserManagement,
            Self::CategoryBrowsing,
            Self::AuthenticationFlow,
        ]
    }
}

/// Assemble the steady-traffic profile.
pub fn definition() -> CoreResult<ProfileDefinition<LoadScenario>> {
    let catalog = ScenarioCatalog::builder()
        .scenario(
            ScenarioSpec::new(LoadScenario::BrowseCatalog, 30)
                .with_description("Catalog browsing and pagination"),
        )
        .scenario(
            ScenarioSpec::new(LoadScenario::SearchAndFilter, 25)
                .with_description("Search, filter by price, and category"),
        )
        .scenario(
            ScenarioSpec::new(LoadScenario::ViewProductDetails, 20)
                .with_description("Deep dive into product pages"),
        )
        .scenario(
            ScenarioSpec::new(LoadScenario::UserManagement, 5)
                .with_description("Admin/profile views and registration checks"),
        )
        .scenario(
            ScenarioSpec::new(LoadScenario::CategoryBrowsing, 15)
                .with_description("Category list and product listing"),
        )
        .scenario(
            ScenarioSpec::new(LoadScenario::AuthenticationFlow, 5)
                .with_description("Login, get profile, and logout"),
        )
        .behavior(LoadScenario::BrowseCatalog, browse_catalog)
        .behavior(LoadScenario::SearchAndFilter, search_and_filter)
        .behavior(LoadScenario::ViewProductDetails, view_product_details)
        .behavior(LoadScenario::UserManagement, user_management)
        .behavior(LoadScenario::CategoryBrowsing, category_browsing)
        .behavior(LoadScenario::AuthenticationFlow, authentication_flow)
        .build()?;

    Ok(ProfileDefinition {
        name: "load",
        description: "Expected traffic patterns at a steady user count",
        banner: "🚀 Starting Load Test for Fake Store API",
        focus: "Expected load patterns under normal conditions",
        completion: "✅ Load Test completed",
        notes: &["📈 Check the test results for performance metrics"],
        catalog: Arc::new(catalog),
        stages: vec![
            Stage::new("2m", 10),
            Stage::new("5m", 10),
            Stage::new("2m", 0),
        ],
        thresholds: vec![
            Threshold::p95_under_ms(500.0),
            Threshold::error_rate_below(0.1),
            Threshold::min_total_requests(100),
        ],
        pacing: ThinkTime::fixed(1.0, 3.0),
        surge: None,
        iteration_interval: 50,
    })
}

/// Page through the catalog the way a browsing user does.
fn browse_catalog<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 20).await?;
        pause(0.5).await;

        session.products().list(20, 20).await?;
        pause(0.3).await;

        session.products().list(40, 20).await?;
        pause(0.2).await;
        Ok(())
    })
}

/// Title search followed by price and category filters.
fn search_and_filter<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().search("shirt").await?;
        pause(0.4).await;

        let range = sample_range(rng, &session.data().price_ranges);
        session.products().by_price_range(range.min, range.max).await?;
        pause(0.3).await;

        let category_id = sample_id(rng, &session.data().category_sample_ids);
        session.products().by_category(category_id, 0, 10).await?;
        pause(0.2).await;
        Ok(())
    })
}

/// Skim a listing page, then open the first few well-known products.
fn view_product_details<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 10).await?;
        pause(0.2).await;

        let ids: Vec<u64> = session
            .data()
            .product_sample_ids
            .iter()
            .take(3)
            .map(|id| u64::from(*id))
            .collect();
        for id in ids {
            session.products().by_id(id).await?;
            pause(0.5).await;
        }
        Ok(())
    })
}

/// User listing, a profile read and an email availability check.
fn user_management<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.users().list(0, 10).await?;
        pause(0.3).await;

        let user_id = sample_id(rng, &session.data().user_sample_ids);
        session.users().by_id(user_id).await?;
        pause(0.4).await;

        let email = format!("test{}@example.com", rng.random_range(0..=999));
        session.users().is_email_available(&email).await?;
        pause(0.2).await;
        Ok(())
    })
}

/// Category listing, one category opened, then its product shelf.
fn category_browsing<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.categories().list(0, 10).await?;
        pause(0.3).await;

        let category_id = sample_id(rng, &session.data().category_sample_ids);
        session.categories().by_id(category_id).await?;
        pause(0.2).await;

        session.categories().products_in(category_id, 0, 15).await?;
        pause(0.4).await;
        Ok(())
    })
}

/// Login, profile read and logout. Failures are logged, not propagated,
/// so a rejected login never fails the whole iteration.
fn authentication_flow<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            let login = session.data().login.clone();
            session.auth().login(&LoginCredentials::from(&login)).await?;
            pause(0.5).await;

            if session.is_authenticated() {
                session.auth().profile().await?;
                pause(0.3).await;

                session.auth().logout();
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(error = %err, "authentication flow error");
        }
        pause(0.2).await;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use serde_json::json;
    use stampede_config::TestDataConfig;
    use stampede_http::HttpMethod;

    fn offline_session() -> FakeStoreApi {
        FakeStoreApi::offline(TestDataConfig::default()).unwrap()
    }

    #[test]
    fn test_definition_weights_cover_the_traffic_mix() {
        let definition = definition().unwrap();
        assert_eq!(definition.catalog.len(), 6);

        let total: u32 = definition
            .catalog
            .entries()
            .iter()
            .map(|entry| entry.effective_weight(None, 0))
            .sum();
        assert_eq!(total, 100);
        assert!(definition.surge.is_none());
        assert_eq!(definition.iteration_interval, 50);
    }

    #[tokio::test(start_paused = true)]
    async fn test_browse_catalog_pages_through_listings() {
        let mut session = offline_session();
        for offset in [0, 20, 40] {
            session.client_mut().add_mock(
                HttpMethod::Get,
                &format!("/products?offset={offset}&limit=20"),
                json!([{"id": 1, "title": "Shirt", "price": 9.99}]),
            );
        }

        let mut rng = StdRng::seed_from_u64(1);
        let info = IterationInfo::new(1, 0, 0);
        browse_catalog(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_and_filter_uses_seeded_pools() {
        let mut session = offline_session();
        session.client_mut().add_mock(
            HttpMethod::Get,
            "/products?title=shirt",
            json!([{"id": 2, "title": "Blue Shirt", "price": 19.99}]),
        );
        // every seed pool combination the seeded draws can land on
        let ranges = session.data().price_ranges.clone();
        for range in &ranges {
            session.client_mut().add_mock(
                HttpMethod::Get,
                &format!("/products?price_min={}&price_max={}", range.min, range.max),
                json!([]),
            );
        }
        let categories = session.data().category_sample_ids.clone();
        for category in categories {
            session.client_mut().add_mock(
                HttpMethod::Get,
                &format!("/products?categoryId={category}&offset=0&limit=10"),
                json!([]),
            );
        }

        let mut rng = StdRng::seed_from_u64(42);
        let info = IterationInfo::new(1, 0, 0);
        search_and_filter(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_product_details_opens_first_three_samples() {
        let mut session = offline_session();
        session.client_mut().add_mock(
            HttpMethod::Get,
            "/products?offset=0&limit=10",
            json!([{"id": 1, "title": "Shirt", "price": 9.99}]),
        );
        // first three sample ids, in declaration order
        for id in [1, 2, 3] {
            session.client_mut().add_mock(
                HttpMethod::Get,
                &format!("/products/{id}"),
                json!({"id": id, "title": "Shirt", "price": 9.99}),
            );
        }

        let mut rng = StdRng::seed_from_u64(7);
        let info = IterationInfo::new(1, 0, 0);
        view_product_details(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_authentication_flow_swallows_login_rejection() {
        // no mocks at all: the login call fails, the behavior logs and
        // finishes clean
        let mut session = offline_session();
        let mut rng = StdRng::seed_from_u64(3);
        let info = IterationInfo::new(1, 0, 0);
        authentication_flow(&mut session, &mut rng, info).await.unwrap();
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_browse_catalog_propagates_transport_failure() {
        let mut session = offline_session();
        let mut rng = StdRng::seed_from_u64(5);
        let info = IterationInfo::new(1, 0, 0);
        let err = browse_catalog(&mut session, &mut rng, info).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
