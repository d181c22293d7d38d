//! Breaking-point profile
//!
//! Escalating user counts with dense request sequences and write traffic,
//! looking for the load level where latency or error rates give way.

use std::sync::Arc;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::json;
use tracing::debug;

use stampede_api::{ApiError, ApiResult, FakeStoreApi, LoginCredentials, NewProduct, NewUser};
use stampede_config::{Stage, ThinkTime, Threshold};
use stampede_core::{CoreResult, IterationInfo, ScenarioCatalog, ScenarioKey, ScenarioSpec};

use crate::definition::ProfileDefinition;
use crate::support::{log_failure, pause, sample_id, unique_suffix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StressScenario {
    RapidFireRequests,
    HeavyDataRetrieval,
    ConcurrentCrudOperations,
    AuthenticatedHeavyLoad,
    MixedWorkload,
    ResourceExhaustion,
}

impl ScenarioKey for StressScenario {
    fn name(&self) -> &'static str {
        match self {
            Self::RapidFireRequests => "rapid_fire_requests",
            Self::HeavyDataRetrieval => "heavy_data_retrieval",
            Self::ConcurrentCrudOperations => "concurrent_crud_operations",
            Self::AuthenticatedHeavyLoad => "authenticated_heavy_load",
            Self::MixedWorkload => "mixed_workload",
            Self::ResourceExhaustion => "resource_exhaustion",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::RapidFireRequests,
            Self::HeavyDataRetrieval,
            Self::ConcurrentCrudOperations,
            Self::AuthenticatedHeavyLoad,
            Self::MixedWorkload,
            Self::ResourceExhaustion,
        ]
    }
}

/// Assemble the breaking-point profile.
pub fn definition() -> CoreResult<ProfileDefinition<StressScenario>> {
    let catalog = ScenarioCatalog::builder()
        .scenario(
            ScenarioSpec::new(StressScenario::RapidFireRequests, 20)
                .with_description("Rapid, sequential requests for popular products."),
        )
        .scenario(
            ScenarioSpec::new(StressScenario::HeavyDataRetrieval, 25)
                .with_description("Requests for large datasets and batch lookups."),
        )
        .scenario(
            ScenarioSpec::new(StressScenario::ConcurrentCrudOperations, 20)
                .with_description("Simultaneous creation, update, and deletion of resources."),
        )
        .scenario(
            ScenarioSpec::new(StressScenario::AuthenticatedHeavyLoad, 15)
                .with_description("Login and subsequent heavy profile/user data retrieval."),
        )
        .scenario(
            ScenarioSpec::new(StressScenario::MixedWorkload, 10)
                .with_description("Mix of read and write operations."),
        )
        .scenario(
            ScenarioSpec::new(StressScenario::ResourceExhaustion, 10)
                .with_description("Testing system limits with extremely large/complex queries."),
        )
        .behavior(StressScenario::RapidFireRequests, rapid_fire_requests)
        .behavior(StressScenario::HeavyDataRetrieval, heavy_data_retrieval)
        .behavior(StressScenario::ConcurrentCrudOperations, concurrent_crud_operations)
        .behavior(StressScenario::AuthenticatedHeavyLoad, authenticated_heavy_load)
        .behavior(StressScenario::MixedWorkload, mixed_workload)
        .behavior(StressScenario::ResourceExhaustion, resource_exhaustion)
        .build()?;

    Ok(ProfileDefinition {
        name: "stress",
        description: "Escalating user counts hunting the breaking point",
        banner: "🔥 Starting Stress Test for Fake Store API",
        focus: "Testing system limits and potential breaking points",
        completion: "🔥 Stress Test completed",
        notes: &[
            "📈 Analyze results for system breaking points and recovery behavior",
            "🔍 Key metrics to check:",
            "   - Max error rate before failure",
            "   - Max concurrent users/requests handled",
            "   - Resource utilization (CPU, memory) at peak load",
        ],
        catalog: Arc::new(catalog),
        stages: vec![
            Stage::new("2m", 10),
            Stage::new("5m", 10),
            Stage::new("2m", 20),
            Stage::new("5m", 20),
            Stage::new("2m", 50),
            Stage::new("5m", 50),
            Stage::new("2m", 0),
        ],
        thresholds: vec![
            Threshold::p95_under_ms(1000.0),
            Threshold::error_rate_below(0.2),
        ],
        pacing: ThinkTime::fixed(0.1, 0.6),
        surge: None,
        iteration_interval: 50,
    })
}

/// Five detail reads back to back, then three wide listing pages.
fn rapid_fire_requests<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for _ in 0..5 {
            let product_id = sample_id(rng, &session.data().product_sample_ids);
            session.products().by_id(product_id).await?;
        }

        pause(0.1).await;

        session.products().list(0, 50).await?;
        session.products().list(50, 50).await?;
        session.products().list(100, 50).await?;
        Ok(())
    })
}

/// Large listing pages, a parallel batch of detail reads and a full
/// category shelf sweep.
fn heavy_data_retrieval<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 100).await?;
        pause(0.2).await;

        let batch_ids: Vec<u64> = session
            .data()
            .product_sample_ids
            .iter()
            .map(|id| u64::from(*id))
            .collect();
        for result in session.products().batch_by_ids(&batch_ids).await {
            log_failure("product_batch", result);
        }
        pause(0.2).await;

        for id in session.data().category_sample_ids.iter().copied() {
            session.categories().products_in(u64::from(id), 0, 50).await?;
        }
        Ok(())
    })
}

/// Create, patch and delete a small batch of products. The whole block
/// tolerates failure so a rejected write never fails the iteration.
fn concurrent_crud_operations<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            let mut created = Vec::new();
            for i in 0..3 {
                let product = NewProduct {
                    title: format!("Performance Test Product {}_{i}", unique_suffix()),
                    price: f64::from(rng.random_range(10..=210)),
                    description: "A product created during performance testing".to_string(),
                    category_id: 1,
                    images: vec!["https://via.placeholder.com/640x480?text=Test+Product".to_string()],
                };
                let response = session.products().create(&product).await?;
                created.push(response.id);
            }

            pause(0.1).await;

            for id in &created {
                let changes = json!({ "price": rng.random_range(20..=320) });
                session.products().patch(*id, &changes).await?;
            }

            pause(0.1).await;

            for id in created {
                session.products().delete(id).await?;
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(error = %err, "crud operations error");
        }
        Ok(())
    })
}

/// Repeated profile reads and user sweeps inside one login session.
fn authenticated_heavy_load<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            let login = session.data().login.clone();
            session.auth().login(&LoginCredentials::from(&login)).await?;

            if session.is_authenticated() {
                for _ in 0..10 {
                    session.auth().profile().await?;
                }

                pause(0.1).await;

                session.users().list(0, 100).await?;

                for id in session.data().user_sample_ids.iter().copied() {
                    session.users().by_id(u64::from(id)).await?;
                }

                session.auth().logout();
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(error = %err, "authenticated heavy load error");
        }
        Ok(())
    })
}

/// Three to five operations drawn at random from a mixed read/write set.
fn mixed_workload<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let operation_count = rng.random_range(3..=5);
        for _ in 0..operation_count {
            match rng.random_range(0..6) {
                0 => {
                    session.products().list(rng.random_range(0..=99), 25).await?;
                }
                1 => {
                    let product_id = sample_id(rng, &session.data().product_sample_ids);
                    session.products().by_id(product_id).await?;
                }
                2 => {
                    session.categories().list(0, 10).await?;
                }
                3 => {
                    session.users().list(rng.random_range(0..=49), 20).await?;
                }
                4 => {
                    let product = NewProduct {
                        title: format!("Stress Test Product {}", unique_suffix()),
                        price: f64::from(rng.random_range(0..=1000)),
                        description: "A product created during performance testing".to_string(),
                        category_id: 1,
                        images: vec![
                            "https://via.placeholder.com/640x480?text=Test+Product".to_string(),
                        ],
                    };
                    session.products().create(&product).await?;
                }
                _ => {
                    let suffix = unique_suffix();
                    let user = NewUser {
                        name: format!("Stress User {suffix}"),
                        email: format!("stress_{suffix}@test.com"),
                        password: "testpassword123".to_string(),
                        avatar: "https://via.placeholder.com/150x150?text=Test+User".to_string(),
                    };
                    session.users().create(&user).await?;
                }
            }
        }
        Ok(())
    })
}

/// Maximum-size pagination plus every price filter in one burst.
fn resource_exhaustion<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            for i in 0..5u32 {
                session.products().list(i * 200, 200).await?;
            }

            for range in session.data().price_ranges.iter().copied() {
                session.products().by_price_range(range.min, range.max).await?;
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(error = %err, "resource exhaustion scenario error");
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use stampede_config::TestDataConfig;
    use stampede_http::HttpMethod;

    fn offline_session() -> FakeStoreApi {
        FakeStoreApi::offline(TestDataConfig::default()).unwrap()
    }

    #[test]
    fn test_definition_ramps_to_fifty_users() {
        let definition = definition().unwrap();
        assert_eq!(definition.peak_vus(), 50);
        assert_eq!(definition.total_minutes(), 23.0);
        assert_eq!(definition.vu_progression(), "10 → 10 → 20 → 20 → 50 → 50 → 0");
        assert_eq!(definition.thresholds.len(), 2);

        let total: u32 = definition
            .catalog
            .entries()
            .iter()
            .map(|entry| entry.effective_weight(None, 0))
            .sum();
        assert_eq!(total, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_fire_hits_details_then_listings() {
        let mut session = offline_session();
        let sample_ids = session.data().product_sample_ids.clone();
        for id in sample_ids {
            session.client_mut().add_mock(
                HttpMethod::Get,
                &format!("/products/{id}"),
                serde_json::json!({"id": id, "title": "Shirt", "price": 9.99}),
            );
        }
        for offset in [0, 50, 100] {
            session.client_mut().add_mock(
                HttpMethod::Get,
                &format!("/products?offset={offset}&limit=50"),
                serde_json::json!([]),
            );
        }

        let mut rng = StdRng::seed_from_u64(11);
        let info = IterationInfo::new(1, 0, 0);
        rapid_fire_requests(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_crud_block_tolerates_rejected_writes() {
        // nothing mocked: the first create fails, the block logs and the
        // iteration still completes
        let mut session = offline_session();
        let mut rng = StdRng::seed_from_u64(2);
        let info = IterationInfo::new(1, 0, 0);
        concurrent_crud_operations(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_resource_exhaustion_tolerates_missing_endpoints() {
        let mut session = offline_session();
        let mut rng = StdRng::seed_from_u64(4);
        let info = IterationInfo::new(1, 0, 0);
        resource_exhaustion(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_heavy_data_retrieval_propagates_listing_failure() {
        let mut session = offline_session();
        let mut rng = StdRng::seed_from_u64(8);
        let info = IterationInfo::new(1, 0, 0);
        let err = heavy_data_retrieval(&mut session, &mut rng, info).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
