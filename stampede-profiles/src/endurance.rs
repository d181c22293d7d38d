//! Long-haul profile
//!
//! A modest user count held for forty minutes, watching for drift. Two
//! scenarios are time-gated through dynamic weights: cache warmup joins
//! after ten minutes and memory-stress patterns after twenty, so the mix
//! changes as the run ages.

use std::sync::Arc;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use stampede_api::{ApiError, ApiResult, FakeStoreApi, LoginCredentials};
use stampede_config::{Stage, ThinkTime, Threshold};
use stampede_core::{CoreResult, IterationInfo, ScenarioCatalog, ScenarioKey, ScenarioSpec};

use crate::definition::ProfileDefinition;
use crate::support::{log_failure, pause, sample_id, sample_range, SEARCH_TERMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnduranceScenario {
    RegularUserActivity,
    PeriodicMaintenanceSimulation,
    LongTermBrowsingSession,
    AuthenticatedUserSession,
    BackgroundDataProcessing,
    CacheWarmupActivity,
    MemoryStressPatterns,
}

impl ScenarioKey for EnduranceScenario {
    fn name(&self) -> &'static str {
        match self {
            Self::RegularUserActivity => "regular_user_activity",
            Self::PeriodicMaintenanceSimulation => "periodic_maintenance_simulation",
            Self::LongTermBrowsingSession => "long_term_browsing_session",
            Self::AuthenticatedUserSession => "authenticated_user_session",
            Self::BackgroundDataProcessing => "background_data_processing",
            Self::CacheWarmupActivity => "cache_warmup_activity",
            Self::MemoryStressPatterns => "memory_stress_patterns",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::RegularUserActivity,
            Self::PeriodicMaintenanceSimulation,
            Self::LongTermBrowsingSession,
            Self::AuthenticatedUserSession,
            Self::BackgroundDataProcessing,
            Self::CacheWarmupActivity,
            Self::MemoryStressPatterns,
        ]
    }
}

/// Assemble the long-haul profile.
pub fn definition() -> CoreResult<ProfileDefinition<EnduranceScenario>> {
    let catalog = ScenarioCatalog::builder()
        .scenario(
            ScenarioSpec::new(EnduranceScenario::RegularUserActivity, 70)
                .with_description("Typical browsing patterns"),
        )
        .scenario(
            ScenarioSpec::new(EnduranceScenario::PeriodicMaintenanceSimulation, 5)
                .with_description("System maintenance activities"),
        )
        .scenario(
            ScenarioSpec::new(EnduranceScenario::LongTermBrowsingSession, 15)
                .with_description("Extended user interaction"),
        )
        .scenario(
            ScenarioSpec::new(EnduranceScenario::AuthenticatedUserSession, 8)
                .with_description("Logged-in user activities"),
        )
        .scenario(
            ScenarioSpec::new(EnduranceScenario::BackgroundDataProcessing, 2)
                .with_description("Automated system operations"),
        )
        .scenario(
            ScenarioSpec::new(EnduranceScenario::CacheWarmupActivity, 0)
                .with_description("Keep frequently accessed data warm (dynamic after 10 min)")
                .with_dynamic_weight(|minutes| if minutes > 10 { 10 } else { 0 }),
        )
        .scenario(
            ScenarioSpec::new(EnduranceScenario::MemoryStressPatterns, 0)
                .with_description("Operations that might cause memory issues (dynamic after 20 min)")
                .with_dynamic_weight(|minutes| if minutes > 20 { 10 } else { 0 }),
        )
        .behavior(EnduranceScenario::RegularUserActivity, regular_user_activity)
        .behavior(
            EnduranceScenario::PeriodicMaintenanceSimulation,
            periodic_maintenance_simulation,
        )
        .behavior(EnduranceScenario::LongTermBrowsingSession, long_term_browsing_session)
        .behavior(EnduranceScenario::AuthenticatedUserSession, authenticated_user_session)
        .behavior(EnduranceScenario::BackgroundDataProcessing, background_data_processing)
        .behavior(EnduranceScenario::CacheWarmupActivity, cache_warmup_activity)
        .behavior(EnduranceScenario::MemoryStressPatterns, memory_stress_patterns)
        .build()?;

    Ok(ProfileDefinition {
        name: "endurance",
        description: "Sustained moderate load watching for drift",
        banner: "⏰ Starting Endurance Test for Fake Store API",
        focus: "Focus: Long-term stability and performance consistency",
        completion: "⏰ Endurance Test completed",
        notes: &[
            "📈 Analyze results for long-term stability",
            "🔍 Key endurance metrics to evaluate:",
            "   - Response time consistency over duration",
            "   - Memory usage growth patterns",
            "   - Error rate stability",
            "   - Resource cleanup effectiveness",
            "   - Performance degradation trends",
            "   - System recovery after extended load",
            "   - Database connection pool behavior",
            "   - Cache effectiveness over time",
        ],
        catalog: Arc::new(catalog),
        stages: vec![
            Stage::new("2m", 8),
            Stage::new("40m", 8),
            Stage::new("2m", 0),
        ],
        thresholds: vec![
            Threshold::p95_under_ms(600.0),
            Threshold::error_rate_below(0.1),
        ],
        pacing: ThinkTime::fixed(0.5, 2.0),
        surge: None,
        iteration_interval: 50,
    })
}

/// A listing page, a product detail, and every third iteration a
/// category shelf on top.
fn regular_user_activity<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let offset = rng.random_range(0..50);
        let limit = rng.random_range(10..=20);
        session.products().list(offset, limit).await?;
        pause(0.3).await;

        let product_id = sample_id(rng, &session.data().product_sample_ids);
        session.products().by_id(product_id).await?;
        pause(0.5).await;

        if info.every(3) {
            let category_id = sample_id(rng, &session.data().category_sample_ids);
            session.categories().products_in(category_id, 0, 15).await?;
            pause(0.4).await;
        }
        Ok(())
    })
}

/// Cheap health-check reads, with a deeper batch sweep every hundred
/// iterations.
fn periodic_maintenance_simulation<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 1).await?;
        session.users().list(0, 1).await?;
        session.categories().list(0, 5).await?;
        pause(0.2).await;

        if info.every(100) {
            info!(iteration = info.iteration, "🔧 maintenance check");

            for result in session.products().batch_by_ids(&[1, 2, 3, 4, 5]).await {
                log_failure("maintenance_products", result);
            }
            for result in session.users().batch_by_ids(&[1, 2, 3]).await {
                log_failure("maintenance_users", result);
            }
            for result in session.categories().batch_by_ids(&[1, 2, 3]).await {
                log_failure("maintenance_categories", result);
            }
            pause(0.5).await;
        }
        Ok(())
    })
}

/// Two or three activities from a small browsing repertoire.
fn long_term_browsing_session<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let activity_count = rng.random_range(2..=3);
        for _ in 0..activity_count {
            match rng.random_range(0..3) {
                0 => {
                    session.products().list(rng.random_range(0..100), 15).await?;
                    pause(0.4).await;
                }
                1 => {
                    let term = SEARCH_TERMS[rng.random_range(0..SEARCH_TERMS.len())];
                    session.products().search(term).await?;
                    pause(0.3).await;
                }
                _ => {
                    let range = sample_range(rng, &session.data().price_ranges);
                    session.products().by_price_range(range.min, range.max).await?;
                    pause(0.4).await;
                }
            }
        }
        Ok(())
    })
}

/// A session held across iterations: re-login every twentieth pass or
/// whenever the token is gone, logout every fiftieth.
fn authenticated_user_session<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            if info.every(20) || !session.is_authenticated() {
                let login = session.data().login.clone();
                session.auth().login(&LoginCredentials::from(&login)).await?;
                pause(0.2).await;
            }

            if session.is_authenticated() {
                session.auth().profile().await?;
                pause(0.3).await;

                session.products().list(0, 12).await?;
                pause(0.4).await;

                if info.every(50) {
                    session.auth().logout();
                    pause(0.1).await;
                }
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(iteration = info.iteration, error = %err, "auth session error");
        }
        Ok(())
    })
}

/// One background job per iteration: a sync sweep, a cache warm or a
/// monitoring poll.
fn background_data_processing<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        match rng.random_range(0..3) {
            0 => {
                for id in 1..=5 {
                    session.products().by_id(id).await?;
                }
            }
            1 => {
                session.categories().list(0, 10).await?;
                session.products().list(0, 20).await?;
            }
            _ => {
                session.users().list(0, 5).await?;
                session.products().list(0, 5).await?;
                session.categories().list(0, 3).await?;
            }
        }

        pause(0.15).await;
        Ok(())
    })
}

/// Keeps hot records hot, with a wider warmup every thirty iterations.
fn cache_warmup_activity<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 10).await?;
        session.categories().list(0, 5).await?;
        session.products().by_id(1).await?;
        session.products().by_id(2).await?;
        pause(0.1).await;

        if info.every(30) {
            for id in 1..=10 {
                session.products().by_id(id).await?;
            }
            for id in session.data().category_sample_ids.iter().copied() {
                session.categories().by_id(u64::from(id)).await?;
            }
            pause(0.3).await;
        }
        Ok(())
    })
}

/// Wide pages and repeated detail churn to sniff out leaks late in the
/// run.
fn memory_stress_patterns<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 50).await?;
        pause(0.2).await;

        let sample_ids = session.data().product_sample_ids.clone();
        for i in 0..10usize {
            let id = if sample_ids.is_empty() {
                1
            } else {
                u64::from(sample_ids[i % sample_ids.len()])
            };
            session.products().by_id(id).await?;
        }
        pause(0.3).await;

        for range in session.data().price_ranges.iter().copied() {
            session.products().by_price_range(range.min, range.max).await?;
            pause(0.1).await;
        }
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
    fn test_definition_runs_for_44_minutes() {
        let definition = definition().unwrap();
        assert_eq!(definition.total_minutes(), 44.0);
        assert_eq!(definition.peak_minutes().unwrap(), 40.0);
        assert_eq!(definition.peak_vus(), 8);
        assert_eq!(definition.catalog.len(), 7);
    }

    #[test]
    fn test_time_gated_scenarios_ramp_in() {
        let definition = definition().unwrap();

        let weight_of = |name: &str, minutes: u64| {
            definition
                .catalog
                .entries()
                .iter()
                .find(|entry| entry.spec.key.name() == name)
                .map(|entry| entry.effective_weight(None, minutes))
                .unwrap()
        };

        assert_eq!(weight_of("cache_warmup_activity", 0), 0);
        assert_eq!(weight_of("cache_warmup_activity", 10), 0);
        assert_eq!(weight_of("cache_warmup_activity", 11), 10);

        assert_eq!(weight_of("memory_stress_patterns", 20), 0);
        assert_eq!(weight_of("memory_stress_patterns", 21), 10);

        // the static mix is unaffected by age
        assert_eq!(weight_of("regular_user_activity", 0), 70);
        assert_eq!(weight_of("regular_user_activity", 43), 70);
    }

    #[tokio::test(start_paused = true)]
    async fn test_regular_activity_draws_in_declared_order() {
        let mut session = offline_session();
        let mut rng = StdRng::seed_from_u64(6);

        // replay the draws the behavior will make, then mock exactly them
        let mut preview = rng.clone();
        let offset: u32 = preview.random_range(0..50);
        let limit: u32 = preview.random_range(10..=20);
        let product_id = sample_id(&mut preview, &session.data().product_sample_ids);

        session.client_mut().add_mock(
            HttpMethod::Get,
            &format!("/products?offset={offset}&limit={limit}"),
            json!([]),
        );
        session.client_mut().add_mock(
            HttpMethod::Get,
            &format!("/products/{product_id}"),
            json!({"id": product_id, "title": "Stable Product", "price": 5.0}),
        );

        // iteration 1 skips the every-third category shelf
        let info = IterationInfo::new(1, 1, 0);
        regular_user_activity(&mut session, &mut rng, info).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_session_persists_across_iterations() {
        let mut session = offline_session();
        session.client_mut().add_mock(
            HttpMethod::Post,
            "/auth/login",
            json!({"access_token": "tok", "refresh_token": "ref"}),
        );
        session.client_mut().add_mock(
            HttpMethod::Get,
            "/auth/profile",
            json!({"id": 1, "email": "john@mail.com"}),
        );
        session
            .client_mut()
            .add_mock(HttpMethod::Get, "/products?offset=0&limit=12", json!([]));

        let mut rng = StdRng::seed_from_u64(4);

        // first pass logs in
        let info = IterationInfo::new(1, 1, 0);
        authenticated_user_session(&mut session, &mut rng, info).await.unwrap();
        assert!(session.is_authenticated());

        // later pass reuses the token
        let info = IterationInfo::new(1, 2, 0);
        authenticated_user_session(&mut session, &mut rng, info).await.unwrap();
        assert!(session.is_authenticated());

        // the fiftieth pass ends with a logout
        let info = IterationInfo::new(1, 50, 1);
        authenticated_user_session(&mut session, &mut rng, info).await.unwrap();
        assert!(!session.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_maintenance_batches_only_on_the_hundredth() {
        let mut session = offline_session();
        session
            .client_mut()
            .add_mock(HttpMethod::Get, "/products?offset=0&limit=1", json!([]));
        session
            .client_mut()
            .add_mock(HttpMethod::Get, "/users?offset=0&limit=1", json!([]));
        session
            .client_mut()
            .add_mock(HttpMethod::Get, "/categories?offset=0&limit=5", json!([]));

        let mut rng = StdRng::seed_from_u64(5);

        // off-cycle iteration never reaches the unmocked batch endpoints
        let info = IterationInfo::new(1, 7, 0);
        periodic_maintenance_simulation(&mut session, &mut rng, info).await.unwrap();

        // on-cycle iteration hits them; the failures are tolerated
        let info = IterationInfo::new(1, 100, 2);
        periodic_maintenance_simulation(&mut session, &mut rng, info).await.unwrap();
    }
}
