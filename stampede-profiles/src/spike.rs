//! Traffic-surge profile
//!
//! A short baseline, a sudden jump to 50 users, then recovery. While the
//! surge window is open the ordinary browsing scenarios stand down and a
//! set of burst scenarios takes over the whole mix, driven by the shared
//! phase-window weighting.

use std::sync::Arc;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use stampede_api::{ApiError, ApiResult, FakeStoreApi, LoginCredentials, NewUser};
use stampede_config::{Stage, ThinkTime, Threshold};
use stampede_core::{
    CoreResult, IterationInfo, PhaseWindow, ScenarioCatalog, ScenarioKey, ScenarioSpec,
};

use crate::definition::ProfileDefinition;
use crate::support::{pause, sample_id, unique_suffix};

/// Minute the surge window opens (inclusive).
const SURGE_START_MINUTE: u64 = 1;
/// Minute the surge window closes (exclusive).
const SURGE_END_MINUTE: u64 = 5;
/// Selection weight shared by the burst scenarios while the window is open.
const SURGE_BUDGET: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpikeScenario {
    CasualBrowsing,
    ProductSearch,
    CategoryExploration,
    FlashSaleTraffic,
    ViralContentAccess,
    BotLikeActivity,
    ConcurrentCheckout,
    SocialMediaRush,
    ApiHammering,
}

impl ScenarioKey for SpikeScenario {
    fn name(&self) -> &'static str {
        match self {
            Self::CasualBrowsing => "casual_browsing",
            Self::ProductSearch => "product_search",
            Self::CategoryExploration => "category_exploration",
            Self::FlashSaleTraffic => "flash_sale_traffic",
            Self::ViralContentAccess => "viral_content_access",
            Self::BotLikeActivity => "bot_like_activity",
            Self::ConcurrentCheckout => "concurrent_checkout",
            Self::SocialMediaRush => "social_media_rush",
            Self::ApiHammering => "api_hammering",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::CasualBrowsing,
            Self::ProductSearch,
            Self::CategoryExploration,
            Self::FlashSaleTraffic,
            Self::ViralContentAccess,
            Self::BotLikeActivity,
            Self::ConcurrentCheckout,
            Self::SocialMediaRush,
            Self::ApiHammering,
        ]
    }
}

/// Assemble the traffic-surge profile.
///
/// Baseline weights sum to 70, leaving a surge budget of 30 that the six
/// zero-weight burst scenarios split evenly while the window is open.
pub fn definition() -> CoreResult<ProfileDefinition<SpikeScenario>> {
    let catalog = ScenarioCatalog::builder()
        .scenario(
            ScenarioSpec::new(SpikeScenario::CasualBrowsing, 20)
                .with_description("Normal, slow user browsing"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::ProductSearch, 30)
                .with_description("Normal search and category checks"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::CategoryExploration, 20)
                .with_description("Normal category deep dive"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::FlashSaleTraffic, 0)
                .with_description("Users rushing popular products"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::ViralContentAccess, 0)
                .with_description("Sudden surge to specific viral content"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::BotLikeActivity, 0)
                .with_description("Rapid, automated-looking sequential requests"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::ConcurrentCheckout, 0)
                .with_description("Users attempting simultaneous checkouts (auth stress)"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::SocialMediaRush, 0)
                .with_description("Traffic from social media links (mixed endpoints)"),
        )
        .scenario(
            ScenarioSpec::new(SpikeScenario::ApiHammering, 0)
                .with_description("Aggressive sequential requests to test rate limiting"),
        )
        .behavior(SpikeScenario::CasualBrowsing, casual_browsing)
        .behavior(SpikeScenario::ProductSearch, product_search)
        .behavior(SpikeScenario::CategoryExploration, category_exploration)
        .behavior(SpikeScenario::FlashSaleTraffic, flash_sale_traffic)
        .behavior(SpikeScenario::ViralContentAccess, viral_content_access)
        .behavior(SpikeScenario::BotLikeActivity, bot_like_activity)
        .behavior(SpikeScenario::ConcurrentCheckout, concurrent_checkout)
        .behavior(SpikeScenario::SocialMediaRush, social_media_rush)
        .behavior(SpikeScenario::ApiHammering, api_hammering)
        .build()?;

    let surge_count = SpikeScenario::all().len() as u32 - 3;

    Ok(ProfileDefinition {
        name: "spike",
        description: "Sudden traffic surge followed by recovery",
        banner: "⚡ Starting Spike Test for Fake Store API",
        focus: "Testing sudden traffic surge and recovery",
        completion: "⚡ Spike Test completed",
        notes: &[
            "📈 Analyze results for spike handling and recovery",
            "🔍 Key metrics to check:",
            "   - Response time spikes during load surge",
            "   - Error rates during peak traffic",
            "   - System recovery time after spike",
            "   - Resource utilization patterns",
        ],
        catalog: Arc::new(catalog),
        stages: vec![
            Stage::new("10s", 2),
            Stage::new("1m", 50),
            Stage::new("3m", 50),
            Stage::new("10s", 2),
            Stage::new("3m", 2),
        ],
        thresholds: vec![
            Threshold::p95_under_ms(2000.0),
            Threshold::error_rate_below(0.3),
        ],
        pacing: ThinkTime::fixed(1.0, 3.0).with_surge(0.1, 0.4, SURGE_START_MINUTE, SURGE_END_MINUTE),
        surge: Some(PhaseWindow::new(
            SURGE_START_MINUTE,
            SURGE_END_MINUTE,
            SURGE_BUDGET,
            surge_count,
        )),
        iteration_interval: 25,
    })
}

/// A listing page and one product detail, at browsing pace.
fn casual_browsing<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().list(0, 10).await?;
        pause(0.5).await;

        let product_id = sample_id(rng, &session.data().product_sample_ids);
        session.products().by_id(product_id).await?;
        pause(0.8).await;
        Ok(())
    })
}

/// One title search plus the category index.
fn product_search<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().search("phone").await?;
        pause(0.4).await;

        session.categories().list(0, 10).await?;
        pause(0.3).await;
        Ok(())
    })
}

/// Open one category and its product shelf.
fn category_exploration<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let category_id = sample_id(rng, &session.data().category_sample_ids);

        session.categories().by_id(category_id).await?;
        pause(0.3).await;

        session.categories().products_in(category_id, 0, 15).await?;
        pause(0.6).await;
        Ok(())
    })
}

/// Everyone loading the same sale items at once.
fn flash_sale_traffic<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for id in 1..=5 {
            session.products().by_id(id).await?;
        }

        pause(0.1).await;

        session.products().list(0, 20).await?;
        pause(0.1).await;

        session.categories().list(0, 10).await?;
        Ok(())
    })
}

/// A single product going viral: repeated detail hits plus its shelf.
fn viral_content_access<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        session.products().by_id(1).await?;
        session.products().by_id(1).await?;
        session.categories().products_in(1, 0, 30).await?;
        session.products().search("trending").await?;

        pause(0.05).await;
        Ok(())
    })
}

/// Sequential scraping: every detail page, then every listing page.
fn bot_like_activity<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for id in 1..=8 {
            session.products().by_id(id).await?;
        }

        for i in 0..10u32 {
            session.products().list(i * 10, 10).await?;
        }
        Ok(())
    })
}

/// Login storms during the surge. Auth failures are logged, not
/// propagated.
fn concurrent_checkout<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            let login = session.data().login.clone();
            session.auth().login(&LoginCredentials::from(&login)).await?;

            if session.is_authenticated() {
                for _ in 0..3 {
                    session.auth().profile().await?;
                }

                let checkout_ids: Vec<u64> = session
                    .data()
                    .product_sample_ids
                    .iter()
                    .take(3)
                    .map(|id| u64::from(*id))
                    .collect();
                for id in checkout_ids {
                    session.products().by_id(id).await?;
                }

                session.auth().logout();
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(error = %err, "checkout simulation error");
        }

        pause(0.05).await;
        Ok(())
    })
}

/// Traffic from a shared link, ending in a registration wave.
fn social_media_rush<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for id in [1u64, 5, 10] {
            session.products().by_id(id).await?;
            session.categories().by_id(1).await?;
            session.products().list(0, 5).await?;
        }

        pause(0.08).await;

        let suffix = unique_suffix();
        let user = NewUser {
            name: format!("Social User {suffix}"),
            email: format!("social_{suffix}_{}@example.com", rng.random::<u32>()),
            password: "testpassword123".to_string(),
            avatar: "https://via.placeholder.com/150x150?text=Test+User".to_string(),
        };
        if let Err(err) = session.users().create(&user).await {
            debug!(error = %err, "social registration error");
        }
        Ok(())
    })
}

/// The same listing page twenty times in a row.
fn api_hammering<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let flow = async {
            for _ in 0..20 {
                session.products().list(0, 10).await?;
            }
            Ok::<(), ApiError>(())
        };
        if let Err(err) = flow.await {
            debug!(error = %err, "api hammering result");
        }
        Ok(())
    })
}
