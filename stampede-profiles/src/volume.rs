//! Data-volume profile
//!
//! Few users, huge payloads: maximum page sizes, deep pagination, batch
//! reads and bulk writes. Every request is individually tolerated so a
//! single refusal never cuts a sweep short, and the data-received
//! threshold does the judging.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use stampede_api::{ApiResult, FakeStoreApi, NewProduct, NewUser};
use stampede_config::{Stage, ThinkTime, Threshold};
use stampede_core::{CoreResult, IterationInfo, ScenarioCatalog, ScenarioKey, ScenarioSpec};

use crate::definition::ProfileDefinition;
use crate::support::{log_failure, pause, unique_suffix, SEARCH_TERMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeScenario {
    BulkDataRetrieval,
    LargePaginationCycles,
    ComprehensiveDataSweep,
    BulkCreationOperations,
    DataMiningSimulation,
    ArchivalDataAccess,
    MassDataExportSimulation,
    ContinuousDataStreaming,
}

impl ScenarioKey for VolumeScenario {
    fn name(&self) -> &'static str {
        match self {
            Self::BulkDataRetrieval => "bulk_data_retrieval",
            Self::LargePaginationCycles => "large_pagination_cycles",
            Self::ComprehensiveDataSweep => "comprehensive_data_sweep",
            Self::BulkCreationOperations => "bulk_creation_operations",
            Self::DataMiningSimulation => "data_mining_simulation",
            Self::ArchivalDataAccess => "archival_data_access",
            Self::MassDataExportSimulation => "mass_data_export_simulation",
            Self::ContinuousDataStreaming => "continuous_data_streaming",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::BulkDataRetrieval,
            Self::LargePaginationCycles,
            Self::ComprehensiveDataSweep,
            Self::BulkCreationOperations,
            Self::DataMiningSimulation,
            Self::ArchivalDataAccess,
            Self::MassDataExportSimulation,
            Self::ContinuousDataStreaming,
        ]
    }
}

/// Assemble the data-volume profile.
pub fn definition() -> CoreResult<ProfileDefinition<VolumeScenario>> {
    let catalog = ScenarioCatalog::builder()
        .scenario(
            ScenarioSpec::new(VolumeScenario::BulkDataRetrieval, 15)
                .with_description("High volume data retrieval (large pages/batches)"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::LargePaginationCycles, 15)
                .with_description("Deep, continuous paging and offsetting requests"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::ComprehensiveDataSweep, 15)
                .with_description("Retrieving data by multiple criteria (batches, categories, ranges)"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::BulkCreationOperations, 10)
                .with_description("Heavy write operations (bulk product/user creation and cleanup)"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::DataMiningSimulation, 10)
                .with_description("Complex search/filter queries across price and categories"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::ArchivalDataAccess, 10)
                .with_description("Accessing older/less-cached data (high ID access and deep pagination)"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::MassDataExportSimulation, 15)
                .with_description("Sequentially accessing all data in chunks to simulate an export"),
        )
        .scenario(
            ScenarioSpec::new(VolumeScenario::ContinuousDataStreaming, 10)
                .with_description("High-frequency, low-latency small requests mimicking a continuous feed"),
        )
        .behavior(VolumeScenario::BulkDataRetrieval, bulk_data_retrieval)
        .behavior(VolumeScenario::LargePaginationCycles, large_pagination_cycles)
        .behavior(VolumeScenario::ComprehensiveDataSweep, comprehensive_data_sweep)
        .behavior(VolumeScenario::BulkCreationOperations, bulk_creation_operations)
        .behavior(VolumeScenario::DataMiningSimulation, data_mining_simulation)
        .behavior(VolumeScenario::ArchivalDataAccess, archival_data_access)
        .behavior(VolumeScenario::MassDataExportSimulation, mass_data_export_simulation)
        .behavior(VolumeScenario::ContinuousDataStreaming, continuous_data_streaming)
        .build()?;

    Ok(ProfileDefinition {
        name: "volume",
        description: "Bulk data processing with maximum payload sizes",
        banner: "📊 Starting Volume Test for Fake Store API",
        focus: "Focus: Large data processing and bulk operations",
        completion: "📊 Volume Test completed",
        notes: &[
            "📈 Analyze results for data processing capabilities",
            "🔍 Key metrics to evaluate:",
            "   - Total data throughput",
            "   - Large payload response times",
            "   - Bulk operation performance",
            "   - Memory usage patterns",
            "   - Database query efficiency",
            "   - API rate limiting behavior with large requests",
        ],
        catalog: Arc::new(catalog),
        stages: vec![
            Stage::new("2m", 5),
            Stage::new("10m", 5),
            Stage::new("2m", 0),
        ],
        thresholds: vec![
            Threshold::p95_under_ms(800.0),
            Threshold::error_rate_below(0.1),
            Threshold::min_data_received(1_000_000),
        ],
        pacing: ThinkTime::fixed(0.1, 0.4),
        surge: None,
        iteration_interval: 50,
    })
}

/// Maximum-size listing pages followed by twenty detail reads.
fn bulk_data_retrieval<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        log_failure("bulk_products", session.products().list(0, 100).await);
        log_failure("bulk_products", session.products().list(100, 100).await);
        log_failure("bulk_products", session.products().list(200, 100).await);
        log_failure("bulk_users", session.users().list(0, 50).await);
        log_failure("bulk_categories", session.categories().list(0, 20).await);
        pause(0.2).await;

        for id in 1..=20 {
            log_failure("bulk_product_detail", session.products().by_id(id).await);
        }
        Ok(())
    })
}

/// Ten full pages of products and users, back to back.
fn large_pagination_cycles<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let page_size = 50u32;
        for page in 0..10u32 {
            let offset = page * page_size;
            log_failure("page_products", session.products().list(offset, page_size).await);
            log_failure("page_users", session.users().list(offset, 30).await);
            pause(0.1).await;
        }
        Ok(())
    })
}

/// Every category shelf, every price window and both batch endpoints.
fn comprehensive_data_sweep<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for id in session.data().category_sample_ids.iter().copied() {
            log_failure(
                "sweep_category",
                session.categories().products_in(u64::from(id), 0, 30).await,
            );
        }

        for range in session.data().price_ranges.iter().copied() {
            log_failure(
                "sweep_price_range",
                session.products().by_price_range(range.min, range.max).await,
            );
        }

        let user_ids: Vec<u64> = session
            .data()
            .user_sample_ids
            .iter()
            .map(|id| u64::from(*id))
            .collect();
        for result in session.users().batch_by_ids(&user_ids).await {
            log_failure("sweep_user_batch", result);
        }

        let product_ids: Vec<u64> = session
            .data()
            .product_sample_ids
            .iter()
            .map(|id| u64::from(*id))
            .collect();
        for result in session.products().batch_by_ids(&product_ids).await {
            log_failure("sweep_product_batch", result);
        }

        pause(0.15).await;
        Ok(())
    })
}

/// Ten padded product creations, five user creations, then cleanup of
/// whatever was actually created.
fn bulk_creation_operations<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let padding = ["Data padding for larger payloads."; 20].join(" ");
        let category_ids = session.data().category_sample_ids.clone();
        let mut created = Vec::new();

        for i in 0..10usize {
            let category_id = if category_ids.is_empty() {
                1
            } else {
                u64::from(category_ids[i % category_ids.len()])
            };
            let product = NewProduct {
                title: format!("Volume Test Product {}_{i}", unique_suffix()),
                price: f64::from(rng.random_range(10..=509)),
                description: format!("Generated during volume testing - batch {i}. {padding}"),
                category_id,
                images: vec!["https://via.placeholder.com/640x480?text=Test+Product".to_string()],
            };

            match session.products().create(&product).await {
                Ok(response) => created.push(response.id),
                Err(err) => debug!(item = i, error = %err, "product creation error"),
            }
        }

        pause(0.2).await;

        for i in 0..5usize {
            let suffix = unique_suffix();
            let user = NewUser {
                name: format!("Volume Test User {suffix}_{i}"),
                email: format!("volume_test_{suffix}_{i}@example.com"),
                password: "testpassword123".to_string(),
                avatar: "https://via.placeholder.com/150x150?text=Test+User".to_string(),
            };
            log_failure("bulk_user_creation", session.users().create(&user).await);
        }

        pause(0.2).await;

        for id in created {
            log_failure("bulk_product_cleanup", session.products().delete(id).await);
        }
        Ok(())
    })
}

/// Stepped price windows, full category shelves and every search term.
fn data_mining_simulation<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for min_price in (0..500).step_by(100) {
            log_failure(
                "mine_price_range",
                session.products().by_price_range(min_price, min_price + 100).await,
            );
        }

        for id in session.data().category_sample_ids.iter().copied() {
            log_failure(
                "mine_category",
                session.categories().products_in(u64::from(id), 0, 50).await,
            );
        }

        for term in SEARCH_TERMS {
            log_failure("mine_search", session.products().search(term).await);
        }

        pause(0.3).await;
        Ok(())
    })
}

/// Old records and deep pagination offsets.
fn archival_data_access<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for id in (50..=100).step_by(10) {
            log_failure("archive_product", session.products().by_id(id).await);
        }

        log_failure("archive_deep_products", session.products().list(500, 50).await);
        log_failure("archive_deeper_products", session.products().list(1000, 50).await);
        log_failure("archive_deep_users", session.users().list(100, 30).await);

        pause(0.25).await;
        Ok(())
    })
}

/// A thousand products in hundred-row pages, as an export job would.
fn mass_data_export_simulation<'a>(
    session: &'a mut FakeStoreApi,
    _rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        for offset in (0..1000).step_by(100) {
            log_failure("export_products", session.products().list(offset, 100).await);
        }

        log_failure("export_users", session.users().list(0, 100).await);

        for id in session.data().category_sample_ids.iter().copied() {
            log_failure(
                "export_category",
                session.categories().products_in(u64::from(id), 0, 100).await,
            );
        }

        pause(0.4).await;
        Ok(())
    })
}

/// Five seconds of rolling reads, the way a polling consumer behaves.
fn continuous_data_streaming<'a>(
    session: &'a mut FakeStoreApi,
    rng: &'a mut StdRng,
    _info: IterationInfo,
) -> BoxFuture<'a, ApiResult<()>> {
    Box::pin(async move {
        let streaming_window = Duration::from_secs(5);
        let started = tokio::time::Instant::now();

        while started.elapsed() < streaming_window {
            log_failure(
                "stream_products",
                session.products().list(rng.random_range(0..=200), 20).await,
            );
            log_failure(
                "stream_users",
                session.users().list(rng.random_range(0..=50), 10).await,
            );
            log_failure("stream_categories", session.categories().list(0, 5).await);

            pause(0.1).await;
        }
        Ok(())
    })
}
