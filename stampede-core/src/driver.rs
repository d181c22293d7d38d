//! Virtual-user iteration loop

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stampede_api::FakeStoreApi;
use stampede_config::ThinkTime;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::ScenarioCatalog;
use crate::metrics::MetricsRegistry;
use crate::phase::PhaseWindow;
use crate::scenario::{IterationInfo, ScenarioKey};

/// Shared epoch all virtual users measure elapsed run time against.
///
/// Backed by the tokio clock, so tests running under paused time can
/// step a run through its phases.
#[derive(Debug, Clone, Copy)]
pub struct RunClock {
    started: Instant,
}

impl RunClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole minutes since run start, truncated.
    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed().as_secs() / 60
    }
}

/// Lifecycle of a virtual user. The path is one-way; a drained user
/// cannot be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VuState {
    Idle,
    Running,
    Drained,
}

/// Totals one virtual user hands back when it drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VuReport {
    pub vu_id: u32,
    pub iterations: u64,
    pub failed_iterations: u64,
}

/// One simulated user: picks a scenario, runs its behavior, pauses, and
/// repeats until told to stop.
///
/// A failing iteration is logged and counted, never propagated; the
/// loop keeps going so one bad response cannot silence a user for the
/// rest of the run. Stop requests are honored between iterations and
/// interrupt the think-time pause, but never a behavior mid-flight.
pub struct VirtualUser<K: ScenarioKey> {
    id: u32,
    session: FakeStoreApi,
    catalog: Arc<ScenarioCatalog<K>>,
    metrics: Arc<MetricsRegistry>,
    clock: RunClock,
    pacing: ThinkTime,
    surge: Option<PhaseWindow>,
    iteration_interval: u64,
    rng: StdRng,
    state: VuState,
    iterations: u64,
    failed_iterations: u64,
}

impl<K: ScenarioKey> VirtualUser<K> {
    pub fn new(
        id: u32,
        session: FakeStoreApi,
        catalog: Arc<ScenarioCatalog<K>>,
        metrics: Arc<MetricsRegistry>,
        clock: RunClock,
    ) -> Self {
        Self {
            id,
            session,
            catalog,
            metrics,
            clock,
            pacing: ThinkTime::default(),
            surge: None,
            iteration_interval: 50,
            rng: StdRng::from_os_rng(),
            state: VuState::Idle,
            iterations: 0,
            failed_iterations: 0,
        }
    }

    pub fn with_pacing(mut self, pacing: ThinkTime) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_surge(mut self, surge: Option<PhaseWindow>) -> Self {
        self.surge = surge;
        self
    }

    /// Log progress every `interval` iterations. Zero is treated as one.
    pub fn with_iteration_interval(mut self, interval: u64) -> Self {
        self.iteration_interval = interval.max(1);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> VuState {
        self.state
    }

    pub fn report(&self) -> VuReport {
        VuReport {
            vu_id: self.id,
            iterations: self.iterations,
            failed_iterations: self.failed_iterations,
        }
    }

    /// Iterate until `stop` turns true. Runs at most once.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) -> VuReport {
        if self.state != VuState::Idle {
            warn!(vu = self.id, state = ?self.state, "virtual user cannot be restarted");
            return self.report();
        }
        self.state = VuState::Running;
        debug!(vu = self.id, "virtual user started");

        while !*stop.borrow() {
            let elapsed_minutes = self.clock.elapsed_minutes();
            let entry = self
                .catalog
                .select(elapsed_minutes, self.surge.as_ref(), &mut self.rng);
            let scenario = entry.spec.key.name();
            let info = IterationInfo::new(self.id, self.iterations, elapsed_minutes);

            let failed = match (entry.behavior)(&mut self.session, &mut self.rng, info).await {
                Ok(()) => false,
                Err(err) => {
                    warn!(
                        vu = self.id,
                        scenario,
                        iteration = self.iterations,
                        error = %err,
                        "iteration failed"
                    );
                    true
                }
            };

            self.metrics.record_iteration(scenario, failed);
            self.iterations += 1;
            if failed {
                self.failed_iterations += 1;
            }
            if self.iterations % self.iteration_interval == 0 {
                info!(
                    vu = self.id,
                    iterations = self.iterations,
                    failed = self.failed_iterations,
                    "virtual user progress"
                );
            }

            let range = self.pacing.range_at(elapsed_minutes);
            let pause = Duration::from_secs_f64(self.rng.random_range(range.min_secs..=range.max_secs));
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                _ = stop.changed() => {}
            }
        }

        self.state = VuState::Drained;
        debug!(
            vu = self.id,
            iterations = self.iterations,
            failed = self.failed_iterations,
            "virtual user drained"
        );
        self.report()
    }
}
