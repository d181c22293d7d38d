//! Stage scheduler and virtual-user pool
//!
//! Compiles a profile's stage table into a piecewise-linear ramp, then
//! reconciles a pool of spawned virtual users against that ramp once per
//! second until the plan runs out or the operator interrupts the run.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stampede_api::{ApiResult, FakeStoreApi};
use stampede_config::{Stage, SuiteConfig, ThinkTime};
use stampede_core::{
    MetricsRegistry, PhaseWindow, RunClock, RunContext, RunId, RunSummary, ScenarioCatalog,
    ScenarioKey, VirtualUser, VuReport,
};
use stampede_http::SharedMetrics;
use stampede_profiles::{endurance, load, spike, stress, volume, ProfileDefinition, ProfileKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::report;

/// Builds live sessions for freshly spawned virtual users.
type SessionFactory = Box<dyn Fn() -> ApiResult<FakeStoreApi> + Send + Sync>;

/// Resolve the profile for `kind` and drive it to completion against the
/// configured store. Returns the finished summary; threshold verdicts are
/// inside it, the caller decides the exit code.
pub async fn run(kind: ProfileKind, config: &SuiteConfig, out: Option<&Path>) -> Result<RunSummary> {
    match kind {
        ProfileKind::Load => execute(load::definition()?, config, out).await,
        ProfileKind::Stress => execute(stress::definition()?, config, out).await,
        ProfileKind::Spike => execute(spike::definition()?, config, out).await,
        ProfileKind::Volume => execute(volume::definition()?, config, out).await,
        ProfileKind::Endurance => execute(endurance::definition()?, config, out).await,
    }
}

async fn execute<K: ScenarioKey>(
    mut definition: ProfileDefinition<K>,
    config: &SuiteConfig,
    out: Option<&Path>,
) -> Result<RunSummary> {
    // a configured cadence overrides the profile's own
    if let Some(interval) = config.logging.iteration_interval {
        definition.iteration_interval = interval;
    }

    let metrics = Arc::new(MetricsRegistry::new());
    let sink: SharedMetrics = metrics.clone();
    let target = config.target.clone();
    let data = config.data.clone();
    let sessions: SessionFactory =
        Box::new(move || FakeStoreApi::connect(&target, data.clone(), sink.clone()));
    drive(definition, metrics, sessions, out).await
}

/// The scheduler loop shared by every profile. Ticks once per second,
/// reconciles the pool against the ramp, and drains everything when the
/// plan ends or Ctrl-C arrives.
async fn drive<K: ScenarioKey>(
    definition: ProfileDefinition<K>,
    metrics: Arc<MetricsRegistry>,
    sessions: SessionFactory,
    out: Option<&Path>,
) -> Result<RunSummary> {
    let context = RunContext::new(definition.name);
    let plan = RampPlan::compile(&definition.stages);
    report::print_launch(&definition, &context);

    let clock = RunClock::start();
    let mut pool = VuPool::new(&definition, metrics.clone(), clock, sessions);

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut interrupted = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let elapsed = clock.elapsed().as_secs_f64();
                if plan.finished(elapsed) {
                    break;
                }
                pool.reconcile(plan.target_at(elapsed))?;
            }
            _ = &mut interrupt => {
                warn!("interrupt received, draining virtual users early");
                interrupted = true;
                break;
            }
        }
    }

    let reports = pool.drain().await;
    let elapsed = clock.elapsed();
    let iterations: u64 = reports.iter().map(|report| report.iterations).sum();
    let failed: u64 = reports.iter().map(|report| report.failed_iterations).sum();
    debug!(iterations, failed, users = reports.len(), "virtual users drained");

    let summary = metrics.summarize(definition.name, elapsed, &definition.thresholds);
    report::print_completion(&definition, &context, elapsed, iterations, interrupted);
    report::print_summary(&summary);

    if let Some(path) = out {
        export_summary(path, &context, &summary)?;
    }

    Ok(summary)
}

/// Piecewise-linear virtual-user ramp compiled from a stage table.
///
/// Each stage ramps from the previous stage's target to its own over its
/// duration, starting from zero, matching how the stage tables are read
/// everywhere else. Stages with unparsable durations are skipped; the
/// duration parser already warns about them.
struct RampPlan {
    segments: Vec<Segment>,
    total_secs: f64,
}

struct Segment {
    start_secs: f64,
    end_secs: f64,
    from: u32,
    to: u32,
}

impl RampPlan {
    fn compile(stages: &[Stage]) -> Self {
        let mut segments = Vec::with_capacity(stages.len());
        let mut cursor = 0.0;
        let mut previous = 0u32;
        for stage in stages {
            let Some(minutes) = stage.minutes() else {
                continue;
            };
            let secs = minutes * 60.0;
            segments.push(Segment {
                start_secs: cursor,
                end_secs: cursor + secs,
                from: previous,
                to: stage.target,
            });
            cursor += secs;
            previous = stage.target;
        }
        Self {
            segments,
            total_secs: cursor,
        }
    }

    /// Interpolated user target at `elapsed` seconds into the run.
    fn target_at(&self, elapsed_secs: f64) -> u32 {
        for segment in &self.segments {
            if elapsed_secs < segment.end_secs {
                let span = segment.end_secs - segment.start_secs;
                if span <= f64::EPSILON {
                    return segment.to;
                }
                let progress = (elapsed_secs - segment.start_secs) / span;
                let from = f64::from(segment.from);
                let to = f64::from(segment.to);
                return (from + (to - from) * progress).round() as u32;
            }
        }
        self.segments.last().map(|segment| segment.to).unwrap_or(0)
    }

    fn finished(&self, elapsed_secs: f64) -> bool {
        elapsed_secs >= self.total_secs
    }
}

struct VuHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<VuReport>,
}

/// Pool of running virtual users, reconciled against the ramp each tick.
///
/// Ramping down retires the youngest users first. A retired user finishes
/// its current iteration before draining, so its report is collected at
/// the end of the run rather than at retirement.
struct VuPool<K: ScenarioKey> {
    catalog: Arc<ScenarioCatalog<K>>,
    pacing: ThinkTime,
    surge: Option<PhaseWindow>,
    iteration_interval: u64,
    metrics: Arc<MetricsRegistry>,
    clock: RunClock,
    sessions: SessionFactory,
    next_id: u32,
    active: Vec<VuHandle>,
    retired: Vec<VuHandle>,
}

impl<K: ScenarioKey> VuPool<K> {
    fn new(
        definition: &ProfileDefinition<K>,
        metrics: Arc<MetricsRegistry>,
        clock: RunClock,
        sessions: SessionFactory,
    ) -> Self {
        Self {
            catalog: definition.catalog.clone(),
            pacing: definition.pacing.clone(),
            surge: definition.surge,
            iteration_interval: definition.iteration_interval,
            metrics,
            clock,
            sessions,
            next_id: 0,
            active: Vec::new(),
            retired: Vec::new(),
        }
    }

    fn reconcile(&mut self, desired: u32) -> Result<()> {
        let current = self.active.len() as u32;
        if current < desired {
            for _ in current..desired {
                let handle = self.spawn()?;
                self.active.push(handle);
            }
            info!(users = desired, "ramping virtual users up");
        } else if current > desired {
            for _ in desired..current {
                if let Some(handle) = self.active.pop() {
                    let _ = handle.stop.send(true);
                    self.retired.push(handle);
                }
            }
            info!(users = desired, "ramping virtual users down");
        }
        Ok(())
    }

    fn spawn(&mut self) -> Result<VuHandle> {
        self.next_id += 1;
        let id = self.next_id;
        let session = (self.sessions)()
            .with_context(|| format!("failed to open a session for virtual user {id}"))?;
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut user = VirtualUser::new(
            id,
            session,
            self.catalog.clone(),
            self.metrics.clone(),
            self.clock,
        )
        .with_pacing(self.pacing.clone())
        .with_surge(self.surge)
        .with_iteration_interval(self.iteration_interval);
        let task = tokio::spawn(async move { user.run(stop_rx).await });
        debug!(vu_id = id, "virtual user spawned");
        Ok(VuHandle {
            stop: stop_tx,
            task,
        })
    }

    /// Stop every remaining user and collect all reports, retired ones
    /// included. A panicked user loses its report but not the run.
    async fn drain(self) -> Vec<VuReport> {
        for handle in &self.active {
            let _ = handle.stop.send(true);
        }
        let mut reports = Vec::with_capacity(self.active.len() + self.retired.len());
        for handle in self.active.into_iter().chain(self.retired) {
            match handle.task.await {
                Ok(report) => reports.push(report),
                Err(err) => warn!(error = %err, "virtual user task panicked"),
            }
        }
        reports
    }
}

#[derive(Serialize)]
struct SummaryExport<'a> {
    run_id: RunId,
    started_at: DateTime<Utc>,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

fn export_summary(path: &Path, context: &RunContext, summary: &RunSummary) -> Result<()> {
    let export = SummaryExport {
        run_id: context.run_id,
        started_at: context.started_at,
        summary,
    };
    let json = serde_json::to_string_pretty(&export).context("failed to serialize run summary")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write summary to {}", path.display()))?;
    info!(path = %path.display(), "run summary exported");
    Ok(())
}
