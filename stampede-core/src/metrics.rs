//! Run-wide metrics collection and the end-of-run summary

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use stampede_config::Threshold;
use stampede_http::{MetricsSink, RequestOutcome};

/// Shared collector every request outcome and iteration verdict flows
/// into. One registry serves a whole run; virtual users and their store
/// clients hold it behind an `Arc`.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    requests: AtomicU64,
    failures: AtomicU64,
    bytes_received: AtomicU64,
    latencies_ms: Mutex<Vec<u64>>,
    status_counts: Mutex<BTreeMap<u16, u64>>,
    operations: Mutex<BTreeMap<&'static str, OperationAccumulator>>,
    scenarios: Mutex<BTreeMap<&'static str, ScenarioAccumulator>>,
}

#[derive(Debug, Default, Clone)]
struct OperationAccumulator {
    requests: u64,
    failures: u64,
    total_latency_ms: u64,
    completed: u64,
    max_latency_ms: u64,
}

#[derive(Debug, Default, Clone)]
struct ScenarioAccumulator {
    iterations: u64,
    failures: u64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished scenario iteration.
    pub fn record_iteration(&self, scenario: &'static str, failed: bool) {
        let mut scenarios = lock(&self.scenarios);
        let entry = scenarios.entry(scenario).or_default();
        entry.iterations += 1;
        if failed {
            entry.failures += 1;
        }
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    /// Freeze the collected numbers into a summary, evaluating the given
    /// pass/fail rules against them.
    pub fn summarize(
        &self,
        profile: &str,
        elapsed: Duration,
        thresholds: &[Threshold],
    ) -> RunSummary {
        let requests = self.requests();
        let failures = self.failures();
        let bytes_received = self.bytes_received();

        let mut latencies = lock(&self.latencies_ms).clone();
        latencies.sort_unstable();
        let latency = LatencySummary::from_sorted(&latencies);

        let error_rate = if requests == 0 {
            0.0
        } else {
            failures as f64 / requests as f64
        };
        let elapsed_secs = elapsed.as_secs_f64();
        let requests_per_sec = if elapsed_secs > 0.0 {
            requests as f64 / elapsed_secs
        } else {
            0.0
        };

        let verdicts = thresholds
            .iter()
            .map(|threshold| {
                evaluate_threshold(threshold, &latencies, requests, error_rate, bytes_received)
            })
            .collect();

        let operations = lock(&self.operations)
            .iter()
            .map(|(name, acc)| {
                let avg_latency_ms = if acc.completed == 0 {
                    0.0
                } else {
                    acc.total_latency_ms as f64 / acc.completed as f64
                };
                (
                    name.to_string(),
                    OperationSummary {
                        requests: acc.requests,
                        failures: acc.failures,
                        avg_latency_ms,
                        max_latency_ms: acc.max_latency_ms,
                    },
                )
            })
            .collect();

        let scenarios = lock(&self.scenarios)
            .iter()
            .map(|(name, acc)| {
                (
                    name.to_string(),
                    ScenarioSummary {
                        iterations: acc.iterations,
                        failures: acc.failures,
                    },
                )
            })
            .collect();

        RunSummary {
            profile: profile.to_string(),
            duration_secs: elapsed_secs,
            requests,
            failures,
            error_rate,
            requests_per_sec,
            bytes_received,
            latency,
            status_counts: lock(&self.status_counts).clone(),
            operations,
            scenarios,
            thresholds: verdicts,
        }
    }
}

#[async_trait]
impl MetricsSink for MetricsRegistry {
    async fn record(&self, outcome: RequestOutcome) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(outcome.bytes, Ordering::Relaxed);
        if outcome.failure.is_some() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }

        // status 0 marks a request that never completed; its elapsed time
        // says nothing about the service, so it stays out of the
        // latency distribution
        let completed = outcome.status != 0;
        if completed {
            lock(&self.latencies_ms).push(outcome.latency_ms);
        }

        *lock(&self.status_counts).entry(outcome.status).or_default() += 1;

        let mut operations = lock(&self.operations);
        let entry = operations.entry(outcome.operation).or_default();
        entry.requests += 1;
        if outcome.failure.is_some() {
            entry.failures += 1;
        }
        if completed {
            entry.completed += 1;
            entry.total_latency_ms += outcome.latency_ms;
            entry.max_latency_ms = entry.max_latency_ms.max(outcome.latency_ms);
        }
    }
}

/// Latency distribution of the completed requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub min_ms: u64,
    pub max_ms: u64,
    pub avg_ms: f64,
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
}

impl LatencySummary {
    fn from_sorted(sorted: &[u64]) -> Self {
        if sorted.is_empty() {
            return Self::default();
        }
        let total: u64 = sorted.iter().sum();
        Self {
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
            avg_ms: total as f64 / sorted.len() as f64,
            p50_ms: percentile(sorted, 50),
            p95_ms: percentile(sorted, 95),
            p99_ms: percentile(sorted, 99),
        }
    }
}

fn percentile(sorted: &[u64], pct: usize) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let index = (sorted.len() * pct / 100).min(sorted.len() - 1);
    sorted[index]
}

fn evaluate_threshold(
    threshold: &Threshold,
    sorted_latencies: &[u64],
    requests: u64,
    error_rate: f64,
    bytes_received: u64,
) -> ThresholdVerdict {
    let (observed, passed) = match threshold {
        Threshold::LatencyPercentileUnder { percentile: pct, limit_ms } => {
            let observed = percentile(sorted_latencies, *pct as usize) as f64;
            (observed, observed < *limit_ms)
        }
        Threshold::ErrorRateBelow { limit } => (error_rate, error_rate < *limit),
        Threshold::MinTotalRequests { count } => (requests as f64, requests > *count),
        Threshold::MinDataReceived { bytes } => (bytes_received as f64, bytes_received > *bytes),
    };

    ThresholdVerdict {
        rule: threshold.to_string(),
        observed,
        passed,
    }
}

/// Outcome of one threshold rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdVerdict {
    pub rule: String,
    pub observed: f64,
    pub passed: bool,
}

/// Per-operation rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSummary {
    pub requests: u64,
    pub failures: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

/// Per-scenario rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub iterations: u64,
    pub failures: u64,
}

/// Everything a finished run reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub profile: String,
    pub duration_secs: f64,
    pub requests: u64,
    pub failures: u64,
    pub error_rate: f64,
    pub requests_per_sec: f64,
    pub bytes_received: u64,
    pub latency: LatencySummary,
    pub status_counts: BTreeMap<u16, u64>,
    pub operations: BTreeMap<String, OperationSummary>,
    pub scenarios: BTreeMap<String, ScenarioSummary>,
    pub thresholds: Vec<ThresholdVerdict>,
}

impl RunSummary {
    /// True when every threshold held; a run without thresholds passes.
    pub fn passed(&self) -> bool {
        self.thresholds.iter().all(|verdict| verdict.passed)
    }
}
