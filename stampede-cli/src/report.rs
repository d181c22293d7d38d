//! Run banners and end-of-run reporting

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use stampede_core::{RunContext, RunSummary, ScenarioKey};
use stampede_profiles::{ProfileCard, ProfileDefinition};

/// Banner block printed when a run starts.
pub fn print_launch<K: ScenarioKey>(definition: &ProfileDefinition<K>, context: &RunContext) {
    println!("{}", definition.banner);
    println!("📊 Test Configuration:");
    println!("   - Virtual Users: {}", definition.vu_progression());
    println!("   - Duration: {}", duration_progression(definition));
    println!("   - {}", definition.focus);
    println!("   - Run ID: {}", context.run_id);
}

/// Banner block printed when a run finishes or is interrupted.
pub fn print_completion<K: ScenarioKey>(
    definition: &ProfileDefinition<K>,
    context: &RunContext,
    elapsed: Duration,
    iterations: u64,
    interrupted: bool,
) {
    println!();
    if interrupted {
        println!("⚠️ Run interrupted before the ramp plan completed");
    }
    println!("{}", definition.completion);
    println!(
        "   - Started: {}",
        context.started_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    println!(
        "   - Ended: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    println!("   - Total Duration: {} minutes", elapsed.as_secs() / 60);
    println!("   - Total Iterations: {iterations}");
    for note in definition.notes {
        println!("{note}");
    }
}

/// Metrics block printed after the completion banner.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("📋 Run Summary");
    println!(
        "   - Requests: {} ({:.1}/s)",
        summary.requests, summary.requests_per_sec
    );
    println!(
        "   - Failed: {} ({:.2}% error rate)",
        summary.failures,
        summary.error_rate * 100.0
    );
    println!("   - Data Received: {}", format_bytes(summary.bytes_received));
    println!(
        "   - Latency: avg {:.1}ms · p50 {}ms · p95 {}ms · p99 {}ms · max {}ms",
        summary.latency.avg_ms,
        summary.latency.p50_ms,
        summary.latency.p95_ms,
        summary.latency.p99_ms,
        summary.latency.max_ms
    );

    if !summary.status_counts.is_empty() {
        let statuses: Vec<String> = summary
            .status_counts
            .iter()
            .map(|(status, count)| format!("{status}×{count}"))
            .collect();
        println!("   - Status Codes: {}", statuses.join(", "));
    }

    if !summary.scenarios.is_empty() {
        println!("   - Scenarios:");
        for (name, scenario) in &summary.scenarios {
            println!(
                "       - {}: {} iterations ({} failed)",
                name, scenario.iterations, scenario.failures
            );
        }
    }

    if !summary.operations.is_empty() {
        println!("   - Operations:");
        for (name, operation) in &summary.operations {
            println!(
                "       - {}: {} requests, {} failed, avg {:.1}ms",
                name, operation.requests, operation.failures, operation.avg_latency_ms
            );
        }
    }

    if !summary.thresholds.is_empty() {
        println!();
        println!("📋 Thresholds:");
        for verdict in &summary.thresholds {
            let mark = if verdict.passed { "✓" } else { "✗" };
            println!("   {} {} (observed {:.1})", mark, verdict.rule, verdict.observed);
        }
    }
}

/// Table printed by the `list` command.
pub fn print_profiles(cards: &[ProfileCard]) {
    println!("Available profiles:");
    println!();
    for card in cards {
        println!(
            "  {:<10} {:>2} scenarios  {:>4.0} min  peak {:>3} VUs  {}",
            card.name, card.scenarios, card.total_minutes, card.peak_vus, card.description
        );
        println!("  {:<10} ramp: {}", "", card.vu_progression);
    }
    println!();
    println!("Run one with: stampede run <PROFILE>");
}

/// Stage durations joined the same way the user counts are.
fn duration_progression<K: ScenarioKey>(definition: &ProfileDefinition<K>) -> String {
    definition
        .stages
        .iter()
        .map(|stage| stage.duration.as_str())
        .collect::<Vec<_>>()
        .join(" → ")
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
