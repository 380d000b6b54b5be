//! Console and JSON reporting

use std::path::Path;

use libmailburst_core::{Result, RunSummary, TestConfig};
use tracing::info;

/// Print the human-readable end-of-run report to stdout.
pub fn print_summary(config: &TestConfig, summary: &RunSummary) {
    let stats = summary.latency_stats();
    let rate = summary.rate_per_sec();

    println!("\n=== MAILBURST RESULTS ===\n");
    println!(
        "Messages:     {} ({} batches of {}, concurrency {})",
        summary.attempted(),
        config.batch_count(),
        config.batch_size,
        config.concurrency
    );
    println!(
        "Sent:         {} ({:.1}%)",
        summary.total_sent(),
        summary.success_rate()
    );
    println!("Failed:       {}", summary.total_failed());
    println!("Elapsed:      {:.2}s", summary.total_elapsed.as_secs_f64());
    println!(
        "Rate:         {:.2} emails/sec ({:.0} emails/hour)",
        rate,
        rate * 3600.0
    );
    println!();
    println!("Latency (min):  {:.2}ms", stats.min_ms);
    println!("Latency (avg):  {:.2}ms", stats.mean_ms);
    println!("Latency (P50):  {:.2}ms", stats.p50_ms);
    println!("Latency (P95):  {:.2}ms", stats.p95_ms);
    println!("Latency (P99):  {:.2}ms", stats.p99_ms);
    println!("Latency (max):  {:.2}ms", stats.max_ms);

    let failures: Vec<_> = summary.failures().collect();
    if !failures.is_empty() {
        println!("\nFailures:");
        for (line, (index, result)) in failures.iter().enumerate() {
            println!(
                "  {}. message #{} - {}",
                line + 1,
                index + 1,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Serialize the summary to a JSON file.
pub fn write_json_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let report = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, report)?;
    info!(path = %path.display(), "JSON report written");
    Ok(())
}
