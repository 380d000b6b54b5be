//! Run results and latency statistics

use std::time::Duration;

use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};

/// Outcome of one message-send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(with = "serde_duration")]
    pub elapsed: Duration,
    /// Present exactly when the send failed.
    pub error: Option<String>,
}

impl SendResult {
    pub fn ok(elapsed: Duration) -> Self {
        Self {
            success: true,
            elapsed,
            error: None,
        }
    }

    pub fn failed(elapsed: Duration, error: String) -> Self {
        Self {
            success: false,
            elapsed,
            error: Some(error),
        }
    }
}

/// Aggregated results for a whole run. Results are kept in submission
/// order regardless of the order sends completed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub results: Vec<SendResult>,
    #[serde(with = "serde_duration")]
    pub total_elapsed: Duration,
}

impl RunSummary {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            total_elapsed: Duration::ZERO,
        }
    }

    /// Append a completed batch's results.
    pub fn extend(&mut self, results: Vec<SendResult>) {
        self.results.extend(results);
    }

    /// Record the wall-clock duration of the whole run.
    pub fn finish(&mut self, total_elapsed: Duration) {
        self.total_elapsed = total_elapsed;
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn total_sent(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn total_failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            0.0
        } else {
            (self.total_sent() as f64 / self.results.len() as f64) * 100.0
        }
    }

    /// Successful sends per second over the whole run.
    pub fn rate_per_sec(&self) -> f64 {
        let secs = self.total_elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_sent() as f64 / secs
        } else {
            0.0
        }
    }

    /// Failed results with their submission-order index.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &SendResult)> {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.success)
    }

    pub fn latency_stats(&self) -> LatencyStats {
        LatencyStats::from_results(&self.results)
    }
}

/// Latency distribution in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyStats {
    pub min_ms: f64,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

impl LatencyStats {
    pub fn from_results(results: &[SendResult]) -> Self {
        // 1 microsecond to 60 seconds, 3 significant figures
        let mut hist = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3).unwrap();
        for result in results {
            let _ = hist.record(result.elapsed.as_micros() as u64);
        }
        if hist.is_empty() {
            return Self::default();
        }

        Self {
            min_ms: hist.min() as f64 / 1000.0,
            mean_ms: hist.mean() / 1000.0,
            p50_ms: hist.value_at_percentile(50.0) as f64 / 1000.0,
            p95_ms: hist.value_at_percentile(95.0) as f64 / 1000.0,
            p99_ms: hist.value_at_percentile(99.0) as f64 / 1000.0,
            max_ms: hist.max() as f64 / 1000.0,
        }
    }
}

mod serde_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}
