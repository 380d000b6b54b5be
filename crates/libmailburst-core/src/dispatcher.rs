//! Concurrent batch dispatch
//!
//! Batches run strictly one after another; sends within a batch run
//! concurrently on scoped worker threads. The scope join between batches
//! is what guarantees no batch overlaps the next.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::TestConfig;
use crate::mailer::Mailer;
use crate::message::TestMessage;
use crate::summary::{RunSummary, SendResult};

/// Drives a test run end-to-end.
pub struct BatchDispatcher<M> {
    mailer: M,
}

impl<M: Mailer> BatchDispatcher<M> {
    pub fn new(mailer: M) -> Self {
        Self { mailer }
    }

    /// Send every message, `config.batch_size` at a time.
    ///
    /// Within a batch at most `min(batch_len, concurrency)` sends are in
    /// flight; a batch's workers are all joined before the next batch
    /// starts. Individual send failures are recorded and never abort the
    /// run. An empty message set produces an empty summary without
    /// touching the mailer.
    pub fn run(&self, config: &TestConfig, messages: &[TestMessage]) -> RunSummary {
        let mut summary = RunSummary::with_capacity(messages.len());
        if messages.is_empty() {
            return summary;
        }

        let batch_size = config.batch_size.max(1);
        let batch_count = messages.len().div_ceil(batch_size);
        info!(
            total = messages.len(),
            batches = batch_count,
            batch_size,
            concurrency = config.concurrency,
            "starting run"
        );

        let started = Instant::now();
        for (batch_idx, batch) in messages.chunks(batch_size).enumerate() {
            let batch_started = Instant::now();
            let results = self.run_batch(batch, config.concurrency);
            let sent = results.iter().filter(|r| r.success).count();
            info!(
                batch = batch_idx + 1,
                of = batch_count,
                sent,
                failed = batch.len() - sent,
                elapsed_ms = batch_started.elapsed().as_millis() as u64,
                "batch complete"
            );
            summary.extend(results);
        }
        summary.finish(started.elapsed());

        summary
    }

    /// Dispatch one batch and return its results in submission order.
    fn run_batch(&self, batch: &[TestMessage], concurrency: usize) -> Vec<SendResult> {
        let workers = batch.len().min(concurrency.max(1));
        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, SendResult)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                let mailer = &self.mailer;
                scope.spawn(move || loop {
                    let idx = cursor.fetch_add(1, Ordering::Relaxed);
                    if idx >= batch.len() {
                        break;
                    }
                    let result = send_one(mailer, &batch[idx]);
                    if tx.send((idx, result)).is_err() {
                        break;
                    }
                });
            }
        });
        drop(tx);

        // All workers have joined; drain the channel and re-assemble
        // submission order, since completion order is arbitrary.
        let mut slots: Vec<Option<SendResult>> = vec![None; batch.len()];
        for (idx, result) in rx {
            slots[idx] = Some(result);
        }
        slots.into_iter().flatten().collect()
    }
}

fn send_one<M: Mailer>(mailer: &M, message: &TestMessage) -> SendResult {
    let started = Instant::now();
    match mailer.send(message) {
        Ok(()) => SendResult::ok(started.elapsed()),
        Err(e) => {
            warn!(to = %message.to, error = %e, "send failed");
            SendResult::failed(started.elapsed(), e.to_string())
        }
    }
}
