//! Agent poll and report loops.
//!
//! The two loops run as independent tasks. The poll loop is the only
//! writer: it derives a new [`MetricSet`] from the current one and swaps
//! it in. The report loop loads whatever snapshot is current when its
//! tick fires and iterates that, so a concurrent poll can never change a
//! snapshot mid-report.

use crate::agent::{Reporter, RuntimeSampler};
use crate::metric::MetricSet;
use crate::util::ShutdownSignal;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Metrics agent.
#[derive(Clone)]
pub struct Agent {
    /// Server address, `host:port`.
    address: String,
    /// Time between samples.
    poll_interval: Duration,
    /// Time between pushes.
    report_interval: Duration,
    /// Latest published snapshot.
    snapshot: Arc<ArcSwap<MetricSet>>,
}

impl Agent {
    /// Create an agent with an empty snapshot.
    ///
    /// Both intervals must be non-zero.
    pub fn new(address: impl Into<String>, poll_interval: Duration, report_interval: Duration) -> Self {
        Self {
            address: address.into(),
            poll_interval,
            report_interval,
            snapshot: Arc::new(ArcSwap::from_pointee(MetricSet::new())),
        }
    }

    /// The snapshot currently published by the poll loop.
    pub fn snapshot(&self) -> Arc<MetricSet> {
        self.snapshot.load_full()
    }

    /// Sample once and publish the result.
    pub fn poll(&self, sampler: &mut RuntimeSampler) {
        let gauges = sampler.sample();
        let next = self.snapshot.load().next_poll(gauges);
        debug!(
            gauges = next.gauges().len(),
            poll_count = next.poll_count(),
            "polled runtime metrics"
        );
        self.snapshot.store(Arc::new(next));
    }

    /// Run both loops until `shutdown` fires.
    pub async fn run(self, shutdown: &ShutdownSignal) {
        info!(
            server = %self.address,
            poll_interval = ?self.poll_interval,
            report_interval = ?self.report_interval,
            "agent starting"
        );

        let poll = tokio::spawn(self.clone().poll_loop(shutdown.subscribe()));
        let report = tokio::spawn(self.report_loop(shutdown.subscribe()));

        let _ = poll.await;
        let _ = report.await;

        info!("agent stopped");
    }

    async fn poll_loop(self, mut shutdown: broadcast::Receiver<()>) {
        let mut sampler = RuntimeSampler::new();
        let mut ticker = ticker(self.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll(&mut sampler),

                _ = shutdown.recv() => {
                    debug!("poll loop shutting down");
                    break;
                }
            }
        }
    }

    async fn report_loop(self, mut shutdown: broadcast::Receiver<()>) {
        let mut reporter = Reporter::new(self.address.clone());
        let mut ticker = ticker(self.report_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = self.snapshot.load_full();

                    // A hung server must not hold up shutdown.
                    tokio::select! {
                        summary = reporter.report(&snapshot) => {
                            debug!(sent = summary.sent, failed = summary.failed, "report finished");
                        }

                        _ = shutdown.recv() => {
                            debug!("report loop shutting down mid-report");
                            break;
                        }
                    }
                }

                _ = shutdown.recv() => {
                    debug!("report loop shutting down");
                    break;
                }
            }
        }
    }
}

/// Periodic ticker whose first tick is one full period from now.
fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
