//! Periodic background refresh of every registered namespace.
//!
//! The scheduler is one long-lived driver task. On each tick it clears the
//! container cache, fans out one refresh task per registered namespace, and
//! blocks on the join barrier until every task has finished before it will
//! accept the next tick. Ticks are therefore strictly sequential: if a cycle
//! overruns the interval, the next tick is delayed, never run concurrently.
//!
//! # Ordering and Isolation
//!
//! - The cache clear completes before any refresh task of the same cycle
//!   starts; no task can race with the clear.
//! - Refresh tasks of one cycle are independent and complete in any order.
//! - Each task's outcome is captured independently: a failing or timed-out
//!   refresh is logged and leaves that namespace stale, without cancelling
//!   siblings or aborting the cycle.
//! - Every task runs under the configured per-refresh deadline, so one stalled
//!   source cannot block the barrier indefinitely.
//!
//! # Shutdown
//!
//! [`RefreshScheduler::spawn`] returns a [`SchedulerHandle`]; dropping it
//! detaches the driver for the life of the process, while
//! [`SchedulerHandle::shutdown`] cancels the loop and waits for an in-flight
//! cycle to finish its barrier first.

use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::cache::reclaim_hint;
use crate::context::MappingContext;
use crate::{Error, Result};

/// Spawns and owns the periodic refresh driver.
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Starts the refresh loop on the current tokio runtime.
    ///
    /// The first tick fires immediately; subsequent ticks at the configured
    /// interval, measured from the scheduled times rather than cycle
    /// completion, with overruns delaying rather than bursting.
    #[must_use]
    pub fn spawn(ctx: Arc<MappingContext>) -> SchedulerHandle {
        let cancel = CancellationToken::new();
        let task_token = cancel.clone();
        let task = tokio::spawn(async move {
            run(ctx, task_token).await;
        });

        SchedulerHandle { cancel, task }
    }
}

/// Handle to a running refresh loop.
///
/// Dropping the handle leaves the loop running detached; call
/// [`SchedulerHandle::shutdown`] for a clean stop.
pub struct SchedulerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Requests the loop to stop without waiting for it.
    ///
    /// An in-flight cycle still runs to its barrier; the loop exits before
    /// starting another.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stops the loop and waits for it to exit.
    ///
    /// If a cycle is in flight, this returns only after its join barrier has
    /// completed and the driver task has wound down.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        // The driver never panics on its own; a JoinError here means the
        // runtime is tearing down anyway.
        let _ = self.task.await;
    }

    /// Returns `true` if the driver task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(ctx: Arc<MappingContext>, cancel: CancellationToken) {
    let mut ticker = interval(ctx.config().refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(
        interval = ?ctx.config().refresh_interval,
        "refresh scheduler started"
    );

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        refresh_cycle(&ctx).await;
    }

    tracing::info!("refresh scheduler stopped");
}

/// Runs one full refresh cycle: cache clear, fan-out, join barrier, reclaim.
async fn refresh_cycle(ctx: &Arc<MappingContext>) {
    ctx.cache().clear();

    let deadline = ctx.config().refresh_timeout;
    let mut tasks: JoinSet<(String, Result<()>)> = JoinSet::new();
    for namespace in ctx.registry().handles() {
        tasks.spawn(async move {
            let id = namespace.id().to_owned();
            let outcome = match timeout(deadline, namespace.refresh()).await {
                Ok(result) => result,
                Err(_) => Err(Error::Error(format!(
                    "refresh exceeded its {deadline:?} deadline"
                ))),
            };
            (id, outcome)
        });
    }

    let total = tasks.len();
    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, Ok(()))) => {
                tracing::debug!(namespace = id, "namespace refreshed");
            }
            Ok((id, Err(error))) => {
                failed += 1;
                tracing::warn!(namespace = id, %error, "namespace refresh failed");
            }
            Err(join_error) => {
                failed += 1;
                tracing::warn!(error = %join_error, "namespace refresh task panicked");
            }
        }
    }

    reclaim_hint();
    tracing::info!(total, failed, "refresh cycle complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapdexConfig;
    use crate::mapping::MappingContainer;
    use crate::namespace::Namespace;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::sleep;

    /// Namespace that counts refreshes and optionally sleeps or fails.
    struct ProbeNamespace {
        id: &'static str,
        refreshes: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    impl ProbeNamespace {
        fn new(id: &'static str) -> Arc<Self> {
            Arc::new(ProbeNamespace {
                id,
                refreshes: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: false,
            })
        }

        fn slow(id: &'static str, delay: Duration) -> Arc<Self> {
            Arc::new(ProbeNamespace {
                id,
                refreshes: AtomicUsize::new(0),
                delay,
                fail: false,
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(ProbeNamespace {
                id,
                refreshes: AtomicUsize::new(0),
                delay: Duration::ZERO,
                fail: true,
            })
        }

        fn count(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Namespace for ProbeNamespace {
        fn id(&self) -> &str {
            self.id
        }

        async fn refresh(&self) -> crate::Result<()> {
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Error("simulated source failure".to_owned()));
            }
            Ok(())
        }
    }

    fn context_with(namespaces: Vec<Arc<ProbeNamespace>>) -> Arc<MappingContext> {
        let mut config = MapdexConfig::default().with_refresh_interval(Duration::from_secs(60));
        for namespace in namespaces {
            config = config.with_namespace(namespace);
        }
        MappingContext::new(config)
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_clears_cache_and_refreshes_all() {
        let a = ProbeNamespace::new("a");
        let b = ProbeNamespace::new("b");
        let ctx = context_with(vec![a.clone(), b.clone()]);
        ctx.cache()
            .add(Arc::new(MappingContainer::new("1.0", "stale")));

        refresh_cycle(&ctx).await;

        assert!(ctx.cache().is_empty());
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn barrier_waits_for_slowest_namespace() {
        let fast = ProbeNamespace::new("fast");
        let slow = ProbeNamespace::slow("slow", Duration::from_secs(30));
        let ctx = context_with(vec![fast.clone(), slow.clone()]);

        refresh_cycle(&ctx).await;

        // The cycle returned, so even the slow namespace must have finished.
        assert_eq!(fast.count(), 1);
        assert_eq!(slow.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_isolated_from_siblings() {
        let good = ProbeNamespace::new("good");
        let bad = ProbeNamespace::failing("bad");
        let other = ProbeNamespace::new("other");
        let ctx = context_with(vec![good.clone(), bad.clone(), other.clone()]);

        refresh_cycle(&ctx).await;

        assert_eq!(good.count(), 1);
        assert_eq!(other.count(), 1);
        assert_eq!(bad.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_namespace_hits_deadline_without_blocking_cycle() {
        let stalled = ProbeNamespace::slow("stalled", Duration::from_secs(3600));
        let fast = ProbeNamespace::new("fast");
        let mut config = MapdexConfig::default()
            .with_refresh_interval(Duration::from_secs(60))
            .with_refresh_timeout(Duration::from_secs(10));
        config = config.with_namespace(stalled.clone());
        config = config.with_namespace(fast.clone());
        let ctx = MappingContext::new(config);

        refresh_cycle(&ctx).await;

        assert_eq!(fast.count(), 1);
        // The stalled refresh was abandoned at the deadline.
        assert_eq!(stalled.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_fires_immediately_and_loop_repeats() {
        let probe = ProbeNamespace::new("probe");
        let ctx = context_with(vec![probe.clone()]);
        let handle = RefreshScheduler::spawn(ctx);

        // Allow the immediate first tick to complete.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(probe.count(), 1);

        // One full interval later the second cycle has run.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(probe.count(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failing_namespace_does_not_stop_the_schedule() {
        let bad = ProbeNamespace::failing("bad");
        let good = ProbeNamespace::new("good");
        let ctx = context_with(vec![bad.clone(), good.clone()]);
        let handle = RefreshScheduler::spawn(ctx);

        tokio::time::sleep(Duration::from_secs(121)).await;
        // Two intervals elapsed after the immediate tick: three cycles total,
        // none skipped because of the failing namespace.
        assert_eq!(good.count(), 3);
        assert_eq!(bad.count(), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_future_ticks() {
        let probe = ProbeNamespace::new("probe");
        let ctx = context_with(vec![probe.clone()]);
        let handle = RefreshScheduler::spawn(ctx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.shutdown().await;
        let after_shutdown = probe.count();

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(probe.count(), after_shutdown);
    }
}
