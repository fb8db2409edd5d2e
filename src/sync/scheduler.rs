//! Periodic sync scheduling.
//!
//! `SyncScheduler` is a two-state machine. `start` moves it from idle to
//! running and spawns a timer task that runs one cycle immediately and one
//! every interval after. `stop` signals that task and returns to idle.
//! A cycle already in flight when `stop` is called runs to completion.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

use super::{SyncEngine, SyncOutcome};

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

struct RunningTimer {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    reporter: Option<mpsc::UnboundedSender<SyncOutcome>>,
    timer: Option<RunningTimer>,
}

impl SyncScheduler {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            reporter: None,
            timer: None,
        }
    }

    /// Sends the outcome of every scheduled cycle to `reporter`.
    pub fn with_reporter(mut self, reporter: mpsc::UnboundedSender<SyncOutcome>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn state(&self) -> SchedulerState {
        match &self.timer {
            Some(timer) if !timer.handle.is_finished() => SchedulerState::Running,
            _ => SchedulerState::Idle,
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    /// Starts periodic sync. Returns false if already running or if
    /// `period` is zero.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, period: Duration) -> bool {
        if period.is_zero() {
            tracing::warn!("Refusing to start periodic sync with a zero interval");
            return false;
        }
        if self.state() == SchedulerState::Running {
            tracing::debug!("Sync scheduler already running");
            return false;
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let engine = self.engine.clone();
        let reporter = self.reporter.clone();
        let handle = tokio::spawn(async move {
            run_periodic_sync(engine, period, reporter, shutdown_rx).await;
        });

        tracing::info!("Periodic sync started (every {}s)", period.as_secs_f64());
        self.timer = Some(RunningTimer {
            shutdown_tx,
            handle,
        });
        true
    }

    /// Stops periodic sync. Returns false if it was not running.
    ///
    /// Does not wait for an in-flight cycle; see [`Self::stop_and_wait`].
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                let _ = timer.shutdown_tx.send(());
                !timer.handle.is_finished()
            }
            None => false,
        }
    }

    /// Stops periodic sync and waits for the timer task to exit.
    pub async fn stop_and_wait(&mut self) -> bool {
        let Some(timer) = self.timer.take() else {
            return false;
        };
        let _ = timer.shutdown_tx.send(());
        if let Err(e) = timer.handle.await {
            tracing::warn!("Sync timer task ended abnormally: {e}");
        }
        true
    }

    /// Runs one cycle now, subject to the same busy guard as the timer.
    pub async fn trigger_now(&self) -> SyncOutcome {
        self.engine.sync_once().await
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            let _ = timer.shutdown_tx.send(());
        }
    }
}

/// Runs the periodic sync timer until a shutdown signal arrives.
///
/// The first tick fires immediately. Ticks missed while a cycle runs are
/// skipped rather than replayed.
async fn run_periodic_sync(
    engine: Arc<SyncEngine>,
    period: Duration,
    reporter: Option<mpsc::UnboundedSender<SyncOutcome>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.recv() => {
                tracing::info!("Periodic sync shutting down");
                break;
            }
            _ = ticker.tick() => {
                let outcome = engine.sync_once().await;
                if let Some(reporter) = &reporter {
                    let _ = reporter.send(outcome);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::QuoteBook;
    use crate::remote::SimulatedRemote;
    use crate::storage::MemoryStore;

    fn scheduler_with(
        remote: Arc<SimulatedRemote>,
    ) -> (SyncScheduler, mpsc::UnboundedReceiver<SyncOutcome>) {
        let book = QuoteBook::open(Arc::new(MemoryStore::new())).into_shared();
        let engine = Arc::new(SyncEngine::new(book, remote));
        let (tx, rx) = mpsc::unbounded_channel();
        (SyncScheduler::new(engine).with_reporter(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_first_cycle_immediately() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(scheduler.start(Duration::from_secs(60)));
        assert_eq!(scheduler.state(), SchedulerState::Running);

        let outcome = rx.recv().await.unwrap();
        assert!(outcome.summary().unwrap().has_changes());
        assert_eq!(remote.fetch_count(), 1);

        assert!(scheduler.stop_and_wait().await);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_repeat_every_interval() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());
        let started = tokio::time::Instant::now();

        scheduler.start(Duration::from_secs(30));
        for _ in 0..3 {
            assert!(rx.recv().await.unwrap().is_completed());
        }

        assert_eq!(remote.fetch_count(), 3);
        assert!(started.elapsed() >= Duration::from_secs(60));
        scheduler.stop_and_wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_a_no_op() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        assert!(scheduler.start(Duration::from_secs(60)));
        assert!(!scheduler.start(Duration::from_secs(1)));
        rx.recv().await.unwrap();

        scheduler.stop_and_wait().await;
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_a_no_op() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let (mut scheduler, _rx) = scheduler_with(remote);

        assert!(!scheduler.stop());
        assert!(!scheduler.stop_and_wait().await);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_rejects_zero_interval() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        assert!(!scheduler.start(Duration::ZERO));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(remote.fetch_count(), 0);

        assert!(scheduler.start(Duration::from_secs(60)));
        assert!(rx.recv().await.unwrap().is_completed());
        scheduler.stop_and_wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_lets_in_flight_cycle_finish() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::from_secs(5)));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        scheduler.start(Duration::from_secs(60));
        while !scheduler.engine().is_busy() {
            tokio::task::yield_now().await;
        }

        assert!(scheduler.stop_and_wait().await);
        let outcome = rx.recv().await.unwrap();
        assert!(outcome.is_completed());
        assert_eq!(remote.fetch_count(), 1);
        assert!(rx.try_recv().is_err(), "No cycles after stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_does_not_stop_schedule() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        remote.set_failing(true);
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        scheduler.start(Duration::from_secs(10));
        assert!(matches!(rx.recv().await.unwrap(), SyncOutcome::Failed(_)));

        remote.set_failing(false);
        assert!(rx.recv().await.unwrap().is_completed());
        scheduler.stop_and_wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_now_skips_while_timer_cycle_in_flight() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::from_secs(5)));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        scheduler.start(Duration::from_secs(60));
        while !scheduler.engine().is_busy() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(scheduler.trigger_now().await, SyncOutcome::Skipped));
        assert!(rx.recv().await.unwrap().is_completed());
        scheduler.stop_and_wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let (mut scheduler, mut rx) = scheduler_with(remote.clone());

        scheduler.start(Duration::from_secs(60));
        rx.recv().await.unwrap();
        scheduler.stop_and_wait().await;

        assert!(scheduler.start(Duration::from_secs(60)));
        rx.recv().await.unwrap();
        scheduler.stop_and_wait().await;
        assert_eq!(remote.fetch_count(), 2);
    }
}
