//! The cancellable daily wait loop.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use crate::{Clock, DailyTrigger, LocalClock, RunTime};

/// Default interval between due checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Local time of day at which the job fires.
    pub run_time: RunTime,
    /// How often the loop wakes to check whether the trigger is due.
    pub check_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            run_time: RunTime::default(),
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

/// Counts of job firings over a scheduler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScheduleReport {
    /// Firings, including immediate runs.
    pub firings: usize,
    /// Firings whose job reported failure.
    pub failures: usize,
}

impl ScheduleReport {
    fn record(&mut self, ok: bool) {
        self.firings += 1;
        if !ok {
            self.failures += 1;
        }
    }
}

/// Drives a job immediately or once per day.
///
/// A job is any closure returning a future that resolves to `true` on
/// success. Firings never overlap: the loop awaits each job before it
/// sleeps again.
#[derive(Debug)]
pub struct Scheduler<C = LocalClock> {
    config: SchedulerConfig,
    clock: C,
    report: ScheduleReport,
}

impl Scheduler<LocalClock> {
    /// Creates a scheduler on the local system clock.
    #[must_use]
    pub const fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, LocalClock)
    }
}

impl<C: Clock> Scheduler<C> {
    /// Creates a scheduler on a custom clock.
    #[must_use]
    pub const fn with_clock(config: SchedulerConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            report: ScheduleReport {
                firings: 0,
                failures: 0,
            },
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns firing counts so far.
    #[must_use]
    pub const fn report(&self) -> ScheduleReport {
        self.report
    }

    /// Runs the job once, right now.
    ///
    /// Returns the job's success flag.
    pub async fn run_now<F, Fut>(&mut self, mut job: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        self.fire(&mut job).await
    }

    /// Fires the job every day at the configured time until `shutdown`
    /// turns true or its sender is dropped.
    ///
    /// The shutdown flag is checked at the top of every iteration and wakes
    /// the idle wait early. A job already running is awaited to completion.
    pub async fn run_until_shutdown<F, Fut>(
        &mut self,
        mut job: F,
        mut shutdown: watch::Receiver<bool>,
    ) -> ScheduleReport
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut trigger = DailyTrigger::new(self.config.run_time, self.clock.now());
        info!(
            run_time = %self.config.run_time,
            next_run = %trigger.next_run(),
            "scheduler started"
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            if trigger.is_due(self.clock.now()) {
                self.fire(&mut job).await;
                trigger.advance(self.clock.now());
                info!(next_run = %trigger.next_run(), "next run scheduled");
                continue;
            }

            tokio::select! {
                () = tokio::time::sleep(self.config.check_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(
            firings = self.report.firings,
            failures = self.report.failures,
            "scheduler stopped"
        );
        self.report
    }

    async fn fire<F, Fut>(&mut self, job: &mut F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let started = self.clock.now();
        info!(started = %started, "running scheduled job");

        let ok = job().await;
        if ok {
            info!("scheduled job completed");
        } else {
            error!("scheduled job failed");
        }

        self.report.record(ok);
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// Local time that advances with tokio's (pausable) clock.
    struct TokioClock {
        base: NaiveDateTime,
        start: Instant,
    }

    impl TokioClock {
        fn starting_at(hour: u32, minute: u32) -> Self {
            Self {
                base: NaiveDate::from_ymd_opt(2024, 6, 10)
                    .unwrap()
                    .and_hms_opt(hour, minute, 0)
                    .unwrap(),
                start: Instant::now(),
            }
        }
    }

    impl Clock for TokioClock {
        fn now(&self) -> NaiveDateTime {
            let elapsed = TimeDelta::from_std(self.start.elapsed()).unwrap();
            self.base + elapsed
        }
    }

    fn config(hour: u32, minute: u32) -> SchedulerConfig {
        SchedulerConfig {
            run_time: RunTime::new(hour, minute).unwrap(),
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    fn counting_job(counter: Arc<AtomicUsize>, ok: bool) -> impl FnMut() -> std::future::Ready<bool> {
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(ok)
        }
    }

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.run_time.to_string(), "09:00");
        assert_eq!(config.check_interval, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_run_now_fires_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new(SchedulerConfig::default());

        assert!(scheduler.run_now(counting_job(Arc::clone(&counter), true)).await);
        assert!(!scheduler.run_now(counting_job(Arc::clone(&counter), false)).await);

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(
            scheduler.report(),
            ScheduleReport {
                firings: 2,
                failures: 1
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_start_never_fires() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(true);
        let mut scheduler = Scheduler::with_clock(config(8, 1), TokioClock::starting_at(8, 0));

        let report = scheduler
            .run_until_shutdown(counting_job(Arc::clone(&counter), true), rx)
            .await;
        assert_eq!(report.firings, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_day() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(false);
        let mut scheduler = Scheduler::with_clock(config(8, 30), TokioClock::starting_at(8, 0));

        let job = counting_job(Arc::clone(&counter), true);
        let handle = tokio::spawn(async move { scheduler.run_until_shutdown(job, rx).await });

        // 08:00 -> day two 09:00 spans two firings.
        tokio::time::sleep(Duration::from_secs(25 * 3600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        tx.send(true).unwrap();
        let report = handle.await.unwrap();
        assert_eq!(report.firings, 2);
        assert_eq!(report.failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_due_does_not_fire() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(false);
        let mut scheduler = Scheduler::with_clock(config(9, 0), TokioClock::starting_at(9, 30));

        let job = counting_job(Arc::clone(&counter), true);
        let handle = tokio::spawn(async move { scheduler.run_until_shutdown(job, rx).await });

        tokio::time::sleep(Duration::from_secs(20 * 3600)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tx.send(true).unwrap();
        assert_eq!(handle.await.unwrap().firings, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_wakes_idle_wait() {
        let (tx, rx) = watch::channel(false);
        let mut scheduler = Scheduler::with_clock(
            SchedulerConfig {
                run_time: RunTime::new(9, 0).unwrap(),
                check_interval: Duration::from_secs(3600),
            },
            TokioClock::starting_at(10, 0),
        );

        let handle = tokio::spawn(async move {
            scheduler
                .run_until_shutdown(|| std::future::ready(true), rx)
                .await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        let before = Instant::now();
        tx.send(true).unwrap();
        handle.await.unwrap();
        assert!(before.elapsed() < Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_sender_stops_loop() {
        let (tx, rx) = watch::channel(false);
        let mut scheduler = Scheduler::with_clock(config(9, 0), TokioClock::starting_at(10, 0));
        drop(tx);

        let report = scheduler
            .run_until_shutdown(|| std::future::ready(true), rx)
            .await;
        assert_eq!(report.firings, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_job_completes_before_shutdown() {
        let finished = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(false);
        let mut scheduler = Scheduler::with_clock(config(8, 0), TokioClock::starting_at(7, 59));

        let done = Arc::clone(&finished);
        let tx_in_job = tx.clone();
        let job = move || {
            let done = Arc::clone(&done);
            let tx = tx_in_job.clone();
            async move {
                // Shutdown arrives mid-run.
                tx.send(true).unwrap();
                tokio::time::sleep(Duration::from_secs(30)).await;
                done.fetch_add(1, Ordering::SeqCst);
                true
            }
        };

        let report = scheduler.run_until_shutdown(job, rx).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(report.firings, 1);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_counted_and_loop_continues() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(false);
        let mut scheduler = Scheduler::with_clock(config(8, 30), TokioClock::starting_at(8, 0));

        let job = counting_job(Arc::clone(&counter), false);
        let handle = tokio::spawn(async move { scheduler.run_until_shutdown(job, rx).await });

        tokio::time::sleep(Duration::from_secs(49 * 3600)).await;
        tx.send(true).unwrap();
        let report = handle.await.unwrap();
        assert_eq!(report.firings, 3);
        assert_eq!(report.failures, 3);
    }
}
