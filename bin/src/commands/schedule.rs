//! Schedule command implementation.
//!
//! Runs the pipeline once a day at a local time of day. Ctrl+C stops the
//! wait loop; a run in progress is allowed to finish first.

use crate::display::print_summary;
use anyhow::{Context, Result};
use dailybars_lib::prelude::*;
use tracing::error;

/// Run the pipeline daily at `time`, optionally once right away.
pub(crate) async fn schedule(settings: &Settings, time: RunTime, now: bool) -> Result<()> {
    let pipeline = Pipeline::from_settings(settings).context("Failed to set up pipeline")?;
    let pipeline = &pipeline;
    let job = move || async move {
        match pipeline.run_once().await {
            Ok(summary) => {
                print_summary(&summary);
                true
            }
            Err(e) => {
                error!(error = %e, "pipeline run failed");
                false
            }
        }
    };

    let mut scheduler = Scheduler::new(SchedulerConfig {
        run_time: time,
        ..SchedulerConfig::default()
    });

    println!("Scheduled daily run at {time} (local time). Press Ctrl+C to stop.");

    if now {
        scheduler.run_now(job).await;
    }

    let report = scheduler.run_until_shutdown(job, shutdown_on_ctrl_c()).await;
    println!(
        "Scheduler stopped after {} run(s), {} failed.",
        report.firings, report.failures
    );
    Ok(())
}
