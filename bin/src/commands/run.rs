//! Run command implementation.

use crate::display::print_summary;
use anyhow::{Context, Result};
use dailybars_lib::prelude::*;

/// Run the pipeline once and print what it did.
pub(crate) async fn run(settings: &Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(settings).context("Failed to set up pipeline")?;
    let summary = pipeline.run_once().await.context("Pipeline run failed")?;
    print_summary(&summary);
    Ok(())
}
