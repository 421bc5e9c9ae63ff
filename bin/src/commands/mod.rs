//! CLI command implementations.

pub(crate) mod run;
pub(crate) mod schedule;
pub(crate) mod stats;
