//! Load → clean → aggregate → render
//!
//! The pipeline:
//! 1. Reads the source file (the only await point)
//! 2. Cleans raw rows into enrollment records
//! 3. Builds the term/department sets and the pivoted count matrix
//! 4. Renders the streamgraph into the caller's mounts

use crate::chart::{render, Mounts};
use crate::config::StreamgraphConfig;
use crate::enrollment::{clean_records, read_source, Enrollment, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Load `source`, aggregate it and draw the streamgraph into `mounts`
///
/// Returns the aggregated enrollment so callers can inspect or print the
/// pivoted rows.
pub async fn load(source: &Path, config: &StreamgraphConfig, mounts: &mut Mounts) -> Result<Enrollment> {
    let t0 = Instant::now();

    info!("[1/4] Reading {}", source.display());
    let raw = read_source(source).await?;
    debug!(rows = raw.len(), "parsed source rows");

    info!("[2/4] Cleaning {} record(s)", raw.len());
    let records = clean_records(&raw, &config.columns);

    info!("[3/4] Aggregating");
    let enrollment = Enrollment::from_records(&records)?;
    info!(
        "  {} term(s), {} department(s)",
        enrollment.terms.len(),
        enrollment.departments.len()
    );
    if enrollment.rows.is_empty() {
        warn!("no enrollment records found in {}", source.display());
    }

    info!("[4/4] Rendering streamgraph");
    let chart = render(
        &enrollment.rows,
        &enrollment.departments,
        &config.chart,
        mounts,
    );
    info!(
        "  {} layer(s), {:.1?} total",
        chart.layers.len(),
        t0.elapsed()
    );

    Ok(enrollment)
}
