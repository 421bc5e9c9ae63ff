//! Display utilities for the dailybars CLI.

use dailybars_lib::{RunSummary, StoreStats, StoredRow};

/// Print the outcome of one pipeline run.
pub(crate) fn print_summary(summary: &RunSummary) {
    println!("Run {} started {}", summary.run_id, summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "  Extracted:   {}/{} symbols",
        summary.symbols_extracted, summary.symbols_requested
    );
    println!(
        "  Transformed: {} symbols, {} records ({} rejected)",
        summary.symbols_transformed, summary.records_transformed, summary.rejected_rows
    );
    println!("  Inserted:    {} new rows", summary.rows_inserted);
    print_stats(&summary.stats);
}

/// Print table-wide statistics.
pub(crate) fn print_stats(stats: &StoreStats) {
    println!("Total rows: {}", stats.total_rows);
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        println!("Date range: {earliest} to {latest}");
    }

    if stats.per_symbol.is_empty() {
        return;
    }

    println!("{:<10} {:>8}", "SYMBOL", "ROWS");
    println!("{}", "-".repeat(19));
    for (symbol, count) in &stats.per_symbol {
        println!("{symbol:<10} {count:>8}");
    }
}

/// Print stored rows, newest first.
pub(crate) fn print_rows(rows: &[StoredRow]) {
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>12} {:>9}",
        "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME", "CHANGE%"
    );
    println!("{}", "-".repeat(79));
    for row in rows {
        let change = row
            .daily_change_percentage
            .map_or_else(|| "-".to_string(), |c| format!("{c:.2}"));
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12} {:>9}",
            row.date.to_string(),
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
            change
        );
    }
}
