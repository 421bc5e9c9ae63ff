//! Stats command implementation.

use crate::display::{print_rows, print_stats};
use anyhow::{Context, Result, bail};
use dailybars_lib::{Settings, Store, VERIFY_ROWS};

/// Show table statistics, and the latest rows for `symbol` if given.
pub(crate) fn show_stats(settings: &Settings, symbol: Option<&str>) -> Result<()> {
    let db_path = settings.db_path();
    if !db_path.exists() {
        bail!(
            "No database at {}. Run `dailybars run` first.",
            db_path.display()
        );
    }

    let store = Store::open(db_path, settings.table().clone())
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    store.ensure_schema()?;

    println!("Database: {}", db_path.display());
    print_stats(&store.stats()?);

    if let Some(symbol) = symbol {
        let symbol = symbol.trim().to_uppercase();
        let rows = store.recent(&symbol, VERIFY_ROWS)?;
        println!();
        if rows.is_empty() {
            println!("No rows stored for {symbol}.");
        } else {
            println!("Latest rows for {symbol}:");
            print_rows(&rows);
        }
    }

    Ok(())
}
