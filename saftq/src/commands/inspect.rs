// saftq/src/commands/inspect.rs
//
// USE CASE: Inspect a file (columns + sample rows).

use std::path::PathBuf;

use anyhow::Context;
use comfy_table::{Table as Grid, presets::UTF8_FULL};
use saftq_core::infrastructure::io::read_table;

pub fn execute(input: PathBuf, limit: usize) -> anyhow::Result<()> {
    let table =
        read_table(&input).with_context(|| format!("Cannot read '{}'", input.display()))?;

    println!("\n🔍 Inspecting: '{}'", input.display());
    println!(
        "   {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    println!("   Columns: [{}]", table.columns().join(", "));

    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL);
    grid.set_header(table.columns().to_vec());
    for row in table.rows().iter().take(limit) {
        grid.add_row(row.iter().map(|v| v.render()));
    }
    println!("{grid}");

    Ok(())
}
