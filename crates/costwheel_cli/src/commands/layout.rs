//! Layout command implementation.

use crate::script::Script;
use costwheel_core::{pie, ChangeEvent, RecordStore};
use serde::Serialize;
use std::path::Path;

/// One row of the segment table.
#[derive(Debug, Serialize)]
pub struct LayoutRow {
    /// Record id.
    pub id: String,
    /// Record name.
    pub name: String,
    /// Record cost as given.
    pub cost: f64,
    /// Start angle in radians.
    pub start: f64,
    /// End angle in radians.
    pub end: f64,
    /// Share of the circle.
    pub share: f64,
}

/// Runs the layout command.
pub fn run(script_path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let script = Script::load(script_path)?;
    let rows = final_layout(script.batches());

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => print_text_output(&rows),
    }

    Ok(())
}

/// Applies every batch to a fresh store and lays out the result.
pub fn final_layout<'a>(batches: impl Iterator<Item = &'a [ChangeEvent]>) -> Vec<LayoutRow> {
    let mut store = RecordStore::new();
    for event in batches.flatten() {
        store.apply(event);
    }
    pie(store.iter())
        .iter()
        .map(|segment| LayoutRow {
            id: segment.record.id.to_string(),
            name: segment.record.name.clone(),
            cost: segment.record.cost,
            start: segment.start_angle,
            end: segment.end_angle,
            share: segment.share(),
        })
        .collect()
}

fn print_text_output(rows: &[LayoutRow]) {
    if rows.is_empty() {
        println!("(no records)");
        return;
    }
    println!(
        "{:<20} {:<20} {:>10} {:>8} {:>8} {:>7}",
        "ID", "NAME", "COST", "START", "END", "SHARE"
    );
    for row in rows {
        println!(
            "{:<20} {:<20} {:>10.2} {:>8.4} {:>8.4} {:>6.1}%",
            row.id,
            row.name,
            row.cost,
            row.start,
            row.end,
            row.share * 100.0
        );
    }
}
