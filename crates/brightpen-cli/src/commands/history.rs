//! The `brightpen history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use brightpen_core::config::load_config_from;

use super::{open_store, OutputFormat};

/// Characters of input text shown per row.
const PREVIEW_CHARS: usize = 20;

pub fn execute(config_path: Option<PathBuf>, limit: usize, format: OutputFormat) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config)?;
    let total = store.count()?;
    let records = store.recent(limit)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No practice records for {}.", store.student_id());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Time", "Mode", "Topic", "Input", "Score"]);
    for r in &records {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(r.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(r.mode),
            Cell::new(&r.topic),
            Cell::new(preview(&r.input_text)),
            Cell::new(format!("{:.1}", r.score)),
        ]);
    }

    println!("{table}");
    println!(
        "Showing {} of {total} record(s) for {}.",
        records.len(),
        store.student_id()
    );

    Ok(())
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push('…');
    }
    out
}
