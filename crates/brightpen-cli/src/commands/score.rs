//! The `brightpen score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use brightpen_core::model::PracticeMode;
use brightpen_core::scorer::ScoreReport;

use super::{OutputFormat, Session};

pub fn execute(
    config_path: Option<PathBuf>,
    text: Option<String>,
    file: Option<PathBuf>,
    save_topic: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read composition: {}", path.display()))?,
        (None, None) => anyhow::bail!("provide the composition text or --file"),
    };
    anyhow::ensure!(!text.trim().is_empty(), "composition is empty");

    let session = Session::load(config_path.as_deref(), None)?;
    let report = session.engine.score(&text);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "total": report.total,
                "breakdown": report.breakdown,
                "advice": report.advice(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => print_report(&report),
    }

    if let Some(topic) = save_topic {
        let store = session.open_store()?;
        let id = store.save(PracticeMode::Composition, &topic, &text, "", report.total)?;
        eprintln!("Saved record #{id}");
    }

    Ok(())
}

fn print_report(report: &ScoreReport) {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Score", "Max"]);
    for (category, points) in report.breakdown.iter() {
        table.add_row(vec![
            Cell::new(category.label()),
            Cell::new(format!("{points:.1}")),
            Cell::new(format!("{:.0}", category.max())),
        ]);
    }

    println!("{table}");
    println!("Total: {:.1} / 100", report.total);
    println!("\nAdvice:");
    for hint in report.advice() {
        println!("  - {hint}");
    }
}
