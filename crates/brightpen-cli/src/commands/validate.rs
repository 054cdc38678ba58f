//! The `brightpen validate` command.

use std::path::PathBuf;

use anyhow::Result;

use brightpen_core::config::load_config_from;
use brightpen_core::engine::EngineConfig;
use brightpen_core::model::GradeBand;
use brightpen_core::parser::{load_dataset, validate_dataset};

pub fn execute(
    config_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
    grade: Option<String>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dataset = load_dataset(dataset_path.as_deref().or(config.dataset.as_deref()))?;
    let grade = grade.map(GradeBand::new).unwrap_or(config.grade);

    println!(
        "Dataset: {} ({} rules, {} resource sets)",
        if dataset.name.is_empty() {
            &dataset.id
        } else {
            &dataset.name
        },
        dataset.rules.len(),
        dataset.resources.len()
    );

    let warnings = validate_dataset(&dataset);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    // Missing categories are fatal for the engine, so they fail here too.
    EngineConfig::from_dataset(&dataset, &grade)?;

    if warnings.is_empty() {
        println!("Dataset valid for {grade}.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
