//! The `brightpen save` command.

use std::path::PathBuf;

use anyhow::Result;

use brightpen_core::config::load_config_from;
use brightpen_core::model::PracticeMode;

use super::open_store;

pub fn execute(
    config_path: Option<PathBuf>,
    mode: String,
    topic: String,
    input: String,
    suggested: String,
    score: f64,
) -> Result<()> {
    let mode: PracticeMode = mode.parse().map_err(anyhow::Error::msg)?;
    anyhow::ensure!(!input.trim().is_empty(), "input text is empty");
    anyhow::ensure!(score.is_finite(), "score must be a number");

    let config = load_config_from(config_path.as_deref())?;
    let store = open_store(&config)?;
    let id = store.save(mode, &topic, &input, &suggested, score)?;
    println!("Saved record #{id} ({mode}, {score:.1})");

    Ok(())
}
