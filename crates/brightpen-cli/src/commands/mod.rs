//! Subcommand implementations and the setup they share.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use brightpen_core::config::{load_config_from, AppConfig};
use brightpen_core::model::{GradeBand, Suggestion};
use brightpen_core::parser::load_dataset;
use brightpen_core::random::SeededRandom;
use brightpen_core::segmenter::JiebaSegmenter;
use brightpen_core::store::RecordStore;
use brightpen_core::{EngineConfig, WritingEngine};

pub mod history;
pub mod init;
pub mod pattern;
pub mod save;
pub mod score;
pub mod speech;
pub mod suggest;
pub mod validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Loaded config plus the engine built from it.
pub struct Session {
    pub config: AppConfig,
    pub engine: WritingEngine,
}

impl Session {
    /// Load config and dataset and build the engine for the config's grade band.
    pub fn load(config_path: Option<&Path>, seed: Option<u64>) -> Result<Self> {
        let config = load_config_from(config_path)?;
        tracing::debug!(
            grade = %config.grade,
            database = %config.database.display(),
            "resolved configuration"
        );
        let dataset = load_dataset(config.dataset.as_deref())?;
        let engine_config = EngineConfig::from_dataset(&dataset, &config.grade)
            .with_context(|| format!("dataset is unusable for grade band {}", config.grade))?;

        let segmenter = JiebaSegmenter::with_lexicon(&engine_config.lexicon);
        let rng = match seed {
            Some(seed) => SeededRandom::seeded(seed),
            None => SeededRandom::from_entropy(),
        };
        let engine = WritingEngine::with_parts(engine_config, Box::new(segmenter), Box::new(rng));
        Ok(Self { config, engine })
    }

    /// The `--grade` override, or the configured grade band.
    pub fn grade(&self, requested: Option<String>) -> GradeBand {
        requested
            .map(GradeBand::new)
            .unwrap_or_else(|| self.config.grade.clone())
    }

    pub fn open_store(&self) -> Result<RecordStore> {
        open_store(&self.config)
    }
}

pub fn open_store(config: &AppConfig) -> Result<RecordStore> {
    RecordStore::open(&config.database, config.student_id.clone()).with_context(|| {
        format!(
            "failed to open record store: {}",
            config.database.display()
        )
    })
}

pub fn print_suggestions(suggestions: &[Suggestion]) {
    for s in suggestions {
        println!("  {s}");
    }
}
