//! brightpen-core — rule-based writing suggestions and rubric scoring.
//!
//! This crate holds the data model, the dataset loader, the sentence
//! analyzer, the suggestion generator, the scorer and the practice record
//! store that the `brightpen` CLI is built on.

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod lexicon;
pub mod model;
pub mod parser;
pub mod practice;
pub mod random;
pub mod rules;
pub mod scorer;
pub mod segmenter;
pub mod store;

pub use engine::{EngineConfig, WritingEngine};
pub use error::{ConfigError, StoreError};
