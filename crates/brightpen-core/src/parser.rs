//! TOML dataset parser.
//!
//! Loads the lexicon and rule table from TOML files and directories, and
//! validates them. A seed dataset is compiled into the crate.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::lexicon::Lexicon;
use crate::model::{
    placeholder_names, GradeBand, LexiconCategory, Placeholder, Rule, TriggerCondition,
};
use crate::rules::RuleTable;

/// The built-in seed dataset.
pub const SEED_DATASET: &str = include_str!("../data/seed.toml");

/// Separator used by joined resource entry strings.
const ENTRY_SEPARATOR: char = '、';

/// Lexicon words for one category and grade band.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSet {
    pub category: LexiconCategory,
    pub grade_range: GradeBand,
    pub entries: Vec<String>,
}

/// A parsed dataset: resources plus rules.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<ResourceSet>,
    pub rules: Vec<Rule>,
}

impl Dataset {
    /// The lexicon for one grade band.
    pub fn lexicon(&self, grade: &GradeBand) -> Lexicon {
        Lexicon::new(
            grade.clone(),
            self.resources
                .iter()
                .filter(|r| &r.grade_range == grade)
                .map(|r| (r.category, r.entries.clone())),
        )
    }

    /// All rules, in file order.
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::new(self.rules.clone())
    }

    /// Append another dataset's resources and rules.
    pub fn extend(&mut self, other: Dataset) {
        self.resources.extend(other.resources);
        self.rules.extend(other.rules);
    }
}

/// Intermediate TOML structure for dataset files.
#[derive(Debug, Deserialize)]
struct TomlDatasetFile {
    #[serde(default)]
    dataset: Option<TomlDatasetHeader>,
    #[serde(default)]
    resources: Vec<TomlResource>,
    #[serde(default)]
    rules: Vec<TomlRule>,
}

#[derive(Debug, Deserialize)]
struct TomlDatasetHeader {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlResource {
    category: String,
    grade_range: String,
    entries: TomlEntries,
}

/// Entries may be a TOML array or one "、"-joined string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlEntries {
    List(Vec<String>),
    Joined(String),
}

impl TomlEntries {
    fn into_vec(self) -> Vec<String> {
        match self {
            TomlEntries::List(list) => list,
            TomlEntries::Joined(s) => s
                .split(ENTRY_SEPARATOR)
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlRule {
    rule_type: String,
    #[serde(default)]
    description: String,
    trigger_condition: String,
    template: String,
    weight: f64,
    grade_range: String,
}

/// Parse a single TOML file into a `Dataset`.
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse a TOML string into a `Dataset` (useful for testing).
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Dataset> {
    let parsed: TomlDatasetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let resources = parsed
        .resources
        .into_iter()
        .map(|r| -> Result<ResourceSet> {
            let category: LexiconCategory = r
                .category
                .parse()
                .map_err(|_| ConfigError::UnknownCategory(r.category.clone()))?;
            Ok(ResourceSet {
                category,
                grade_range: GradeBand::new(r.grade_range),
                entries: r.entries.into_vec(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let rules = parsed
        .rules
        .into_iter()
        .map(|r| -> Result<Rule> {
            Ok(Rule {
                rule_type: r
                    .rule_type
                    .parse()
                    .map_err(|_| ConfigError::UnknownRuleType(r.rule_type.clone()))?,
                description: r.description,
                trigger_condition: r.trigger_condition,
                template: r.template,
                weight: r.weight,
                grade_range: GradeBand::new(r.grade_range),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let header = parsed.dataset.unwrap_or_else(|| TomlDatasetHeader {
        id: source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        name: String::new(),
        description: String::new(),
    });

    Ok(Dataset {
        id: header.id,
        name: header.name,
        description: header.description,
        resources,
        rules,
    })
}

/// The dataset compiled into the crate.
pub fn seed_dataset() -> Result<Dataset> {
    parse_dataset_str(SEED_DATASET, Path::new("seed.toml"))
}

/// Recursively load all `.toml` dataset files in a directory into one dataset.
///
/// Files are read in name order so rule order is stable.
pub fn load_dataset_directory(dir: &Path) -> Result<Dataset> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut merged = Dataset {
        id: dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Dataset::default()
    };
    for path in paths {
        if path.is_dir() {
            merged.extend(load_dataset_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_dataset(&path) {
                Ok(set) => merged.extend(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(merged)
}

/// Load a dataset from a file, a directory, or the built-in seed.
pub fn load_dataset(path: Option<&Path>) -> Result<Dataset> {
    match path {
        Some(p) if p.is_dir() => load_dataset_directory(p),
        Some(p) => parse_dataset(p),
        None => seed_dataset(),
    }
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Rule description or resource category the warning is about.
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a dataset for common issues.
pub fn validate_dataset(set: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate words inside one category and band
    for res in &set.resources {
        let mut seen = HashSet::new();
        for word in &res.entries {
            if !seen.insert(word) {
                warnings.push(ValidationWarning {
                    subject: Some(format!("{} ({})", res.category, res.grade_range)),
                    message: format!("duplicate entry: {word}"),
                });
            }
        }
        if res.entries.is_empty() {
            warnings.push(ValidationWarning {
                subject: Some(format!("{} ({})", res.category, res.grade_range)),
                message: "category has no entries".into(),
            });
        }
    }

    for rule in &set.rules {
        let subject = Some(rule.description.clone()).filter(|d| !d.is_empty());

        if TriggerCondition::from_label(&rule.trigger_condition).is_none() {
            warnings.push(ValidationWarning {
                subject: subject.clone(),
                message: format!(
                    "trigger condition {:?} is never raised by the suggestion generator",
                    rule.trigger_condition
                ),
            });
        }

        if !(rule.weight > 0.0 && rule.weight <= 1.0) {
            warnings.push(ValidationWarning {
                subject: subject.clone(),
                message: format!("weight {} is outside (0, 1]", rule.weight),
            });
        }

        if rule.template.trim().is_empty() {
            warnings.push(ValidationWarning {
                subject: subject.clone(),
                message: "template is empty".into(),
            });
        }

        for name in placeholder_names(&rule.template) {
            if Placeholder::from_name(name).is_none() {
                warnings.push(ValidationWarning {
                    subject: subject.clone(),
                    message: format!("unknown placeholder 【{name}】"),
                });
            }
        }
    }

    // Rule bands without any lexicon
    let resource_bands: HashSet<&GradeBand> =
        set.resources.iter().map(|r| &r.grade_range).collect();
    let mut reported = HashSet::new();
    for rule in &set.rules {
        if !resource_bands.contains(&rule.grade_range) && reported.insert(&rule.grade_range) {
            warnings.push(ValidationWarning {
                subject: None,
                message: format!("grade band {} has rules but no lexicon", rule.grade_range),
            });
        }
    }

    warnings
}
