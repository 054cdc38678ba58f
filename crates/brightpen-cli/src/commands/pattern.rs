//! The `brightpen pattern` command.

use std::path::PathBuf;

use anyhow::Result;

use brightpen_core::model::{PracticeMode, Suggestion};
use brightpen_core::practice::{check_pattern, pattern_suggestions, pattern_topic, SentencePattern};

use super::{print_suggestions, OutputFormat, Session};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config_path: Option<PathBuf>,
    keyword: String,
    sentence: String,
    pattern: String,
    grade: Option<String>,
    seed: Option<u64>,
    save: bool,
    format: OutputFormat,
) -> Result<()> {
    anyhow::ensure!(!keyword.trim().is_empty(), "keyword is empty");
    let pattern: SentencePattern = pattern.parse().map_err(anyhow::Error::msg)?;

    let mut session = Session::load(config_path.as_deref(), seed)?;
    let grade = session.grade(grade);

    let check = check_pattern(&sentence, &keyword, pattern, session.engine.lexicon());
    let suggestions = Suggestion::numbered(pattern_suggestions(
        &mut session.engine,
        &sentence,
        &keyword,
        pattern,
        &grade,
    ));

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "keyword": keyword,
                "pattern": pattern,
                "check": check,
                "score": check.score(),
                "suggestions": suggestions,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            let mark = if check.is_valid() { "OK" } else { "FAIL" };
            println!("[{mark}] {check}");
            println!("\nSuggestions ({pattern}):");
            print_suggestions(&suggestions);
        }
    }

    if save {
        let adopted = suggestions.first().map(|s| s.text.as_str()).unwrap_or_default();
        let store = session.open_store()?;
        let id = store.save(
            PracticeMode::SentenceMaking,
            &pattern_topic(&keyword, pattern),
            sentence.trim(),
            adopted,
            check.score(),
        )?;
        eprintln!("Saved record #{id}");
    }

    Ok(())
}
