//! The `brightpen suggest` command.

use std::path::PathBuf;

use anyhow::Result;

use brightpen_core::model::Suggestion;

use super::{print_suggestions, OutputFormat, Session};

pub fn execute(
    config_path: Option<PathBuf>,
    sentence: String,
    previous: String,
    grade: Option<String>,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = Session::load(config_path.as_deref(), seed)?;
    let grade = session.grade(grade);

    let suggestions: Vec<Suggestion> = session.engine.suggestions(&sentence, &previous, &grade);

    match format {
        OutputFormat::Json => {
            let analysis = session.engine.analyze(&sentence, &previous);
            let out = serde_json::json!({
                "sentence": sentence,
                "grade": grade,
                "analysis": analysis,
                "suggestions": suggestions,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Suggestions ({grade}):");
            print_suggestions(&suggestions);
        }
    }

    Ok(())
}
