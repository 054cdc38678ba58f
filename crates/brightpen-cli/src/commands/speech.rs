//! The `brightpen speech` command.

use std::path::PathBuf;

use anyhow::Result;

use brightpen_core::model::{PracticeMode, Suggestion};
use brightpen_core::practice::{speech_suggestions, to_written, SPEECH_SCORE, SPEECH_TOPIC};

use super::{print_suggestions, OutputFormat, Session};

pub fn execute(
    config_path: Option<PathBuf>,
    text: String,
    grade: Option<String>,
    seed: Option<u64>,
    save: bool,
    format: OutputFormat,
) -> Result<()> {
    anyhow::ensure!(!text.trim().is_empty(), "transcription is empty");

    let mut session = Session::load(config_path.as_deref(), seed)?;
    let grade = session.grade(grade);

    let written = to_written(&text);
    let suggestions = Suggestion::numbered(speech_suggestions(&mut session.engine, &text, &grade));

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "input": text.trim(),
                "written": written,
                "suggestions": suggestions,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Written form: {written}");
            println!("\nSuggestions ({grade}):");
            print_suggestions(&suggestions);
        }
    }

    if save {
        let adopted = suggestions.first().map(|s| s.text.as_str()).unwrap_or_default();
        let store = session.open_store()?;
        let id = store.save(
            PracticeMode::SpeechTranscription,
            SPEECH_TOPIC,
            text.trim(),
            adopted,
            SPEECH_SCORE,
        )?;
        eprintln!("Saved record #{id}");
    }

    Ok(())
}
