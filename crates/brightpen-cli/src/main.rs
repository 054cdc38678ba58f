//! brightpen CLI — writing practice from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(
    name = "brightpen",
    version,
    about = "Rule-based writing suggestions and scoring for young students"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an editable copy of the seed dataset
    Init,

    /// Validate a dataset file or directory
    Validate {
        /// Dataset TOML file or directory (default: config dataset or built-in seed)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Grade band to check lexicon completeness for
        #[arg(long)]
        grade: Option<String>,
    },

    /// Suggest three improvements for one sentence
    Suggest {
        /// The sentence to improve
        sentence: String,

        /// The sentence before it, for the connector check
        #[arg(long, default_value = "")]
        previous: String,

        /// Grade band for rule selection (e.g. "3-6年級")
        #[arg(long)]
        grade: Option<String>,

        /// Seed for reproducible suggestions
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Score a composition on the four-part rubric
    Score {
        /// Composition text (or use --file)
        text: Option<String>,

        /// Read the composition from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Save the result as a composition record with this topic
        #[arg(long)]
        save: Option<String>,

        /// Output format: text, json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Practice a sentence pattern around a keyword
    Pattern {
        /// Keyword the sentence must use
        keyword: String,

        /// The practice sentence
        sentence: String,

        /// Pattern: 比喻句, 擬人句, 含細節句, 一般句 (or metaphor, personification, detail, free)
        #[arg(long, default_value = "一般句")]
        pattern: String,

        /// Grade band for rule selection
        #[arg(long)]
        grade: Option<String>,

        /// Seed for reproducible suggestions
        #[arg(long)]
        seed: Option<u64>,

        /// Save the attempt as a sentence-making record
        #[arg(long)]
        save: bool,

        /// Output format: text, json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Turn a speech transcription into written style
    Speech {
        /// The transcribed text
        text: String,

        /// Grade band for rule selection
        #[arg(long)]
        grade: Option<String>,

        /// Seed for reproducible suggestions
        #[arg(long)]
        seed: Option<u64>,

        /// Save the attempt as a speech transcription record
        #[arg(long)]
        save: bool,

        /// Output format: text, json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Append a practice record
    Save {
        /// Practice mode: composition, sentence, speech (or the Chinese names)
        #[arg(long)]
        mode: String,

        /// Practice topic
        #[arg(long)]
        topic: String,

        /// The student's text
        #[arg(long)]
        input: String,

        /// The adopted suggestion
        #[arg(long, default_value = "")]
        suggested: String,

        /// Score to record
        #[arg(long)]
        score: f64,
    },

    /// Show recent practice records
    History {
        /// Number of records to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Output format: text, json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() {
    let directive: tracing_subscriber::filter::Directive = match "brightpen=info".parse() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: bad log directive: {e}");
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { dataset, grade } => {
            commands::validate::execute(config, dataset, grade)
        }
        Commands::Suggest {
            sentence,
            previous,
            grade,
            seed,
            format,
        } => commands::suggest::execute(config, sentence, previous, grade, seed, format),
        Commands::Score {
            text,
            file,
            save,
            format,
        } => commands::score::execute(config, text, file, save, format),
        Commands::Pattern {
            keyword,
            sentence,
            pattern,
            grade,
            seed,
            save,
            format,
        } => commands::pattern::execute(
            config, keyword, sentence, pattern, grade, seed, save, format,
        ),
        Commands::Speech {
            text,
            grade,
            seed,
            save,
            format,
        } => commands::speech::execute(config, text, grade, seed, save, format),
        Commands::Save {
            mode,
            topic,
            input,
            suggested,
            score,
        } => commands::save::execute(config, mode, topic, input, suggested, score),
        Commands::History { limit, format } => commands::history::execute(config, limit, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
