use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use dict_core::config::{ConfigError, EngineConfig};
use dict_core::{DictError, DictionaryEngine, EntryId, MatchMode, SegmentRow, TranslationRecord};
use serde_json::{json, Map, Value};
use std::io::{self, stdin, stdout, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

const DICTIONARY_PATH: &str = "dictionary.json";

#[derive(Parser)]
#[command(name = "dict_engine", about = "Find dictionary entries in glyph code sequences")]
struct Cli {
    /// TOML engine config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dictionary document (overrides the config file)
    #[arg(long, short, global = true)]
    dictionary: Option<PathBuf>,

    /// Match symbols exactly instead of lowercasing them
    #[arg(long, global = true)]
    case_sensitive: bool,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a dictionary document from entry and translation files
    Build {
        /// JSON object: entry id -> array of symbols
        #[arg(long)]
        entries: PathBuf,
        /// JSON object: entry id -> {word, translations}
        #[arg(long)]
        translations: PathBuf,
    },
    /// Print every entry found in a symbol sequence
    Segment { symbols: Vec<String> },
    /// Find entries whose word matches a symbol sequence
    Search {
        #[arg(long, default_value = "contains")]
        mode: String,
        symbols: Vec<String>,
    },
    /// Find entries whose translation contains a term
    Translate {
        term: String,
        /// Defaults to the transliteration
        #[arg(long)]
        lang: Option<String>,
    },
    /// Show how far a sequence gets in the trie
    Lookup { symbols: Vec<String> },
    /// Segment lines read from stdin
    Repl,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid input file '{path}': {message}")]
    Input { path: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            CliError::Dict(e) => e.kind(),
            CliError::Config(_) | CliError::Input { .. } => "invalid_input",
            CliError::Io(_) => "internal",
        }
    }

    /// Domain and input errors are shown as is; anything else is logged and
    /// reported generically.
    fn public_message(&self) -> String {
        match self {
            CliError::Io(e) => {
                error!(error = %e, "unexpected failure");
                "Something went wrong!".to_string()
            }
            other => other.to_string(),
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let body = json!({ "success": false, "kind": e.kind(), "message": e.public_message() });
            println!("{}", body);
            ExitCode::FAILURE
        }
    }
}

/// The effective config and the dictionary path it resolves to. The path
/// is also stored in the config.
fn engine_config(cli: &Cli) -> Result<(EngineConfig, PathBuf), CliError> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let dictionary = cli
        .dictionary
        .clone()
        .or_else(|| config.dictionary_path.clone())
        .unwrap_or_else(|| PathBuf::from(DICTIONARY_PATH));
    config.dictionary_path = Some(dictionary.clone());
    if cli.case_sensitive {
        config.lowercase = false;
    }
    Ok((config, dictionary))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (config, dictionary) = engine_config(&cli)?;

    match cli.command {
        Commands::Build { entries, translations } => {
            let mut engine = DictionaryEngine::new(config.lowercase);
            engine.populate(read_entries(&entries)?, read_translations(&translations)?)?;
            engine.save(&dictionary)?;
            print_json(&json!({
                "success": true,
                "dictionary": dictionary.display().to_string(),
                "records": engine.translations().len(),
                "languages": engine.languages(),
            }));
        }
        Commands::Segment { symbols } => {
            let engine = DictionaryEngine::from_config(&config)?;
            let rows = engine.segment(&symbols)?;
            print_json(&json!({ "success": true, "result": rows }));
        }
        Commands::Search { mode, symbols } => {
            let engine = DictionaryEngine::from_config(&config)?;
            let mode: MatchMode = mode.parse()?;
            let hits = engine.entries_containing_sequence(&symbols, mode)?;
            print_json(&json!({ "success": true, "result": records_json(hits) }));
        }
        Commands::Translate { term, lang } => {
            let engine = DictionaryEngine::from_config(&config)?;
            let hits = engine.find_words_by_translation(&term, lang.as_deref())?;
            print_json(&json!({ "success": true, "result": records_json(hits) }));
        }
        Commands::Lookup { symbols } => {
            let engine = DictionaryEngine::from_config(&config)?;
            let outcome = engine.has_entry(&symbols)?;
            print_json(&json!({
                "success": true,
                "entry_ids": outcome.ids(),
                "last_matched": outcome.last_matched(),
            }));
        }
        Commands::Repl => {
            let engine = DictionaryEngine::from_config(&config)?;
            repl(&engine)?;
        }
    }
    Ok(())
}

fn print_json(value: &Value) {
    println!("{}", value);
}

fn records_json(hits: Vec<(&EntryId, &TranslationRecord)>) -> Value {
    Value::Array(
        hits.into_iter()
            .map(|(id, record)| json!({ "entry_id": id, "word": record.word, "translations": record.translations }))
            .collect(),
    )
}

fn read_json_object(path: &Path) -> Result<Map<String, Value>, CliError> {
    let input_error = |message: String| CliError::Input { path: path.to_path_buf(), message };
    let text = std::fs::read_to_string(path).map_err(|e| input_error(e.to_string()))?;
    match serde_json::from_str::<Value>(&text).map_err(|e| input_error(e.to_string()))? {
        Value::Object(map) => Ok(map),
        _ => Err(input_error("expected a JSON object".to_string())),
    }
}

fn read_entries(path: &Path) -> Result<Vec<(EntryId, Vec<String>)>, CliError> {
    read_json_object(path)?
        .into_iter()
        .map(|(key, value)| {
            let symbols: Vec<String> = serde_json::from_value(value).map_err(|e| CliError::Input {
                path: path.to_path_buf(),
                message: format!("entry '{}': {}", key, e),
            })?;
            Ok((EntryId::Str(key), symbols))
        })
        .collect()
}

fn read_translations(path: &Path) -> Result<Vec<(EntryId, TranslationRecord)>, CliError> {
    read_json_object(path)?
        .into_iter()
        .map(|(key, value)| {
            let record: TranslationRecord = serde_json::from_value(value).map_err(|e| CliError::Input {
                path: path.to_path_buf(),
                message: format!("translation '{}': {}", key, e),
            })?;
            Ok((EntryId::Str(key), record))
        })
        .collect()
}

fn repl(engine: &DictionaryEngine) -> io::Result<()> {
    println!("{}", "Glyph dictionary. Enter symbols separated by spaces, 'exit' to quit.".bold());
    println!("Languages: {}", engine.languages().join(", "));
    print!("> ");
    stdout().flush()?;

    for line in stdin().lock().lines() {
        let line = line?;
        let symbols: Vec<&str> = line.split_whitespace().collect();
        match symbols.as_slice() {
            ["exit"] => break,
            [] => {}
            _ => match engine.segment(&symbols) {
                Ok(rows) if rows.is_empty() => println!("{}", "No entries found.".dark_grey()),
                Ok(rows) => print_rows(&rows),
                Err(e) => println!("{} {}", "error:".red(), e),
            },
        }
        print!("> ");
        stdout().flush()?;
    }
    Ok(())
}

fn print_rows(rows: &[SegmentRow]) {
    for row in rows {
        println!(
            "  [{}..{}] {} {}",
            row.span[0],
            row.span[1],
            row.sequence.join(" ").green(),
            format!("({})", row.transliteration).cyan()
        );
        for t in &row.translations {
            println!("      {}: {}", t.locale.as_str().yellow(), t.translation);
        }
    }
}
