use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use is_terminal::IsTerminal;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smart_study::config::{find_config_file, get_config, load_config, Config};
use smart_study::generator::{Generated, GenerationError, StudyGenerator};
use smart_study::models::{Attribution, StudyMode, StudyPayload, StudyRequest};
use smart_study::reference::{ReferenceSource, WikipediaSource};
use smart_study::{ai, answer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Smart Study - Generate study packages (summaries, quizzes, practice
/// questions) for any topic with Wikipedia-sourced material
#[derive(Parser, Debug)]
#[command(name = "smart-study")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate study packages for any topic", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
}

impl OutputFormat {
    fn resolve(self) -> OutputFormat {
        match self {
            OutputFormat::Auto => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Table
                } else {
                    OutputFormat::Json
                }
            }
            other => other,
        }
    }
}

/// Generation mode
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Summary, quiz and study tip
    Standard,
    /// One quantitative question (requires an AI credential)
    Math,
}

impl From<Mode> for StudyMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Standard => StudyMode::Standard,
            Mode::Math => StudyMode::Math,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a study package for a topic
    Generate {
        /// Topic to study
        topic: String,

        /// Generation mode
        #[arg(long, value_enum, default_value_t = Mode::Standard)]
        mode: Mode,
    },
    /// Fetch and print the normalized reference document for a topic
    Fetch {
        /// Topic to look up
        topic: String,
    },
    /// Check a free-text answer against the expected answer
    CheckAnswer {
        /// The answer to check
        answer: String,

        /// The expected (canonical) answer
        expected: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("smart_study={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in the default location
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        get_config()
    };

    let format = cli.output.resolve();

    match cli.command {
        Commands::Generate { topic, mode } => {
            run_generate(&config, &topic, mode.into(), format).await
        }
        Commands::Fetch { topic } => run_fetch(&topic, format).await,
        Commands::CheckAnswer { answer, expected } => run_check_answer(&answer, &expected, format),
    }
}

async fn run_generate(
    config: &Config,
    topic: &str,
    mode: StudyMode,
    format: OutputFormat,
) -> Result<()> {
    let topic = topic.trim();
    if topic.is_empty() {
        anyhow::bail!("A non-empty topic is required");
    }

    let source = WikipediaSource::new()?;
    let document = match source.fetch_summary(topic).await {
        Ok(Some(document)) => document,
        Ok(None) => {
            eprintln!("We could not find any information for “{}”.", topic);
            std::process::exit(2);
        }
        Err(error) => {
            tracing::error!(%error, topic, "reference fetch failed");
            eprintln!("Something went wrong while preparing your study materials. Please try again.");
            std::process::exit(1);
        }
    };

    let client = ai::shared_client(&config.ai);
    if client.is_none() {
        tracing::debug!("no AI credential configured; the rule-based generator will be used");
    }

    let generator = StudyGenerator::new(client);
    let request = StudyRequest::new(topic, mode);
    let mut rng = StdRng::from_entropy();

    match generator.generate(&request, &document, &mut rng).await {
        Ok(generated) => print_package(&generated, &document.attribution, format),
        Err(GenerationError::MathModeRequiresAi) => {
            eprintln!(
                "Math mode requires a configured Gemini API key. Set GEMINI_API_KEY and try again."
            );
            std::process::exit(3);
        }
        Err(error) => {
            tracing::error!(%error, topic, "generation failed");
            eprintln!("Something went wrong while preparing your study materials. Please try again.");
            std::process::exit(1);
        }
    }
}

async fn run_fetch(topic: &str, format: OutputFormat) -> Result<()> {
    let topic = topic.trim();
    if topic.is_empty() {
        anyhow::bail!("A non-empty topic is required");
    }

    let source = WikipediaSource::new()?;
    let document = match source.fetch_summary(topic).await {
        Ok(Some(document)) => document,
        Ok(None) => {
            eprintln!("We could not find any information for “{}”.", topic);
            std::process::exit(2);
        }
        Err(error) => {
            tracing::error!(%error, topic, "reference fetch failed");
            eprintln!("Something went wrong while fetching reference material. Please try again.");
            std::process::exit(1);
        }
    };

    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.add_row(vec!["Title".to_string(), document.title.clone()]);
            table.add_row(vec!["Description".to_string(), document.description.clone()]);
            table.add_row(vec![
                "Sentences".to_string(),
                document.sentences.len().to_string(),
            ]);
            table.add_row(vec!["Extract".to_string(), document.extract.clone()]);
            table.add_row(vec!["Source".to_string(), document.attribution.url.clone()]);
            println!("{}", table);
        }
    }
    Ok(())
}

fn run_check_answer(answer_text: &str, expected: &str, format: OutputFormat) -> Result<()> {
    let matched = answer::equivalent(answer_text, expected);

    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::json!({ "equivalent": matched }));
        }
        OutputFormat::Table => {
            println!(
                "{}",
                if matched {
                    "Answers match."
                } else {
                    "Answers differ."
                }
            );
        }
    }

    if !matched {
        std::process::exit(1);
    }
    Ok(())
}

fn print_package(
    generated: &Generated,
    attribution: &Attribution,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            let mut value = serde_json::to_value(&generated.package)?;
            if let Some(object) = value.as_object_mut() {
                object.insert(
                    "sourceAttribution".to_string(),
                    serde_json::to_value(attribution)?,
                );
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => print_package_table(generated, attribution),
    }
    Ok(())
}

fn print_package_table(generated: &Generated, attribution: &Attribution) {
    let package = &generated.package;
    println!("Topic: {} ({} mode)", package.topic, package.mode);

    match &package.payload {
        StudyPayload::Standard {
            summary,
            quiz,
            study_tip,
        } => {
            let mut summary_table = Table::new();
            summary_table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "Summary"]);
            for (index, entry) in summary.iter().enumerate() {
                summary_table.add_row(vec![(index + 1).to_string(), entry.clone()]);
            }
            println!("{}", summary_table);

            let mut quiz_table = Table::new();
            quiz_table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Question", "Options", "Answer"]);
            for question in quiz {
                let options = question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(index, option)| format!("{}. {}", option_letter(index), option))
                    .collect::<Vec<_>>()
                    .join("\n");
                quiz_table.add_row(vec![
                    question.prompt.clone(),
                    options,
                    option_letter(question.correct_index).to_string(),
                ]);
            }
            println!("{}", quiz_table);

            println!("Study tip: {}", study_tip);
        }
        StudyPayload::Math {
            question,
            answer,
            explanation,
        } => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.add_row(vec!["Question", question.as_str()]);
            table.add_row(vec!["Answer", answer.as_str()]);
            table.add_row(vec!["Explanation", explanation.as_str()]);
            println!("{}", table);
        }
    }

    println!("Source: {} ({})", attribution.source, attribution.url);
}

fn option_letter(index: usize) -> char {
    (b'A' + (index as u8).min(25)) as char
}
