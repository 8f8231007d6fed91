use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use postprep::config::Config;
use postprep::extractor::openai::OpenAiClient;
use postprep::extractor::topic::{TopicExtractor, UnexpectedFailurePolicy};
use postprep::loader::{load_posts, DEFAULT_CONTENT_COLUMN};
use postprep::output::terminal;
use postprep::pipeline::{process_posts, PipelineOptions};

/// postprep: Fine-tuning data preparation for LinkedIn post generation.
///
/// Loads posts from a CSV export, labels each with a short topic using a
/// language model, and writes prompt/completion pairs as JSON Lines.
#[derive(Parser)]
#[command(name = "postprep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: load, extract topics, format, write JSONL
    Prepare {
        /// CSV file with one post per row
        input: PathBuf,

        /// Where to write the training pairs (JSON Lines)
        output: PathBuf,

        /// Column holding the post text
        #[arg(long, default_value = DEFAULT_CONTENT_COLUMN)]
        column: String,

        #[command(flatten)]
        model: ModelArgs,

        /// Number of extraction requests in flight (default: 1)
        #[arg(long, default_value = "1")]
        concurrency: u32,

        /// What to do when a model response is unusable: degrade or propagate
        #[arg(long)]
        on_unexpected: Option<UnexpectedFailurePolicy>,
    },

    /// Load posts and preview them without calling the model
    Inspect {
        /// CSV file with one post per row
        input: PathBuf,

        /// Column holding the post text
        #[arg(long, default_value = DEFAULT_CONTENT_COLUMN)]
        column: String,

        /// Number of posts to show (default: 10)
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Extract the topic of a single piece of text
    Topic {
        /// The post text
        text: String,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print the training pair for a post and topic
    Pair {
        /// The post text
        post: String,

        /// The topic label
        topic: String,
    },
}

/// Model overrides shared by commands that call the API.
#[derive(clap::Args)]
struct ModelArgs {
    /// Model identifier (default: POSTPREP_MODEL or gpt-3.5-turbo)
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature (default: POSTPREP_TEMPERATURE or 0.2)
    #[arg(long)]
    temperature: Option<f32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("postprep=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            input,
            output,
            column,
            model,
            concurrency,
            on_unexpected,
        } => {
            let mut config = Config::load()?;
            config.require_api_key()?;
            apply_model_args(&mut config, &model);
            if let Some(policy) = on_unexpected {
                config.on_unexpected = policy;
            }

            let extractor = build_extractor(&config)?;
            info!(
                model = %config.model,
                temperature = config.temperature,
                policy = ?config.on_unexpected,
                "Starting preparation run"
            );

            println!("Preparing training data from {}...", input.display());
            let options = PipelineOptions {
                content_column: column,
                concurrency: concurrency.max(1) as usize,
                show_progress: true,
            };
            let summary = process_posts(&input, &output, &extractor, &options)
                .await
                .with_context(|| format!("Failed to prepare {}", input.display()))?;

            terminal::display_summary(&summary, &output.display().to_string());
        }

        Commands::Inspect {
            input,
            column,
            limit,
        } => {
            let posts = load_posts(&input, &column)?;
            terminal::display_posts_preview(&posts, limit);
        }

        Commands::Topic { text, model } => {
            let mut config = Config::load()?;
            config.require_api_key()?;
            apply_model_args(&mut config, &model);

            let extractor = build_extractor(&config)?;
            let topic = extractor.extract_topic(&text).await?;
            terminal::display_topic(&topic);
        }

        Commands::Pair { post, topic } => {
            let pair = postprep::formatter::create_training_pair(&post, &topic);
            terminal::display_training_pair(&pair)?;
            println!(
                "{}",
                "Run `postprep prepare <INPUT> <OUTPUT>` to build a full training file.".dimmed()
            );
        }
    }

    Ok(())
}

fn apply_model_args(config: &mut Config, args: &ModelArgs) {
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
}

/// Create the topic extractor backed by the configured chat-completions endpoint.
fn build_extractor(config: &Config) -> Result<TopicExtractor> {
    let client = OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        config.request_timeout,
    )?;
    Ok(TopicExtractor::new(
        Box::new(client),
        config.extraction_settings(),
    ))
}
