use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use sautibench_core::config::{Config, DEFAULT_CONFIG_PATH};
use sautibench_core::eval::{EvalEvent, Evaluator, PairOutcome};
use sautibench_core::matrix::SupportMatrix;
use sautibench_core::models::ModelManager;
use sautibench_core::results::ResultsWriter;
use sautibench_core::scrape::Scraper;
use sautibench_core::transcribe::{ModelCache, WhisperFactory};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application-specific environment variable for log filtering (overrides config).
const LOG_ENV_VAR: &str = "SAUTIBENCH_LOG";

#[derive(Parser)]
#[command(name = "sautibench")]
#[command(about = "ASR benchmarking for African languages - hub support scraping and WER/CER evaluation")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the model hub and write the language support matrix
    Scrape {
        /// Override the matrix output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate supported (language, model) pairs and append WER/CER results
    Eval {
        /// Support matrix to consume (defaults to the configured path)
        #[arg(long)]
        matrix: Option<PathBuf>,
        /// Override the results output path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory for downloaded model weights
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    init_logging(&config)?;

    match cli.command {
        Commands::Scrape { output } => run_scrape(&config, output).await,
        Commands::Eval {
            matrix,
            output,
            models_dir,
        } => run_eval(&config, matrix, output, models_dir).await,
    }
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    // SAUTIBENCH_LOG env var overrides config file level
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(config.logging.level.as_directive().parse()?)
        .from_env()?
        .add_directive("sautibench=info".parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

async fn run_scrape(config: &Config, output: Option<PathBuf>) -> anyhow::Result<()> {
    println!(
        "Querying registry for {} target languages...",
        config.languages.len()
    );

    let scraper = Scraper::new(config)?;
    let matrix = scraper.build_matrix().await.context("Scrape failed")?;

    let path = output.unwrap_or_else(|| config.output.matrix_path.clone());
    matrix.write(&path)?;

    println!(
        "Wrote support matrix with {} models to {}",
        matrix.models().len(),
        path.display()
    );
    for language in matrix.languages() {
        println!(
            "  {language}: {} models claim support",
            matrix.supported_model_count(language)
        );
    }

    Ok(())
}

async fn run_eval(
    config: &Config,
    matrix_path: Option<PathBuf>,
    output: Option<PathBuf>,
    models_dir: PathBuf,
) -> anyhow::Result<()> {
    let matrix_path = matrix_path.unwrap_or_else(|| config.output.matrix_path.clone());
    let mut matrix = SupportMatrix::load(&matrix_path)?;

    // Resolve weights up front; models that can't be fetched stay out of the
    // factory and their pairs get recorded as failed by the evaluator.
    let manager = ModelManager::new(models_dir);
    let mut factory = WhisperFactory::new();
    for model_id in matrix.models().to_vec() {
        if matrix.supported_languages(&model_id).is_empty() {
            continue;
        }
        match manager
            .ensure_model(&model_id, config.eval.model_file(&model_id))
            .await
        {
            Ok(path) => factory.insert(model_id, path),
            Err(err) => tracing::warn!(
                model = %model_id,
                error = %format!("{err:#}"),
                "Model weights unavailable, its pairs will be recorded as failed"
            ),
        }
    }

    let mut cache = ModelCache::new(Box::new(factory));
    let evaluator = Evaluator::new(config);

    let mut bar: Option<ProgressBar> = None;
    let outcomes = evaluator.run(&mut matrix, &mut cache, |event| match event {
        EvalEvent::PairStarted {
            language,
            model,
            total_utterances,
        } => {
            let pb = ProgressBar::new(total_utterances as u64);
            pb.set_style(
                ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                    .expect("valid progress template")
                    .progress_chars("=> "),
            );
            pb.set_message(format!("{language} / {model}"));
            bar = Some(pb);
        }
        EvalEvent::UtteranceDone { done, .. } => {
            if let Some(pb) = &bar {
                pb.set_position(done as u64);
            }
        }
        EvalEvent::PairFinished { outcome } => {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
            print_outcome(outcome);
        }
    });

    let results_path = output.unwrap_or_else(|| config.output.results_path.clone());
    ResultsWriter::new(&results_path)
        .append(&outcomes)
        .context("Failed to append results")?;
    // Persist failure annotations picked up during the batch
    matrix
        .write(&matrix_path)
        .context("Failed to write back matrix annotations")?;

    let scored = outcomes
        .iter()
        .filter(|o| matches!(o, PairOutcome::Scored(_)))
        .count();
    println!(
        "\n{} pairs processed ({scored} scored), results appended to {}",
        outcomes.len(),
        results_path.display()
    );

    Ok(())
}

fn print_outcome(outcome: &PairOutcome) {
    match outcome {
        PairOutcome::Scored(result) => println!(
            "{:<10} {:<45} WER {:.3}  CER {:.3}  ({} utterances)",
            result.language, result.model, result.wer, result.cer, result.sample_count
        ),
        PairOutcome::Failed {
            language,
            model,
            note,
        } => println!("{language:<10} {model:<45} FAILED: {note}"),
        PairOutcome::Skipped {
            language,
            model,
            note,
        } => println!("{language:<10} {model:<45} skipped: {note}"),
    }
}
