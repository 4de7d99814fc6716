use anyhow::{anyhow, Context, Result};
use clap::Parser;
use inference::{ExplainerConfig, InferenceReport, OnnxSentimentModel, SentimentExplainer};
use reviewlens_preprocessing::Vocabulary;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

mod output;
mod samples;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explain sentiment predictions for movie reviews", long_about = None)]
struct Args {
    /// Vocabulary file (word-to-index mapping)
    #[arg(long, default_value = "assets/imdb_vocabulary.json")]
    vocab: PathBuf,

    /// ONNX sentiment classifier
    #[arg(long, default_value = "assets/review_classifier.onnx")]
    model: PathBuf,

    /// Review text to analyze
    #[arg(long)]
    text: Option<String>,

    /// Read the review text from a file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Use one of the built-in sample reviews (1-4)
    #[arg(long)]
    sample: Option<usize>,

    /// Override the model's sequence length
    #[arg(long)]
    maxlen: Option<usize>,

    /// Override the decision threshold
    #[arg(long)]
    threshold: Option<f64>,

    /// Override how many top attributions to report
    #[arg(long)]
    top: Option<usize>,

    /// Abort the analysis after this many seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Write the JSON report to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    info!("Starting review sentiment explainer");
    info!("Vocabulary: {:?}", args.vocab);
    info!("Model: {:?}", args.model);

    let vocabulary = Arc::new(Vocabulary::from_json_file(&args.vocab)?);

    let mut config = ExplainerConfig::from_env_or_default();
    if let Some(maxlen) = args.maxlen {
        config.maxlen = maxlen;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(top) = args.top {
        config.top_attributions = top;
    }

    let explainer = Arc::new(SentimentExplainer::new(vocabulary, config)?);
    let oracle = Arc::new(OnnxSentimentModel::new(&args.model)?);

    let text = read_input(&args)?;
    let request_id = Uuid::new_v4();
    info!("Request {}: analyzing {} bytes of input", request_id, text.len());

    let mut formatter = output::ResultFormatter::new();
    let timeout = Duration::from_secs(args.timeout_secs);

    match run_request(Arc::clone(&explainer), oracle, text, timeout).await {
        Ok(report) => {
            formatter.display_report(&report, explainer.vocabulary());
            emit_json(&report, &args)?;
            info!("Request {} complete", request_id);
            Ok(())
        }
        Err(error) => {
            formatter.display_error(&error);
            Err(error)
        }
    }
}

/// Run the blocking explanation off the async runtime, bounded by the
/// timeout. A timed-out request yields no partial report.
async fn run_request(
    explainer: Arc<SentimentExplainer>,
    oracle: Arc<OnnxSentimentModel>,
    text: String,
    timeout: Duration,
) -> Result<InferenceReport> {
    let task = tokio::task::spawn_blocking(move || explainer.explain(&text, oracle.as_ref()));

    match tokio::time::timeout(timeout, task).await {
        Err(_) => Err(inference::InferenceError::Oracle(format!(
            "analysis timed out after {}s, no report was produced",
            timeout.as_secs()
        ))
        .into()),
        Ok(joined) => Ok(joined.context("analysis task panicked")??),
    }
}

fn read_input(args: &Args) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read review from {:?}", path));
    }
    if let Some(number) = args.sample {
        return samples::sample_review(number)
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "sample {} does not exist, choose 1-{}",
                    number,
                    samples::SAMPLE_REVIEWS.len()
                )
            });
    }

    info!("Reading review text from stdin");
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read review from stdin")?;
    Ok(text)
}

fn emit_json(report: &InferenceReport, args: &Args) -> Result<()> {
    let json = if args.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json()?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write report to {:?}", path))?;
            info!("Report written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
