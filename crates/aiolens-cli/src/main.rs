use std::fs;
use std::path::{Path, PathBuf};

use aiolens_cli::{
    FileResponseClient, LlmSettings, NullDetector, OpenAiClient, OutputFormat, build_output_path,
    fetch_html, read_html, render_consistency, write_report,
};
use aiolens_core::url_utils::normalize_target;
use aiolens_core::{AnalysisConfig, AnalysisEngine, AnalysisReport, Balance, LlmClient};
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Audit a web page for SEO and generative-AI search readiness
#[derive(Parser, Debug)]
#[command(name = "aiolens", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a page and print the report
    Analyze(AnalyzeArgs),
    /// Recompute the consistency check of a saved JSON report
    Validate {
        /// Report written by `analyze --save`
        report: PathBuf,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Page URL; `https://` is assumed when no scheme is given
    url: String,

    /// Industry the site belongs to
    #[arg(short, long)]
    industry: Option<String>,

    /// Percent weight on AIO in the integrated score (0-100)
    #[arg(short, long, default_value = "50", env = "AIOLENS_BALANCE")]
    balance: i64,

    /// Read the page from a local file instead of fetching it
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Use a stored LLM reply instead of calling the API
    #[arg(long, value_name = "FILE")]
    llm_response: Option<PathBuf>,

    #[arg(long, default_value = "gpt-4o-mini", env = "AIOLENS_MODEL")]
    model: String,

    #[arg(long, default_value = "https://api.openai.com/v1", env = "AIOLENS_API_BASE")]
    api_base: String,

    #[arg(long, default_value = "0.3")]
    temperature: f32,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Save the JSON report; PATH is a directory or a .json file
    #[arg(short, long, value_name = "PATH", num_args = 0..=1, default_missing_value = ".")]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aiolens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Validate { report, format } => validate(&report, format),
    }
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    let balance = Balance::new(args.balance)?;
    let target = normalize_target(&args.url);
    let parsed_url = Url::parse(&target).with_context(|| format!("invalid URL {target}"))?;

    let html = match args.html.as_deref() {
        Some(path) => read_html(path)?,
        None => fetch_html(parsed_url.as_str())?,
    };

    let llm: Box<dyn LlmClient> = match args.llm_response {
        Some(path) => Box::new(FileResponseClient::new(path)),
        None => {
            let Some(api_key) = args.api_key.filter(|key| !key.trim().is_empty()) else {
                bail!("OPENAI_API_KEY is not set; pass --api-key or --llm-response FILE");
            };
            Box::new(OpenAiClient::new(LlmSettings {
                api_base: args.api_base,
                api_key,
                model: args.model,
                temperature: args.temperature,
            })?)
        }
    };

    let engine = AnalysisEngine::new(NullDetector, llm)
        .with_config(AnalysisConfig::with_balance(balance));
    let report = engine
        .analyze_html(parsed_url.as_str(), &html, args.industry.as_deref())
        .with_context(|| format!("analysis of {parsed_url} failed"))?;

    let output = args.format.renderer().render(&report)?;
    print!("{output}");

    if let Some(save_base) = args.save {
        let output_path = build_output_path(&save_base, &parsed_url);
        let json = OutputFormat::Json.renderer().render(&report)?;
        write_report(&output_path, &json)?;
        info!(path = %output_path.display(), "saved report");
        eprintln!("Wrote report to {}", output_path.display());
    }

    Ok(())
}

fn validate(path: &Path, format: OutputFormat) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let report: AnalysisReport = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not an aiolens report", path.display()))?;

    let recomputed = report.recheck();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recomputed)?);
        }
        OutputFormat::Text => {
            let mut out = String::new();
            render_consistency(&mut out, &recomputed);
            print!("{out}");
        }
    }
    Ok(())
}
