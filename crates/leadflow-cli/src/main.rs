//! Leadflow: enrich, score, draft, send and report on a CSV of sales leads.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use leadflow_core::{
    config::{DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_REPORT},
    PipelineConfig, SmtpSettings, TokenBudgets,
};
use leadflow_llm::{HttpCompletionClient, LLMConfig, LLMConfigUpdate};
use leadflow_mail::SmtpMailer;
use leadflow_runtime::{write_report, Pipeline, RunSummary};
use leadflow_store::LeadTable;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "leadflow")]
#[command(version, about = "Lead enrichment and outreach pipeline")]
struct Args {
    /// Lead table to read.
    #[arg(long = "csv", alias = "input", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the processed lead table.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Where to write the markdown campaign report.
    #[arg(long, default_value = DEFAULT_REPORT)]
    report: PathBuf,

    #[arg(long, env = "SMTP_HOST", default_value = "localhost")]
    smtp_host: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = 1025)]
    smtp_port: u16,

    #[arg(long, env = "FROM_ADDR", default_value = "noreply@example.com")]
    from_addr: String,

    /// groq, openai, anthropic or auto.
    #[arg(long, env = "LEADFLOW_PROVIDER")]
    provider: Option<String>,

    #[arg(long, env = "LEADFLOW_MODEL")]
    model: Option<String>,

    /// Credential for the selected provider. Falls back to the provider's
    /// usual environment variable (e.g. GROQ_API_KEY).
    #[arg(long)]
    api_key: Option<String>,

    /// JSON file with provider keys, models and defaults.
    #[arg(long)]
    llm_config: Option<PathBuf>,

    /// Completion request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Sampling temperature for completions.
    #[arg(long)]
    temperature: Option<f64>,

    /// Pause after each lead, in milliseconds.
    #[arg(long, default_value_t = 500)]
    pause_ms: u64,

    /// Seed for reply simulation.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 128)]
    stage_tokens: usize,

    #[arg(long, default_value_t = 256)]
    report_tokens: usize,

    /// Check the completion backend before processing any lead.
    #[arg(long)]
    preflight: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input: self.input.clone(),
            output: self.out.clone(),
            report: self.report.clone(),
            smtp: SmtpSettings {
                host: self.smtp_host.clone(),
                port: self.smtp_port,
                from: self.from_addr.clone(),
                ..SmtpSettings::default()
            },
            budgets: TokenBudgets {
                stage: self.stage_tokens,
                report: self.report_tokens,
            },
            pause_ms: self.pause_ms,
            seed: self.seed,
        }
    }

    fn llm_update(&self) -> LLMConfigUpdate {
        LLMConfigUpdate {
            preferred_provider: self.provider.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args, |name| std::env::var(name).ok()).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Run aborted: {:#}", e);
            Err(e)
        }
    }
}

/// Wire everything up and process the table. Initialization failures return
/// before the input is read; `env` supplies provider credentials.
async fn run(args: Args, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<RunSummary> {
    let config = args.pipeline_config();
    config.validate().context("invalid configuration")?;

    let mut llm = LLMConfig::load_with_env(args.llm_config.as_deref(), env)
        .context("loading LLM config")?;
    llm.apply_update(&args.llm_update());
    let client = HttpCompletionClient::from_config(&llm).context("initializing completion client")?;

    if args.preflight {
        client
            .preflight()
            .await
            .with_context(|| format!("preflight against {} failed", client.provider()))?;
        info!("Preflight ok: {} / {}", client.provider(), client.model());
    }

    let mailer = SmtpMailer::new(&config.smtp).context("initializing SMTP mailer")?;
    info!("Delivering via {}", mailer.endpoint());

    let table = LeadTable::load(&config.input)
        .with_context(|| format!("reading leads from {}", config.input.display()))?;

    let progress = ProgressBar::new(table.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_message("Processing leads");

    let mut pipeline = Pipeline::new(client, mailer, &config);
    let mut failed = 0;
    let (leads, summary) = pipeline
        .run_with(table.leads().to_vec(), |outcome| {
            if outcome.is_failed() {
                failed += 1;
                progress.set_message(format!("Processing leads ({failed} failed)"));
            }
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    table
        .with_leads(leads.clone())
        .save(&config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;
    write_report(pipeline.client(), &leads, config.budgets.report, &config.report)
        .await
        .with_context(|| format!("writing {}", config.report.display()))?;

    println!("{summary}");
    for failure in &summary.failures {
        println!(
            "  row {} ({}): {} failed: {}",
            failure.index + 1,
            failure.email,
            failure.stage,
            failure.reason
        );
    }
    println!("Output: {}", config.output.display());
    println!("Report: {}", config.report.display());
    Ok(summary)
}
