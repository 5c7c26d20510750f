use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kd_collector::Collector;
use kd_core::logging::init_logging;
use kd_core::{Credentials, DigestConfig, DigestDocument};
use kd_inference::{create_model, Summarizer};
use kd_mail::{Dispatcher, SmtpMailer};
use kd_render::Renderer;
use tracing::{error, info};

mod pipeline;

use pipeline::Pipeline;

#[derive(Parser, Debug)]
#[command(name = "kea-digest", author, version, about = "Weekly energy news digest for KEA members", long_about = None)]
pub struct Cli {
    /// JSON file overriding the built-in configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Collect, summarize, render and email the digest (default)
    Run {
        /// Stop after rendering the PDF
        #[arg(long)]
        no_send: bool,
        /// Also write the generated digest JSON to this file
        #[arg(long)]
        save_digest: Option<PathBuf>,
        #[arg(long, default_value = "gemini", help = "Model to use. Available models: gemini (default), dummy")]
        model: String,
    },
    /// Print collected articles as JSON
    Collect,
    /// Render a saved digest JSON to PDF
    Render {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            no_send: false,
            save_digest: None,
            model: "gemini".to_string(),
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DigestConfig> {
    match path {
        Some(path) => DigestConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(DigestConfig::default()),
    }
}

async fn run(config: &DigestConfig, no_send: bool, save_digest: Option<PathBuf>, model: &str) -> anyhow::Result<()> {
    let needs_credentials = model == "gemini" || !no_send;
    let credentials = if needs_credentials {
        Some(Credentials::from_env().context("missing credentials")?)
    } else {
        None
    };
    info!(
        "Configuration: {} feeds, {} scrape targets, model {}",
        config.feeds.len(),
        config.scrape_targets.len(),
        model
    );

    let model = create_model(model, &config.model, credentials.as_ref().map(|c| c.api_key.clone()))?;
    let mut pipeline = Pipeline::new(
        Collector::new(config).context("failed to build collector")?,
        Summarizer::new(model),
        Renderer::new(config),
    )
    .with_saved_digest(save_digest);

    if let Some(credentials) = credentials.filter(|_| !no_send) {
        let mailer = SmtpMailer::new(&config.smtp, &credentials.mail_user, &credentials.mail_password)?;
        pipeline = pipeline.with_dispatcher(Dispatcher::new(
            &config.branding,
            &credentials.mail_user,
            &credentials.recipients,
            Arc::new(mailer),
        ));
    }

    let report = pipeline.run().await.context("digest run failed")?;
    info!(
        "🎉 {} articles, {} page(s) at {}",
        report.article_count,
        report.output.page_count,
        report.output.path.display()
    );
    Ok(())
}

async fn collect(config: &DigestConfig) -> anyhow::Result<()> {
    let articles = Collector::new(config)?.collect().await;
    println!("{}", serde_json::to_string_pretty(&articles)?);
    Ok(())
}

fn render(config: &DigestConfig, input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let digest: DigestDocument = serde_json::from_str(&raw).context("input is not a digest JSON")?;

    let renderer = Renderer::new(config);
    let rendered = match output {
        Some(path) => renderer.render_to(&digest, &path)?,
        None => renderer.render(&digest)?,
    };
    println!("{}", rendered.path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let result = match cli.command.unwrap_or_default() {
        Commands::Run {
            no_send,
            save_digest,
            model,
        } => run(&config, no_send, save_digest, &model).await,
        Commands::Collect => collect(&config).await,
        Commands::Render { input, output } => render(&config, &input, output),
    };

    if let Err(e) = &result {
        error!("❌ {:#}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::parse_from(["kea-digest"]);
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Run { no_send: false, save_digest: None, ref model } if model == "gemini"
        ));
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["kea-digest", "--verbose", "run", "--no-send", "--model", "dummy"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Run { no_send: true, ref model, .. }) if model == "dummy"));

        let cli = Cli::parse_from(["kea-digest", "render", "--input", "d.json", "--config", "c.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert!(matches!(cli.command, Some(Commands::Render { output: None, .. })));
    }

    #[test]
    fn test_missing_config_file_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/kea.json"))).is_err());
        assert!(load_config(None).is_ok());
    }
}
