// src/main.rs
use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2pandoc::{
    deliver, plan_files, plan_stdout, CommandLineInput, ExportConfig, ExportReport, Exporter,
    NotionHttpClient, NotionRepository, ResilientRepository,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion2pandoc.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // Progress goes to stderr so `--stdout` output stays clean.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Fetches, renders and post-processes every configured page.
async fn export(config: &ExportConfig) -> anyhow::Result<ExportReport> {
    let client: Arc<dyn NotionRepository> = Arc::new(
        NotionHttpClient::new(&config.api_key).context("failed to build the Notion client")?,
    );
    let source = ResilientRepository::new(client, config.retry_policy, config.page_size);
    let exporter = Exporter::new(source, config.render_options, config.post_processor());

    Ok(exporter.export_all(&config.page_ids).await)
}

/// Writes (or prints) every exported document.
fn write_documents(config: &ExportConfig, report: &ExportReport) -> anyhow::Result<()> {
    let plan = if config.stdout {
        plan_stdout(report)
    } else {
        plan_files(report, &config.output_dir)
    };

    let delivered = deliver(plan);
    if !delivered.is_success() {
        let failures: Vec<String> = delivered.failed.iter().map(|f| f.error.clone()).collect();
        return Err(notion2pandoc::AppError::DeliveryFailed { failures }.into());
    }

    if !config.stdout {
        log::info!(
            "Wrote {} file(s) to {}",
            delivered.written_files().len(),
            config.output_dir.display()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ExportConfig::resolve(cli).context("invalid configuration")?;

    let report = export(&config).await?;
    write_documents(&config, &report)?;

    log::info!("{}", report.summary());
    log::debug!("{}", report.summary_json());

    if report.exported.is_empty() && !report.failures.is_empty() {
        bail!("all {} page(s) failed to export", report.failures.len());
    }
    Ok(())
}
