// src/config.rs
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::formatting::{PostProcessor, RenderOptions};
use crate::types::{ApiKey, PageId, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables consulted for the integration secret, in order.
pub const TOKEN_VARIABLES: [&str; 2] = ["NOTION_TOKEN", "NOTION_API_KEY"];

/// Comma or whitespace separated page ids used when none are given as
/// arguments.
pub const PAGE_IDS_VARIABLE: &str = "NOTION_PAGE_IDS";

/// Parsed command-line input, before validation.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URLs or IDs to export (falls back to NOTION_PAGE_IDS)
    pub pages: Vec<String>,

    /// Directory receiving one markdown file per page
    #[arg(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Write child pages as separate documents
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub separate_child_pages: bool,

    /// Retries after the first failed attempt of each API call
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub initial_delay_ms: u64,

    /// Backoff ceiling in milliseconds (at most 30000)
    #[arg(long, default_value_t = 30000)]
    pub max_delay_ms: u64,

    /// Items requested per page of a paginated listing (1-100)
    #[arg(long, default_value_t = 100)]
    pub page_size: u32,

    /// Append readable names to common emoji
    #[arg(long, default_value_t = false)]
    pub label_emojis: bool,

    /// Print documents to stdout instead of writing files
    #[arg(short = 'p', long, default_value_t = false)]
    pub stdout: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Validated configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub api_key: ApiKey,
    pub page_ids: Vec<PageId>,
    pub output_dir: PathBuf,
    pub retry_policy: RetryPolicy,
    pub page_size: u32,
    pub render_options: RenderOptions,
    pub label_emojis: bool,
    pub stdout: bool,
    pub verbose: bool,
}

impl ExportConfig {
    /// Resolves a configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |name| std::env::var(name).ok())
    }

    /// Same as [`ExportConfig::resolve`] with an explicit variable lookup.
    pub fn resolve_with(
        cli: CommandLineInput,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let token = TOKEN_VARIABLES
            .iter()
            .find_map(|name| env(name).filter(|value| !value.trim().is_empty()))
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "set {} (or {}) to the integration secret",
                    TOKEN_VARIABLES[0], TOKEN_VARIABLES[1]
                ))
            })?;
        let api_key = ApiKey::new(token.trim())?;

        let raw_ids = if cli.pages.is_empty() {
            env(PAGE_IDS_VARIABLE)
                .map(|value| split_id_list(&value))
                .unwrap_or_default()
        } else {
            cli.pages.clone()
        };
        if raw_ids.is_empty() {
            return Err(AppError::MissingConfiguration(format!(
                "no pages given; pass page ids or set {}",
                PAGE_IDS_VARIABLE
            )));
        }
        let page_ids = raw_ids
            .iter()
            .map(|raw| PageId::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        if cli.page_size == 0 || cli.page_size > NOTION_API_PAGE_SIZE {
            return Err(ValidationError::OutOfBounds {
                value: cli.page_size.into(),
                min: 1,
                max: NOTION_API_PAGE_SIZE.into(),
            }
            .into());
        }

        Ok(Self {
            api_key,
            page_ids,
            output_dir: cli.output_dir,
            retry_policy: RetryPolicy::new(
                cli.max_retries,
                Duration::from_millis(cli.initial_delay_ms),
                Duration::from_millis(cli.max_delay_ms),
            ),
            page_size: cli.page_size,
            render_options: RenderOptions {
                separate_child_pages: cli.separate_child_pages,
            },
            label_emojis: cli.label_emojis,
            stdout: cli.stdout,
            verbose: cli.verbose,
        })
    }

    pub fn post_processor(&self) -> PostProcessor {
        let processor = PostProcessor::standard();
        if self.label_emojis {
            processor.with_emoji_labels()
        } else {
            processor
        }
    }
}

fn split_id_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
