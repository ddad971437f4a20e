//! Core application

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::{AppConfig, OutputConfig};
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::data::{TraceDocuments, load_documents_from_path};
use crate::data::types::TraceSpan;
use crate::domain::timeline::{build_timeline, format_duration, summarize_trace};

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;
        app.execute(&command)
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self { config })
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        // stdout carries the JSON output
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    fn execute(&self, command: &Commands) -> Result<()> {
        let documents = self.load(command.file())?;
        let mut roots = documents.to_span_tree();

        tracing::info!(
            format = documents.kind().as_str(),
            documents = documents.len(),
            roots = roots.len(),
            "Normalized trace"
        );

        match command {
            Commands::Convert { .. } => {
                apply_output_options(&mut roots, &self.config.output);
                self.write_json(&roots)
            }
            Commands::Timeline { .. } => write_timeline(&roots),
            Commands::Summary { .. } => self.write_json(&summarize_trace(&roots)),
        }
    }

    fn load(&self, file: &str) -> Result<TraceDocuments> {
        load_documents_from_path(file, self.config.input.format).map_err(|e| {
            let what = if e.is_malformed_input() {
                "Invalid trace input"
            } else {
                "Failed to read trace input"
            };
            anyhow::Error::new(e).context(format!("{what}: {file}"))
        })
    }

    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        let json = if self.config.output.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
        .context("Failed to serialize output")?;

        let mut out = std::io::stdout().lock();
        writeln!(out, "{json}").context("Failed to write output")
    }
}

/// Blank `raw` and drop `attributes` across the whole forest, as configured
fn apply_output_options(roots: &mut [TraceSpan], output: &OutputConfig) {
    if output.include_raw && output.include_attributes {
        return;
    }

    let mut stack: Vec<&mut TraceSpan> = roots.iter_mut().collect();
    while let Some(span) = stack.pop() {
        if !output.include_raw {
            span.raw.clear();
        }
        if !output.include_attributes {
            span.attributes = None;
        }
        stack.extend(span.children.iter_mut());
    }
}

fn write_timeline(roots: &[TraceSpan]) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for row in build_timeline(roots) {
        writeln!(
            out,
            "{indent}{title}  [{category}] {duration}  start {start:.1}%  width {width:.1}%  ({id})",
            indent = "  ".repeat(row.depth),
            title = row.span.title,
            category = row.span.category.as_str(),
            duration = format_duration(row.timeline.duration_ms),
            start = row.timeline.start_percent,
            width = row.timeline.width_percent,
            id = row.span.id,
        )
        .context("Failed to write output")?;
    }
    Ok(())
}
