mod client;
mod config;
mod controller;
mod dates;
mod error;
mod filters;
mod models;
mod render;
mod schema;
mod tui;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client::ApiClient;
use config::Config;
use dates::DateFormatter;
use filters::{build_query, FilterState, MultiSelect, StatusFilter};
use models::{Field, Status};
use render::{TableBody, TableRenderer, TableView};
use schema::ColumnSchema;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Job listing triage - filter, review, and track saved postings")]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Browse,

    /// Fetch the job list once and print it
    List {
        /// Filter by status (all, viewed, new, shortlisted, longlisted, applied, archived)
        #[arg(short, long)]
        status: Option<String>,

        /// German fluency values to include (repeatable)
        #[arg(short, long)]
        german: Vec<String>,

        /// Seniority values to include (repeatable)
        #[arg(long)]
        seniority: Vec<String>,

        /// Search text
        #[arg(short, long)]
        query: Option<String>,

        /// Only jobs saved within this many days
        #[arg(short, long)]
        days: Option<u32>,

        /// Ask the backend to rebuild its cache first
        #[arg(long)]
        refresh: bool,
    },

    /// Change the status of a job
    SetStatus {
        /// Job filename as reported by the backend
        filename: String,

        /// New status
        status: Status,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        write: bool,
    },
}

/// Columns printed by `list`.
const LIST_FIELDS: &[Field] = &[
    Field::Status,
    Field::JobTitle,
    Field::Company,
    Field::Location,
    Field::LastModTime,
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Browse);
    init_logging(matches!(command, Commands::Browse))?;

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let mut config = Config::load(&config_path)?;
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }

    match command {
        Commands::Browse => {
            let api = ApiClient::new(&config.server.base_url, config.timeout())?;
            tui::run_dashboard(&config, api)?;
        }

        Commands::List {
            status,
            german,
            seniority,
            query,
            days,
            refresh,
        } => {
            let api = ApiClient::new(&config.server.base_url, config.timeout())?;
            let renderer = TableRenderer::new(
                ColumnSchema::default(),
                DateFormatter::new(config.display_zone()?),
                api.base_url().clone(),
            );

            let mut filters = FilterState::default();
            if let Some(status) = status {
                filters.status = StatusFilter::parse(&status)
                    .ok_or_else(|| anyhow!("Unknown status: {}", status))?;
            }
            filters.german = MultiSelect::from_values(german);
            filters.seniority = MultiSelect::from_values(seniority);
            filters.query = query.unwrap_or_default();
            filters.days_since_saved = days;
            if refresh {
                filters.request_cache_refresh();
            }

            let url = api.jobs_url(&build_query(&filters.take_snapshot()))?;
            let runtime = tokio::runtime::Runtime::new()?;
            match runtime.block_on(api.fetch_jobs(url.as_str())) {
                Ok(jobs) => print_view(&renderer.render(&jobs), renderer.schema()),
                Err(e) => {
                    print_view(&renderer.failed(), renderer.schema());
                    return Err(anyhow!(e).context("Failed to fetch jobs"));
                }
            }
        }

        Commands::SetStatus { filename, status } => {
            let api = ApiClient::new(&config.server.base_url, config.timeout())?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime
                .block_on(api.update_status(&filename, status))
                .context(controller::UPDATE_FAILED_ALERT)?;
            println!("Marked {} as {}", filename, status.label());
        }

        Commands::Config { write } => {
            if write {
                config.save(&config_path)?;
                println!("Config written to {}", config_path.display());
            } else {
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// The dashboard owns the terminal, so its logs go to a file.
fn init_logging(to_file: bool) -> Result<()> {
    if to_file {
        let path = config::default_log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn print_view(view: &TableView, schema: &ColumnSchema) {
    let picked: Vec<(usize, usize)> = schema
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, col)| col.data_key.is_some_and(|k| LIST_FIELDS.contains(&k)))
        .map(|(i, col)| (i, (col.width as usize).min(30)))
        .collect();

    let header: Vec<String> = picked
        .iter()
        .map(|&(i, width)| format!("{:<width$}", view.header[i].to_uppercase(), width = width))
        .collect();
    println!("{} FILE", header.join(" "));
    let total: usize = picked.iter().map(|(_, w)| w + 1).sum::<usize>() + 4;
    println!("{}", "-".repeat(total));

    match &view.body {
        TableBody::Placeholder { text, .. } => println!("{}", text),
        TableBody::Rows(rows) => {
            for row in rows {
                let cells: Vec<String> = picked
                    .iter()
                    .map(|&(i, width)| {
                        let text = row.cells.get(i).map(|c| c.display_text()).unwrap_or_default();
                        format!("{:<width$}", truncate(&text, width.saturating_sub(2)), width = width)
                    })
                    .collect();
                println!("{} {}", cells.join(" "), row.filename);
            }
        }
    }

    if !view.caption.is_empty() {
        println!("\n{}", view.caption);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Backend", 10), "Backend");
        assert_eq!(truncate("Softwareentwickler München", 12), "Softwaree...");
        assert_eq!(truncate("äöüäöü", 5), "äö...");
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::parse_from([
            "triage", "list", "-s", "new", "-g", "yes", "-g", "no", "--seniority", "senior", "-d", "7",
        ]);
        let Some(Commands::List { status, german, seniority, days, refresh, .. }) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(status.as_deref(), Some("new"));
        assert_eq!(german, ["yes", "no"]);
        assert_eq!(seniority, ["senior"]);
        assert_eq!(days, Some(7));
        assert!(!refresh);
    }

    #[test]
    fn test_cli_parses_status_case_insensitively() {
        let cli = Cli::parse_from(["triage", "set-status", "a.html", "Shortlisted"]);
        assert!(matches!(
            cli.command,
            Some(Commands::SetStatus { status: Status::Shortlisted, .. })
        ));
        assert!(Cli::try_parse_from(["triage", "set-status", "a.html", "maybe"]).is_err());
    }

    #[test]
    fn test_default_command_is_browse() {
        let cli = Cli::parse_from(["triage", "--base-url", "http://jobs.lan"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.base_url.as_deref(), Some("http://jobs.lan"));
    }
}
