use std::env;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::engine::FilterState;
use crate::generator::{self, Generator, Options, Report};
use crate::model::{ContentType, Status};
use crate::output::OutputFormat;
use crate::resolver::{self, Origin};

fn print_banner() {
    const BANNER: &str = r#"
   ___                  _     ___         _
  / __|_ __  __ _ _ _ _| |_  | __|_ _ __| |_ ___
  \__ \ '  \/ _` | '_|  _|   | _/ _` / _|  _(_-<
  |___/_|_|_\__,_|_|  \__|   |_|\__,_\__|\__/__/
        dashboard builder
    "#;
    print!("{}", BANNER);
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone, Debug)]
struct RunConfig {
    options: Options,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(
    args: CliArgs,
    cfg: ConfigFile,
    env_source: Option<String>,
) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let output = config::expand_tilde_string(
        non_blank(args.output.or(cfg.output))
            .unwrap_or_else(|| generator::DEFAULT_OUTPUT.to_string())
            .as_str(),
    );

    let output_format = match non_blank(args.output_format.or(cfg.output_format)) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output_format '{raw}', expected html, csv or json"))?,
        ),
        None => None,
    };

    let source = non_blank(args.source)
        .or(non_blank(env_source))
        .or(non_blank(cfg.source));
    let source_paths = cfg.source_paths.unwrap_or_else(|| {
        resolver::DEFAULT_SOURCE_PATHS
            .iter()
            .map(|p| p.to_string())
            .collect()
    });

    let status_filter = match non_blank(args.status.or(cfg.status)) {
        Some(raw) => Some(Status::parse(&raw).ok_or_else(|| format!("invalid status '{raw}'"))?),
        None => None,
    };
    let type_filter = match non_blank(args.content_type.or(cfg.content_type)) {
        Some(raw) => Some(ContentType::parse(&raw).ok_or_else(|| format!("invalid type '{raw}'"))?),
        None => None,
    };
    let filter = FilterState {
        search_query: args.search.or(cfg.search).unwrap_or_default(),
        status_filter,
        type_filter,
        ..FilterState::default()
    };

    Ok(RunConfig {
        options: Options {
            output,
            output_format,
            source,
            source_paths,
            filter,
            ..Options::default()
        },
        no_color,
        verbose: args.verbose,
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn summarize_filter(filter: &FilterState) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !filter.search_query.is_empty() {
        parts.push(format!("search=\"{}\"", filter.search_query));
    }
    if let Some(status) = filter.status_filter {
        parts.push(format!("status={}", status.as_str()));
    }
    if let Some(kind) = filter.type_filter {
        parts.push(format!("type={}", kind.label().to_lowercase()));
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" ")
    }
}

fn print_report(report: &Report) {
    let source = match &report.origin {
        Origin::Source(_) => report.origin.to_string().green().to_string(),
        Origin::Fallback(_) => report.origin.to_string().yellow().to_string(),
    };
    format_kv_line("Source", &source);
    format_kv_line("Insights", &report.total.to_string());
    format_kv_line(
        "Stats",
        &format!(
            "live={} review={} dynamic={} cta={} retired={}",
            report.stats.live,
            report.stats.review,
            report.stats.dynamic,
            report.stats.with_cta,
            report.stats.retired
        ),
    );
    match report.path.as_ref() {
        Some(path) => format_kv_line(
            "Output",
            &format!("{} ({} rows)", path.display(), report.rows),
        ),
        None => format_kv_line("Output", &"nothing to export".yellow().to_string()),
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    let now = Instant::now();

    print_banner();
    let generator = Generator::new(run.options.clone()).map_err(|e| e.to_string())?;
    format_kv_line("Format", generator.format().label());
    format_kv_line("Filters", &summarize_filter(&run.options.filter));
    println!();

    let report = generator.run().await.map_err(|e| e.to_string())?;
    print_report(&report);

    let elapsed_time = now.elapsed();
    println!();
    println!(
        "{}",
        format!(
            ":: Completed :: build took {}ms ::",
            elapsed_time.as_millis()
        )
        .green()
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                e.print().map_err(|err| format!("failed to print help: {err}"))?;
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    if args.init_config {
        let path = match args.config.as_deref() {
            Some(p) => config::expand_tilde(p),
            None => config::default_config_path()
                .ok_or_else(|| "cannot determine home directory for config".to_string())?,
        };
        if config::ensure_default_config_file(&path)? {
            println!(":: Wrote default config to {}", path.display());
        } else {
            println!(":: Config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg, env::var(resolver::SOURCE_ENV_VAR).ok())?;
    if run.no_color {
        colored::control::set_override(false);
    }
    tracing::debug!(verbose = run.verbose, output = %run.options.output, "run configured");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
