use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::engine::{Dashboard, FilterState, Stats};
use crate::model::Insight;
use crate::output::{self, OutputFormat};
use crate::resolver::{self, Origin};

pub const DEFAULT_OUTPUT: &str = "index.html";

const LAST_UPDATED_FORMAT: &str = "%B %d, %Y at %I:%M %p";

#[derive(Clone, Debug)]
pub struct Options {
    pub output: String,
    pub output_format: Option<OutputFormat>,
    /// Highest-priority source location (CLI flag or `CODEBASE_PATH`).
    pub source: Option<String>,
    pub source_paths: Vec<String>,
    /// Applied to csv/json output only.
    pub filter: FilterState,
    pub fallback: Vec<Insight>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            output_format: None,
            source: None,
            source_paths: resolver::DEFAULT_SOURCE_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            filter: FilterState::default(),
            fallback: resolver::builtin_insights(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("output path is empty")]
    EmptyOutputPath,

    #[error("failed to create output directory: {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct Report {
    pub origin: Origin,
    pub format: OutputFormat,
    pub stats: Stats,
    pub total: usize,
    /// Records that made it into the output.
    pub rows: usize,
    /// `None` when nothing was written (empty CSV export).
    pub path: Option<PathBuf>,
}

pub struct Generator {
    options: Options,
    format: OutputFormat,
}

impl Generator {
    pub fn new(options: Options) -> Result<Self, GenerateError> {
        if options.output.trim().is_empty() {
            return Err(GenerateError::EmptyOutputPath);
        }
        let format = options
            .output_format
            .or_else(|| output::infer_format_from_path(&options.output))
            .unwrap_or(OutputFormat::Html);
        if format == OutputFormat::Html && !options.filter.is_unfiltered() {
            warn!("filters are ignored for html output; the dashboard opens unfiltered");
        }
        Ok(Self { options, format })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub async fn run(&self) -> Result<Report, GenerateError> {
        self.run_at(Local::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Local>) -> Result<Report, GenerateError> {
        let candidates =
            resolver::candidate_sources(self.options.source.as_deref(), &self.options.source_paths);
        let resolution = resolver::resolve_from(&candidates, self.options.fallback.clone());
        let origin = resolution.origin;

        let mut dashboard = Dashboard::new(resolution.insights);
        let stats = dashboard.stats();
        let total = dashboard.insights().len();

        let (bytes, path, rows) = match self.format {
            OutputFormat::Html => {
                let last_updated = now.format(LAST_UPDATED_FORMAT).to_string();
                let bytes = output::render_html(dashboard.insights(), &last_updated);
                (bytes, PathBuf::from(&self.options.output), total)
            }
            OutputFormat::Json => {
                dashboard.apply_filter(self.options.filter.clone());
                let selected = dashboard.filtered_insights();
                let bytes = output::render_json(&selected);
                (bytes, PathBuf::from(&self.options.output), selected.len())
            }
            OutputFormat::Csv => {
                dashboard.apply_filter(self.options.filter.clone());
                let Some(export) = dashboard.export_to_csv(now.naive_utc().date()) else {
                    warn!("no insights match the current filters, nothing exported");
                    return Ok(Report {
                        origin,
                        format: self.format,
                        stats,
                        total,
                        rows: 0,
                        path: None,
                    });
                };
                let path = csv_target(&self.options.output, &export.file_name);
                (export.contents.into_bytes(), path, export.rows)
            }
        };

        write_output(&path, &bytes).await?;
        info!(path = %path.display(), rows, format = self.format.label(), "output written");

        Ok(Report {
            origin,
            format: self.format,
            stats,
            total,
            rows,
            path: Some(path),
        })
    }
}

/// A directory target (existing, or spelled with a trailing separator)
/// receives the dated export file name.
fn csv_target(output: &str, file_name: &str) -> PathBuf {
    let path = PathBuf::from(output);
    if output.ends_with('/') || output.ends_with('\\') || path.is_dir() {
        path.join(file_name)
    } else {
        path
    }
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| GenerateError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
    }
    let write_err = |source| GenerateError::Write {
        path: path.display().to_string(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(write_err)?;
    file.write_all(bytes).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)?;
    Ok(())
}
