mod fallback;

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::Insight;

pub use fallback::builtin_insights;

pub const SOURCE_ENV_VAR: &str = "CODEBASE_PATH";

pub const DEFAULT_SOURCE_PATHS: [&str; 3] = ["../hometap", "../../hometap", "/tmp/codebase"];

/// Relative locations probed, in order, when a source is a directory.
pub const SOURCE_FILES: [&str; 6] = [
    "smart_facts/insights.json",
    "smart_facts/insights.yaml",
    "smart_facts/insights.yml",
    "insights.json",
    "insights.yaml",
    "insights.yml",
];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no insight data file found under {path}")]
    MissingData { path: String },

    #[error("unsupported source format: {path}")]
    UnsupportedFormat { path: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    SourceUnavailable,
    ExtractionFailure(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Source(PathBuf),
    Fallback(FallbackReason),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Source(path) => write!(f, "{}", path.display()),
            Origin::Fallback(FallbackReason::SourceUnavailable) => {
                write!(f, "built-in (no source found)")
            }
            Origin::Fallback(FallbackReason::ExtractionFailure(_)) => {
                write!(f, "built-in (source unreadable)")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Resolution {
    pub insights: Vec<Insight>,
    pub origin: Origin,
}

/// Ordered candidate list: the override first, then the fallbacks. Blank
/// entries are dropped.
pub fn candidate_sources<S: AsRef<str>>(env_override: Option<&str>, fallbacks: &[S]) -> Vec<PathBuf> {
    env_override
        .into_iter()
        .chain(fallbacks.iter().map(|p| p.as_ref()))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(crate::config::expand_tilde)
        .collect()
}

pub fn locate_source(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.exists()).cloned()
}

fn read_to_string(path: &Path) -> Result<String, ExtractError> {
    std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn parse_file(path: &Path) -> Result<Vec<Insight>, ExtractError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "json" => {
            let raw = read_to_string(path)?;
            serde_json::from_str(&raw).map_err(|source| ExtractError::Json {
                path: path.display().to_string(),
                source,
            })
        }
        "yml" | "yaml" => {
            let raw = read_to_string(path)?;
            serde_yaml::from_str(&raw).map_err(|source| ExtractError::Yaml {
                path: path.display().to_string(),
                source,
            })
        }
        _ => Err(ExtractError::UnsupportedFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Reads insights from a data file, or from the first known data file
/// inside a directory.
pub fn extract_insights(path: &Path) -> Result<Vec<Insight>, ExtractError> {
    if !path.is_dir() {
        return parse_file(path);
    }
    let file = SOURCE_FILES
        .iter()
        .map(|rel| path.join(rel))
        .find(|p| p.is_file())
        .ok_or_else(|| ExtractError::MissingData {
            path: path.display().to_string(),
        })?;
    debug!(file = %file.display(), "reading insight data");
    parse_file(&file)
}

/// Never fails: any problem locating or reading a source yields `fallback`.
pub fn resolve_from(candidates: &[PathBuf], fallback: Vec<Insight>) -> Resolution {
    let Some(path) = locate_source(candidates) else {
        info!("no insight source found, using built-in data");
        return Resolution {
            insights: fallback,
            origin: Origin::Fallback(FallbackReason::SourceUnavailable),
        };
    };

    match extract_insights(&path) {
        Ok(insights) => {
            info!(source = %path.display(), count = insights.len(), "loaded insights");
            Resolution {
                insights,
                origin: Origin::Source(path),
            }
        }
        Err(e) => {
            warn!(source = %path.display(), error = %e, "error extracting insights, using built-in data");
            Resolution {
                insights: fallback,
                origin: Origin::Fallback(FallbackReason::ExtractionFailure(e.to_string())),
            }
        }
    }
}

/// Resolves against the process environment and the default locations.
pub fn resolve() -> Resolution {
    let env_override = env::var(SOURCE_ENV_VAR).ok();
    let candidates = candidate_sources(env_override.as_deref(), &DEFAULT_SOURCE_PATHS);
    resolve_from(&candidates, builtin_insights())
}
