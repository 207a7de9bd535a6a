use std::fmt;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value as JsonValue;

use super::model::{CurriculumRow, DirectoryEntry, ReferenceData};
use super::normalize::{directory_records, directory_table, normalize_records, normalize_table};
use super::sample::sample_rows;
use super::tabular;
use crate::config::{HttpConfig, SourceConfig};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Load outcome – data plus where it came from
// ---------------------------------------------------------------------------

/// Why the bundled sample is in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleReason {
    NotConfigured,
    EmptyPrimary,
    LoadFailed(String),
}

/// Where the session's reference data came from; drives the status badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    Source(String),
    Sample(SampleReason),
}

impl DataOrigin {
    pub fn is_sample(&self) -> bool {
        matches!(self, DataOrigin::Sample(_))
    }

    /// Sample data substituted for a configured source.
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            DataOrigin::Sample(SampleReason::EmptyPrimary | SampleReason::LoadFailed(_))
        )
    }
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Source(label) => write!(f, "{label}"),
            DataOrigin::Sample(SampleReason::NotConfigured) => write!(f, "Sample data"),
            DataOrigin::Sample(SampleReason::EmptyPrimary) => write!(f, "Sample data (empty primary)"),
            DataOrigin::Sample(SampleReason::LoadFailed(_)) => write!(f, "Sample data (load failed)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub data: ReferenceData,
    pub origin: DataOrigin,
}

impl LoadOutcome {
    pub fn sample(reason: SampleReason) -> Self {
        LoadOutcome {
            data: ReferenceData::new(sample_rows(), Vec::new()),
            origin: DataOrigin::Sample(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the reference data for `source`. Never fails: a failing or empty
/// source is replaced by the bundled sample and the reason is recorded in
/// [`LoadOutcome::origin`].
pub fn load_reference(source: &SourceConfig, http: &HttpConfig) -> LoadOutcome {
    if *source == SourceConfig::Sample {
        return LoadOutcome::sample(SampleReason::NotConfigured);
    }

    match try_load(source, http) {
        Ok((rows, directory)) if rows.is_empty() => {
            log::warn!(
                "{} yielded no curriculum rows ({} directory entries); using sample data",
                source.label(),
                directory.len()
            );
            LoadOutcome::sample(SampleReason::EmptyPrimary)
        }
        Ok((rows, directory)) => {
            log::info!(
                "Loaded {} curriculum rows and {} directory entries from {}",
                rows.len(),
                directory.len(),
                source.label()
            );
            LoadOutcome {
                data: ReferenceData::new(rows, directory),
                origin: DataOrigin::Source(source.label()),
            }
        }
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", source.label());
            LoadOutcome::sample(SampleReason::LoadFailed(e.to_string()))
        }
    }
}

/// Fetch primary rows and the directory. The two are requested in parallel;
/// a directory failure degrades to an empty directory, a primary failure is
/// returned.
pub fn try_load(
    source: &SourceConfig,
    http: &HttpConfig,
) -> Result<(Vec<CurriculumRow>, Vec<DirectoryEntry>), LoadError> {
    match source {
        SourceConfig::Sample => Ok((sample_rows(), Vec::new())),
        SourceConfig::PublishedSheet {
            base,
            primary_tab,
            directory_tab,
        } => {
            let fetcher = Fetcher::new(http)?;
            let pub_url = published_csv_base(base);
            both(
                || {
                    let text = fetcher.get_text(&pub_url, &[("output", "csv"), ("sheet", primary_tab.as_str())])?;
                    Ok(rows_from_csv_text(&text))
                },
                || match directory_tab {
                    Some(tab) => {
                        let text = fetcher.get_text(&pub_url, &[("output", "csv"), ("sheet", tab.as_str())])?;
                        Ok(directory_from_csv_text(&text))
                    }
                    None => Ok(Vec::new()),
                },
            )
        }
        SourceConfig::CsvUrl { url, directory_url } => {
            let fetcher = Fetcher::new(http)?;
            both(
                || Ok(rows_from_csv_text(&fetcher.get_text(url, &[])?)),
                || match directory_url {
                    Some(u) => Ok(directory_from_csv_text(&fetcher.get_text(u, &[])?)),
                    None => Ok(Vec::new()),
                },
            )
        }
        SourceConfig::JsonApi { base } => {
            let fetcher = Fetcher::new(http)?;
            let base = base.trim_end_matches('/');
            let search = format!("{base}/search");
            let meta = format!("{base}/meta");
            both(
                || Ok(normalize_records(&fetcher.get_json(&search)?)),
                || Ok(directory_records(&fetcher.get_json(&meta)?)),
            )
        }
        SourceConfig::File { path, directory_path } => {
            let rows = load_file(path)?;
            let directory = match directory_path {
                Some(p) => load_directory_file(p).unwrap_or_else(|e| {
                    log::warn!("Directory file unusable, continuing without it: {e}");
                    Vec::new()
                }),
                None => Vec::new(),
            };
            Ok((rows, directory))
        }
    }
}

/// Run the primary and directory fetches side by side and wait for both.
fn both<P, D>(primary: P, directory: D) -> Result<(Vec<CurriculumRow>, Vec<DirectoryEntry>), LoadError>
where
    P: FnOnce() -> Result<Vec<CurriculumRow>, LoadError>,
    D: FnOnce() -> Result<Vec<DirectoryEntry>, LoadError> + Send,
{
    thread::scope(|s| {
        let dir_handle = s.spawn(directory);
        let rows = primary();
        let directory = match dir_handle.join() {
            Ok(Ok(d)) => d,
            Ok(Err(e)) => {
                log::warn!("Directory unavailable, continuing without it: {e}");
                Vec::new()
            }
            Err(_) => {
                log::warn!("Directory fetch panicked, continuing without it");
                Vec::new()
            }
        };
        Ok((rows?, directory))
    })
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Blocking HTTP client with the configured timeout. Every request asks
/// intermediaries not to serve a cached export.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(http: &HttpConfig) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(concat!("pacing-guide/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| LoadError::Http {
                url: String::from("<client>"),
                source,
            })?;
        Ok(Fetcher { client })
    }

    pub fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, LoadError> {
        log::info!("GET {url} {query:?}");
        let http_err = |source| LoadError::Http {
            url: url.to_string(),
            source,
        };
        let resp = self
            .client
            .get(url)
            .query(query)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().map_err(http_err)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn get_json(&self, url: &str) -> Result<JsonValue, LoadError> {
        let text = self.get_text(url, &[])?;
        serde_json::from_str(&text).map_err(|source| LoadError::Json {
            origin: url.to_string(),
            source,
        })
    }
}

/// `…/pubhtml?gid=0` → `…/pub`; the tab is then chosen with
/// `output=csv&sheet=<tab>`.
pub fn published_csv_base(base: &str) -> String {
    let stem = base.trim().split("/pubhtml").next().unwrap_or_default();
    let stem = stem.split('?').next().unwrap_or_default().trim_end_matches('/');
    if stem.ends_with("/pub") {
        stem.to_string()
    } else {
        format!("{stem}/pub")
    }
}

// ---------------------------------------------------------------------------
// Text and file readers
// ---------------------------------------------------------------------------

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// CSV export text (header row first) → curriculum rows.
pub fn rows_from_csv_text(text: &str) -> Vec<CurriculumRow> {
    normalize_table(&tabular::parse(strip_bom(text)))
}

/// CSV export text (header row first) → directory entries.
pub fn directory_from_csv_text(text: &str) -> Vec<DirectoryEntry> {
    directory_table(&tabular::parse(strip_bom(text)))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json(path: &Path) -> Result<JsonValue, LoadError> {
    serde_json::from_str(&read_text(path)?).map_err(|source| LoadError::Json {
        origin: path.display().to_string(),
        source,
    })
}

/// Load curriculum rows from a local export. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row + rows, columns matched by alias
/// * `.json` – `[{...}, ...]` or `{"results": [...]}`
pub fn load_file(path: &Path) -> Result<Vec<CurriculumRow>, LoadError> {
    match extension(path).as_str() {
        "csv" => Ok(rows_from_csv_text(&read_text(path)?)),
        "json" => Ok(normalize_records(&read_json(path)?)),
        other => Err(LoadError::UnsupportedFile(other.to_string())),
    }
}

/// Load a school directory from a local export. Dispatch by extension.
pub fn load_directory_file(path: &Path) -> Result<Vec<DirectoryEntry>, LoadError> {
    match extension(path).as_str() {
        "csv" => Ok(directory_from_csv_text(&read_text(path)?)),
        "json" => Ok(directory_records(&read_json(path)?)),
        other => Err(LoadError::UnsupportedFile(other.to_string())),
    }
}
