//! Where reference data comes from, read from a TOML file.
//!
//! ```toml
//! [source]
//! kind = "published-sheet"
//! base = "https://docs.google.com/spreadsheets/d/e/<id>/pubhtml"
//! primary_tab = "Pacing Guide"
//! directory_tab = "School Directories"
//!
//! [http]
//! timeout_secs = 20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Env var naming a config file.
pub const CONFIG_ENV: &str = "PACING_GUIDE_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "pacing-guide.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// One reference-data source. Every variant except `Sample` may fail at
/// load time, in which case the bundled sample is used instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", deny_unknown_fields)]
pub enum SourceConfig {
    /// Bundled sample rows only.
    #[default]
    Sample,
    /// A spreadsheet published to the web; tabs are fetched as CSV by name.
    PublishedSheet {
        base: String,
        #[serde(default = "default_primary_tab")]
        primary_tab: String,
        /// `""` loads no directory tab.
        #[serde(default = "default_directory_tab", deserialize_with = "empty_as_none")]
        directory_tab: Option<String>,
    },
    /// Direct CSV export URLs.
    CsvUrl {
        url: String,
        #[serde(default)]
        directory_url: Option<String>,
    },
    /// The pacing JSON API (`{base}/search`, `{base}/meta`).
    JsonApi { base: String },
    /// Local `.csv` / `.json` export.
    File {
        path: PathBuf,
        #[serde(default)]
        directory_path: Option<PathBuf>,
    },
}

fn default_primary_tab() -> String {
    "Pacing Guide".to_string()
}

fn default_directory_tab() -> Option<String> {
    Some("School Directories".to_string())
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Resolve and read the config: `explicit` path, then `$PACING_GUIDE_CONFIG`,
    /// then `./pacing-guide.toml` if it exists. With none of these the
    /// defaults (sample data) apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        log::info!("No config file found; using bundled sample data");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

impl SourceConfig {
    /// Short human label used in status messages.
    pub fn label(&self) -> String {
        match self {
            SourceConfig::Sample => "Sample data".to_string(),
            SourceConfig::PublishedSheet {
                primary_tab,
                directory_tab,
                ..
            } => match directory_tab {
                Some(dir) => format!("Google Sheets: {primary_tab} + {dir}"),
                None => format!("Google Sheets: {primary_tab}"),
            },
            SourceConfig::CsvUrl { .. } => "CSV export".to_string(),
            SourceConfig::JsonApi { base } => format!("API: {base}"),
            SourceConfig::File { path, .. } => format!("File: {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_means_sample() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.http.timeout_secs, 20);
    }

    #[test]
    fn published_sheet_defaults_tabs() {
        let config: AppConfig = toml::from_str(
            r#"
            [source]
            kind = "published-sheet"
            base = "https://docs.google.com/spreadsheets/d/e/abc/pubhtml"
            "#,
        )
        .unwrap();
        match &config.source {
            SourceConfig::PublishedSheet {
                primary_tab,
                directory_tab,
                ..
            } => {
                assert_eq!(primary_tab, "Pacing Guide");
                assert_eq!(directory_tab.as_deref(), Some("School Directories"));
            }
            other => panic!("unexpected source {other:?}"),
        }
        assert_eq!(config.source.label(), "Google Sheets: Pacing Guide + School Directories");
    }

    #[test]
    fn empty_directory_tab_means_none() {
        let config: AppConfig = toml::from_str(
            r#"
            [source]
            kind = "published-sheet"
            base = "https://docs.google.com/spreadsheets/d/e/abc/pubhtml"
            directory_tab = ""
            "#,
        )
        .unwrap();
        match &config.source {
            SourceConfig::PublishedSheet { directory_tab, .. } => assert_eq!(*directory_tab, None),
            other => panic!("unexpected source {other:?}"),
        }
        assert_eq!(config.source.label(), "Google Sheets: Pacing Guide");
    }

    #[test]
    fn unknown_source_keys_are_rejected() {
        assert!(toml::from_str::<AppConfig>("[source]\nkind = \"file\"\npath = \"x\"\nbogus = 1").is_err());
        assert!(toml::from_str::<AppConfig>("[source]\nkind = \"file\"\npath = \"x\"").is_ok());
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        assert!(toml::from_str::<AppConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn reads_file_sources_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[source]\nkind = \"file\"\npath = \"pacing.csv\"\n\n[http]\ntimeout_secs = 5"
        )
        .unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(
            config.source,
            SourceConfig::File {
                path: PathBuf::from("pacing.csv"),
                directory_path: None
            }
        );
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
