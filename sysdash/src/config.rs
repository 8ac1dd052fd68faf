//! Settings: built-in defaults, an optional JSON config file with named endpoint
//! profiles, and command-line overrides (CLI > profile > file > default).
//! Stored under XDG config dir: $XDG_CONFIG_HOME/sysdash/config.json (fallback ~/.config/sysdash/config.json)

use std::{collections::BTreeMap, fs, io, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::connection::RetryPolicy;
use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_LEN;
use crate::view::{ProcessSort, ProjectionPolicy};

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8765";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Cpu,
    Mem,
}

impl From<SortKey> for ProcessSort {
    fn from(k: SortKey) -> Self {
        match k {
            SortKey::Cpu => ProcessSort::CpuDesc,
            SortKey::Mem => ProcessSort::MemDesc,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_len: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_idle_cores: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    /// profile name -> endpoint
    #[serde(default)]
    pub profiles: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Store `endpoint` under `name`. Returns whether anything changed.
    pub fn remember_profile(&mut self, name: &str, endpoint: &str) -> bool {
        if self.profiles.get(name).map(String::as_str) == Some(endpoint) {
            return false;
        }
        self.profiles.insert(name.to_string(), endpoint.to_string());
        true
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("sysdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sysdash")
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// A missing file is an empty config; an unreadable or invalid one is an error.
pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

pub fn save(path: &Path, cfg: &ConfigFile) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let data = serde_json::to_vec_pretty(cfg).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, data).map_err(io_err)
}

/// Accept `host:port` as shorthand for `ws://host:port`; only ws/wss are allowed.
pub fn normalize_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("ws://{raw}")
    };
    let bad = |reason: String| ConfigError::Endpoint {
        endpoint: raw.to_string(),
        reason,
    };
    let url = Url::parse(&candidate).map_err(|e| bad(e.to_string()))?;
    match url.scheme() {
        "ws" | "wss" => {}
        other => return Err(bad(format!("unsupported scheme '{other}'"))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(bad("missing host".into()));
    }
    Ok(url)
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub profile: Option<String>,
    pub history_len: Option<usize>,
    pub base_delay_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub hide_idle_cores: bool,
    pub sort: Option<SortKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: Url,
    pub history_len: usize,
    pub retry: RetryPolicy,
    pub projection: ProjectionPolicy,
}

impl Settings {
    pub fn resolve(file: &ConfigFile, o: &Overrides) -> Result<Self, ConfigError> {
        let defaults = RetryPolicy::default();

        let endpoint = match (&o.endpoint, &o.profile) {
            (Some(e), _) => e.clone(),
            (None, Some(name)) => file
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownProfile(name.clone()))?,
            (None, None) => file
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };

        let history_len = o
            .history_len
            .or(file.history_len)
            .unwrap_or(DEFAULT_HISTORY_LEN);
        let base_delay_ms = o
            .base_delay_ms
            .or(file.base_delay_ms)
            .unwrap_or(defaults.base_delay.as_millis() as u64);
        let max_attempts = o
            .max_attempts
            .or(file.max_attempts)
            .unwrap_or(defaults.max_attempts);
        if history_len == 0 {
            return Err(ConfigError::OutOfRange { field: "history_len" });
        }
        if base_delay_ms == 0 {
            return Err(ConfigError::OutOfRange { field: "base_delay_ms" });
        }
        if max_attempts == 0 {
            return Err(ConfigError::OutOfRange { field: "max_attempts" });
        }

        Ok(Self {
            endpoint: normalize_endpoint(&endpoint)?,
            history_len,
            retry: RetryPolicy {
                base_delay: Duration::from_millis(base_delay_ms),
                max_attempts,
            },
            projection: ProjectionPolicy {
                hide_idle_cores: o.hide_idle_cores || file.hide_idle_cores.unwrap_or(false),
                sort: o.sort.or(file.sort).map(ProcessSort::from).unwrap_or_default(),
            },
        })
    }
}
