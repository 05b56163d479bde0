//! Per-invocation application configuration (`.ansible-dev.yml`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use adev_core::error::{AdevError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::yaml::read_yaml_file;

pub const APP_CONFIG_FILE: &str = ".ansible-dev.yml";

/// How the liveness of a freshly started host is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    /// Raw ICMP echo (needs CAP_NET_RAW or root on most systems).
    #[default]
    Icmp,
    /// The operating system's `ping` program.
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeSettings {
    pub method: ProbeMethod,
    pub attempts: u32,
    pub timeout_ms: u64,
    pub interval_ms: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            method: ProbeMethod::Icmp,
            attempts: 20,
            timeout_ms: 1000,
            interval_ms: 500,
        }
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub inventory: PathBuf,
    pub requirements: PathBuf,
    pub group: String,
    pub base_role: String,
    pub base_tag: String,
    pub probe: ProbeSettings,
    pub diff_tool: String,
    pub roles_repository: Option<PathBuf>,

    /// File this configuration was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inventory: PathBuf::from("hosts.ini"),
            requirements: PathBuf::from(crate::requirements::REQUIREMENTS_FILE),
            group: "vagrant".to_string(),
            base_role: "dcjulian29.base".to_string(),
            base_tag: "minimal".to_string(),
            probe: ProbeSettings::default(),
            diff_tool: default_diff_tool().to_string(),
            roles_repository: None,
            source: None,
        }
    }
}

fn default_diff_tool() -> &'static str {
    if cfg!(windows) {
        r"C:\Program Files\WinMerge\WinMergeU.exe"
    } else {
        "meld"
    }
}

impl AppConfig {
    /// Load the configuration for a workspace.
    ///
    /// Priority:
    /// 1. an explicit `--config` file (must exist),
    /// 2. `.ansible-dev.yml` in the workspace,
    /// 3. built-in defaults.
    pub fn load(explicit: Option<&Path>, workspace: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(AdevError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from: {}", path.display());
            return Self::load_file(path);
        }

        let local = workspace.join(APP_CONFIG_FILE);
        if local.is_file() {
            debug!("Loading config from: {}", local.display());
            return Self::load_file(&local);
        }

        debug!("No {} in {}; using defaults", APP_CONFIG_FILE, workspace.display());
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let mut config: AppConfig = read_yaml_file(path)?;
        config.source = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe.attempts == 0 {
            return Err(AdevError::Config(
                "probe.attempts must be at least 1".to_string(),
            ));
        }
        if self.probe.timeout_ms == 0 {
            return Err(AdevError::Config(
                "probe.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.group.trim().is_empty() {
            return Err(AdevError::Config("group must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn inventory_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.inventory)
    }

    pub fn requirements_path(&self, workspace: &Path) -> PathBuf {
        workspace.join(&self.requirements)
    }

    /// Local checkout of roles to compare against: `ANSIBLE_ROLES`, then `roles_repository`.
    pub fn roles_repository(&self) -> Option<PathBuf> {
        std::env::var_os("ANSIBLE_ROLES")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.roles_repository.clone())
    }
}
