//! Provisioning configuration.
//!
//! All defaults are embedded in the binary; an optional config file at
//! `~/.config/roadie/config.toml` (or `config.json`) overrides them. The
//! loaded config is validated once and treated as immutable afterwards.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Default install directory (SUMO_HOME)
pub const DEFAULT_INSTALL_DIR: &str = "~/sumo_binaries";

/// Upstream SUMO repository
pub const DEFAULT_REPO_URL: &str = "https://github.com/eclipse/sumo.git";

/// Pinned revision known to work with the simulator tooling
pub const DEFAULT_REVISION: &str = "1d4338ab80";

/// Build dependencies installed through the system package manager
const DEFAULT_PACKAGES: &[&str] = &[
    "cmake",
    "swig",
    "libgtest-dev",
    "python-pygame",
    "python-scipy",
    "autoconf",
    "libtool",
    "pkg-config",
    "libgdal-dev",
    "libxerces-c-dev",
    "libproj-dev",
    "libfox-1.6-dev",
    "libxml2-dev",
    "libxslt1-dev",
    "build-essential",
    "curl",
    "unzip",
    "flex",
    "bison",
    "python",
    "python-dev",
    "python3-dev",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where SUMO is cloned and built; also becomes SUMO_HOME
    pub install_dir: String,
    pub source: SourceConfig,
    pub packages: PackagesConfig,
    pub build: BuildConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            install_dir: DEFAULT_INSTALL_DIR.to_string(),
            source: SourceConfig::default(),
            packages: PackagesConfig::default(),
            build: BuildConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// Commit hash checked out after cloning
    pub revision: String,
    /// Clone with --recursive (SUMO uses submodules)
    pub recursive: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REPO_URL.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            recursive: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagesConfig {
    /// Package manager executable
    pub manager: String,
    /// Wrap package manager invocations in sudo
    pub use_sudo: bool,
    /// Refresh the package index before installing (optional step)
    pub refresh_index: bool,
    pub names: Vec<String>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            manager: "apt-get".to_string(),
            use_sudo: true,
            refresh_index: true,
            names: DEFAULT_PACKAGES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Parallel jobs for the compile step; 0 means "number of CPUs"
    pub jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { jobs: 0 }
    }
}

impl Config {
    /// Load config from the roadie config directory, falling back to the
    /// built-in defaults when no config file exists.
    pub fn load() -> Result<Self> {
        let dir = paths::config_dir()?;
        Self::load_from(&dir)
    }

    /// Load config from a specific directory (TOML preferred, JSON accepted).
    pub fn load_from(dir: &Path) -> Result<Self> {
        let toml_path = dir.join("config.toml");
        if toml_path.exists() {
            let content = fs::read_to_string(&toml_path)
                .with_context(|| format!("Could not read {}", toml_path.display()))?;
            return toml::from_str(&content)
                .with_context(|| format!("Invalid config: {}", toml_path.display()));
        }

        let json_path = dir.join("config.json");
        if json_path.exists() {
            let content = fs::read_to_string(&json_path)
                .with_context(|| format!("Could not read {}", json_path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid config: {}", json_path.display()));
        }

        log::debug!("No config file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Semantic validation, run once after load.
    pub fn validate(&self) -> Result<()> {
        if self.install_dir.trim().is_empty() {
            bail!("install_dir must not be empty");
        }
        if self.source.url.trim().is_empty() {
            bail!("source.url must not be empty");
        }
        let rev = self.source.revision.trim();
        if rev.len() < 7 || !rev.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("source.revision must be a commit hash (at least 7 hex characters)");
        }
        if self.packages.manager.trim().is_empty() {
            bail!("packages.manager must not be empty");
        }
        if self.packages.names.is_empty() {
            bail!("packages.names must list at least one package");
        }
        Ok(())
    }

    /// Install directory with `~` and environment variables expanded.
    pub fn install_path(&self) -> PathBuf {
        paths::expand(&self.install_dir)
    }

    /// Compile-step parallelism, resolving 0 to the CPU count.
    pub fn effective_jobs(&self) -> usize {
        if self.build.jobs > 0 {
            return self.build.jobs;
        }
        std::thread::available_parallelism().map_or(1, |n| n.get())
    }
}

// ============================================================================
// Tests
// ============================================================================
