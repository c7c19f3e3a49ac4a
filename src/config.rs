use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "scaprun.yaml";

/// Launcher configuration.
/// Defaults reproduce the stock layout of the packaged tools, so the file is
/// only needed when the modules or chisels live somewhere else.
#[derive(Debug, Deserialize, Clone)]
pub struct LauncherConfig {
    #[serde(default = "default_sysdig_module")]
    pub sysdig_module: PathBuf,
    #[serde(default = "default_csysdig_module")]
    pub csysdig_module: PathBuf,
    #[serde(default = "default_chisel_dir")]
    pub chisel_dir: PathBuf,
}

fn default_sysdig_module() -> PathBuf {
    PathBuf::from("build/userspace/sysdig/sysdig.wasm")
}

fn default_csysdig_module() -> PathBuf {
    PathBuf::from("build/userspace/sysdig/csysdig.wasm")
}

fn default_chisel_dir() -> PathBuf {
    PathBuf::from("userspace/sysdig/chisels")
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            sysdig_module: default_sysdig_module(),
            csysdig_module: default_csysdig_module(),
            chisel_dir: default_chisel_dir(),
        }
    }
}

impl LauncherConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Reads the config file if present, otherwise falls back to defaults.
    /// A present but malformed file is an error, not a silent fallback.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
