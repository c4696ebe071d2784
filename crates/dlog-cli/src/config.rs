use std::fs;
use std::path::Path;

use anyhow::Context;
use dlog_sdk::ChainConfig;
use serde::{Deserialize, Serialize};

/// Name of the configuration file inside the dlog root.
pub const CONFIG_FILE: &str = "dlog.toml";

/// Settings stored in `<root>/dlog.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlogConfig {
    pub chain: ChainConfig,
}

impl DlogConfig {
    /// Read the configuration under `root`, falling back to defaults when
    /// there is no file.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        config.chain.validate()?;
        Ok(config)
    }

    /// Write the configuration under `root`.
    pub fn save(&self, root: &Path) -> anyhow::Result<()> {
        let path = root.join(CONFIG_FILE);
        let text = toml::to_string_pretty(self)?;
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
