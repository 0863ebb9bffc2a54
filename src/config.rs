use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::rebalance::RebalancePolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub rebalance: RebalanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalanceConfig {
    #[serde(default = "default_saturation_cost")]
    pub saturation_cost: i64,
    #[serde(default = "default_recovery_step")]
    pub recovery_step: i64,
    #[serde(default = "default_max_targets")]
    pub max_targets: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub inventory_url: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/link-cost-rebalancer/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(inventory_url) = overrides.inventory_url {
            self.inventory.base_url = inventory_url;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn policy(&self) -> RebalancePolicy {
        RebalancePolicy {
            saturation_cost: self.rebalance.saturation_cost,
            recovery_step: self.rebalance.recovery_step,
            max_targets: self.rebalance.max_targets,
        }
    }

    pub fn default_template() -> String {
        let template = r#"[inventory]
base_url = "http://127.0.0.1:8080"
timeout_secs = 10

[rebalance]
saturation_cost = 100
recovery_step = 10
max_targets = 2
"#;
        template.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory: InventoryConfig::default(),
            rebalance: RebalanceConfig::default(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            saturation_cost: default_saturation_cost(),
            recovery_step: default_recovery_step(),
            max_targets: default_max_targets(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_saturation_cost() -> i64 {
    100
}

fn default_recovery_step() -> i64 {
    10
}

fn default_max_targets() -> usize {
    2
}
