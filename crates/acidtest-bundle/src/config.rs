//! `.acidtest.json`: optional per-bundle overrides for ignore lists,
//! score thresholds, and output preferences. Unknown keys are ignored by
//! `serde`'s default behavior; a malformed file is warned about and
//! replaced with defaults rather than failing the scan.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thresholds {
    #[serde(rename = "minScore", default)]
    pub min_score: Option<u32>,
    #[serde(rename = "failOn", default)]
    pub fail_on: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(rename = "showRemediation", default)]
    pub show_remediation: Option<bool>,
    #[serde(default)]
    pub colors: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcidConfig {
    #[serde(default)]
    pub ignore: IgnoreConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Loads `.acidtest.json` from a bundle root. Absent file and malformed
/// file both yield defaults; the latter additionally logs a warning.
pub fn load_config(root: &Path) -> AcidConfig {
    let path = root.join(".acidtest.json");
    if !path.is_file() {
        return AcidConfig::default();
    }
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return AcidConfig::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("ignoring malformed config at {}: {}", path.display(), e);
            AcidConfig::default()
        }
    }
}
