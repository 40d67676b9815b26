//! Loads, validates, and caches pattern bundles by category.
//!
//! One file per category; the basename is the category name. The store is
//! built once per scan and handed to every layer as a read-only reference —
//! "lazy-load on first use, reuse forever," just scoped to one orchestrator
//! run rather than a process-wide static, since a long-lived process (the
//! watch loop) may want to reload rules between scans.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use acidtest_core::pattern::{PatternBundle, TargetLayer};
use acidtest_core::AcidError;

use crate::validator::validate_bundle;

#[derive(Debug, Default)]
pub struct PatternStore {
    by_category: HashMap<String, PatternBundle>,
}

impl PatternStore {
    /// Loads every `*.json` file in `dir` as a pattern bundle. A bundle
    /// that fails validation is dropped with a warning; the run proceeds
    /// without that category rather than aborting.
    pub fn load_dir(dir: &Path) -> Self {
        let mut by_category = HashMap::new();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "pattern directory unreadable, starting with no patterns");
                return Self { by_category };
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match load_bundle_file(&path) {
                Ok(bundle) => {
                    by_category.insert(bundle.category.clone(), bundle);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "pattern bundle invalid, skipping category"),
            }
        }

        Self { by_category }
    }

    pub fn category(&self, name: &str) -> Option<&PatternBundle> {
        self.by_category.get(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(|s| s.as_str())
    }

    /// All patterns across every loaded category targeting the given layer.
    pub fn for_layer(&self, layer: TargetLayer) -> Vec<&acidtest_core::pattern::Pattern> {
        self.by_category
            .values()
            .flat_map(|b| b.patterns.iter())
            .filter(|p| p.layer == layer)
            .collect()
    }
}

fn load_bundle_file(path: &Path) -> Result<PatternBundle, AcidError> {
    let text = fs::read_to_string(path).map_err(|e| AcidError::pattern_load(path.display().to_string(), e.to_string()))?;
    let bundle: PatternBundle =
        serde_json::from_str(&text).map_err(|e| AcidError::pattern_load(path.display().to_string(), e.to_string()))?;
    let errors = validate_bundle(&bundle);
    if !errors.is_empty() {
        let joined = errors.iter().map(|e| format!("{}: {}", e.json_path, e.message)).collect::<Vec<_>>().join("; ");
        return Err(AcidError::pattern_load(bundle.category, joined));
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn loads_valid_bundle_from_directory() {
        let dir = tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("credentials.json")).unwrap();
        write!(
            f,
            r#"{{"category":"credentials","patterns":[{{"id":"cred-aws-key","name":"AWS key","severity":"HIGH","match":{{"type":"regex","value":"AKIA[0-9A-Z]{{16}}"}},"layer":"code","category":"credentials"}}]}}"#
        )
        .unwrap();

        let store = PatternStore::load_dir(dir.path());
        assert!(store.category("credentials").is_some());
    }

    #[test]
    fn invalid_bundle_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("broken.json")).unwrap();
        write!(f, "not json").unwrap();

        let store = PatternStore::load_dir(dir.path());
        assert!(store.category("broken").is_none());
    }

    #[test]
    fn missing_directory_yields_empty_store() {
        let store = PatternStore::load_dir(Path::new("/nonexistent/does/not/exist"));
        assert_eq!(store.categories().count(), 0);
    }
}
