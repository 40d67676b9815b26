//! The five-layer finding pipeline and the scorer/verdict engine.
//!
//! [`run_scan`] is the crate's single public entry point: load the bundle,
//! run layers 1-5 in order (layer 4 depends on the merged output of
//! layers 1-3), sort deterministically, reweight, filter, and score.

pub mod layer1_manifest;
pub mod layer2_document;
pub mod layer3_code;
pub mod layer4_crossref;
pub mod layer5_dataflow;
pub mod scorer;
mod support;

use std::path::{Path, PathBuf};

use acidtest_core::{Permissions, ScanResult, SkillRef, Status, SCHEMA_VERSION, TOOL_NAME};
use acidtest_patterns::PatternStore;

/// Runtime configuration for one scan: where to load pattern bundles from.
/// Everything else (ignore lists, thresholds, output preferences) lives in
/// the bundle's own `.acidtest.json` and is loaded per-bundle.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub patterns_dir: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { patterns_dir: PathBuf::from("patterns") }
    }
}

/// Loads the bundle at `bundle_path` and runs the full scan. Never panics
/// and never returns an `Err`: a bundle that cannot be loaded yields an
/// `ErrorResult`-shaped [`ScanResult`] per §7's `InputError` contract.
pub fn run_scan(bundle_path: &Path, config: &ScanConfig, version: &str) -> ScanResult {
    let bundle = match acidtest_bundle::load_bundle(bundle_path) {
        Ok(bundle) => bundle,
        Err(e) => return ScanResult::error(bundle_path.display().to_string(), version, e.to_string()),
    };

    let store = PatternStore::load_dir(&config.patterns_dir);
    let bundle_config = acidtest_bundle::config::load_config(&bundle.root);

    let layer1 = layer1_manifest::scan_manifest(&bundle, &store);
    let layer2 = layer2_document::scan_document(&bundle, &store);
    let layer3 = layer3_code::scan_code(&bundle, &store);

    let mut merged_1_3 = Vec::new();
    merged_1_3.extend(layer1.into_iter().map(|f| (0usize, f)));
    merged_1_3.extend(layer2.into_iter().map(|f| (1usize, f)));
    merged_1_3.extend(layer3.into_iter().map(|f| (2usize, f)));
    let prior_findings: Vec<_> = merged_1_3.iter().map(|(_, f)| f.clone()).collect();

    let layer4 = layer4_crossref::scan_crossref(&bundle, &prior_findings);
    let layer5 = layer5_dataflow::scan_dataflow(&bundle);

    let mut tagged: Vec<(usize, acidtest_core::Finding)> = merged_1_3;
    tagged.extend(layer4.into_iter().map(|f| (3usize, f)));
    tagged.extend(layer5.into_iter().map(|f| (4usize, f)));

    tagged.sort_by(|(layer_a, a), (layer_b, b)| {
        layer_a
            .cmp(layer_b)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.title.cmp(&b.title))
    });

    let findings: Vec<_> = tagged.into_iter().map(|(_, f)| f).collect();
    let findings = scorer::apply_domain_reweighting(findings, bundle.alternate_flavor);
    let findings = scorer::apply_config_filter(findings, &bundle_config);

    let verdict = scorer::score(&findings);

    ScanResult {
        schema_version: SCHEMA_VERSION.to_string(),
        tool: TOOL_NAME.to_string(),
        version: version.to_string(),
        skill: SkillRef { name: bundle.name.clone(), path: bundle.root.display().to_string() },
        score: verdict.score,
        status: verdict.status,
        permissions: Permissions { bins: bundle.manifest.bins.clone(), env: bundle.manifest.env.clone(), tools: bundle.manifest.capabilities.clone() },
        findings,
        recommendation: verdict.recommendation,
    }
}
