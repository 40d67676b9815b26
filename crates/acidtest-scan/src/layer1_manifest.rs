//! Layer 1 — manifest audit: no-permissions check, credential-shaped env
//! var names, capability keyword scan, and the dangerous-bins table.

use acidtest_core::{Bundle, Finding, Severity};
use acidtest_patterns::{find, PatternStore};

use crate::support::pattern_finding;

const SHELL_KEYWORDS: &[&str] = &["shell", "bash", "sh", "terminal", "command", "exec"];
const NETWORK_KEYWORDS: &[&str] = &["network", "http", "fetch", "web", "internet", "browser"];
const FILESYSTEM_KEYWORDS: &[&str] = &["file", "filesystem", "fs", "disk", "directory", "folder"];
const INTERPRETER_KEYWORDS: &[&str] = &["eval", "interpreter", "script", "code", "dynamic"];

const SHELL_BINS: &[&str] = &["bash", "sh", "zsh", "fish", "dash", "cmd", "cmd.exe", "powershell", "powershell.exe", "nc", "netcat"];
const NETWORK_BINS: &[&str] = &["curl", "wget"];
const INTERPRETER_BINS: &[&str] = &["python", "python3", "node", "ruby", "perl", "php"];
const CONTAINER_BINS: &[&str] = &["docker", "podman", "kubectl"];
const REMOTE_ACCESS_BINS: &[&str] = &["ssh", "telnet", "rdp", "vnc", "rsh"];
const VCS_BINS: &[&str] = &["git", "svn", "hg"];

pub fn scan_manifest(bundle: &Bundle, store: &PatternStore) -> Vec<Finding> {
    let mut findings = Vec::new();
    let manifest = &bundle.manifest;

    if manifest.has_no_declared_permissions() && !bundle.alternate_flavor {
        findings.push(Finding::new(
            Severity::Low,
            "permissions",
            "No declared permissions",
            "The manifest declares no capability tokens, environment variables, or bins.",
        ));
    }

    if let Some(credentials) = store.category("credentials") {
        for var in &manifest.env {
            for pattern in &credentials.patterns {
                if let Some(result) = find(&pattern.match_spec, var) {
                    findings.push(pattern_finding(pattern, None, result));
                    break;
                }
            }
        }
    }

    for token in &manifest.capabilities {
        let lower = token.to_lowercase();
        if contains_any(&lower, SHELL_KEYWORDS) {
            findings.push(capability_finding(Severity::Critical, token, "shell"));
        }
        if contains_any(&lower, NETWORK_KEYWORDS) {
            findings.push(capability_finding(Severity::High, token, "network"));
        }
        if contains_any(&lower, FILESYSTEM_KEYWORDS) {
            findings.push(capability_finding(Severity::High, token, "filesystem"));
        }
        if contains_any(&lower, INTERPRETER_KEYWORDS) {
            findings.push(capability_finding(Severity::Medium, token, "interpreter"));
        }
    }

    for bin in &manifest.bins {
        if let Some((severity, label)) = classify_bin(bin) {
            findings.push(Finding::new(
                severity,
                "dangerous-bin",
                format!("Declared bin `{bin}` is a {label}"),
                format!("`{bin}` appears in the bundle's declared bins, a {label}."),
            ));
        }
    }

    findings
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn capability_finding(severity: Severity, token: &str, kind: &str) -> Finding {
    Finding::new(
        severity,
        "capability-keyword",
        format!("Capability token `{token}` implies {kind} access"),
        format!("The declared capability token `{token}` contains a {kind}-related keyword."),
    )
}

fn classify_bin(bin: &str) -> Option<(Severity, &'static str)> {
    let name = bin.to_lowercase();
    if SHELL_BINS.contains(&name.as_str()) || name == "socat" {
        return Some((Severity::Critical, "shell interpreter"));
    }
    if NETWORK_BINS.contains(&name.as_str()) {
        return Some((Severity::High, "network downloader"));
    }
    if INTERPRETER_BINS.contains(&name.as_str()) {
        return Some((Severity::High, "script interpreter"));
    }
    if CONTAINER_BINS.contains(&name.as_str()) {
        return Some((Severity::High, "container tool"));
    }
    if REMOTE_ACCESS_BINS.contains(&name.as_str()) {
        return Some((Severity::High, "remote-access tool"));
    }
    if VCS_BINS.contains(&name.as_str()) {
        return Some((Severity::Medium, "version-control tool"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use acidtest_core::Manifest;
    use acidtest_patterns::PatternStore;
    use std::path::Path;

    fn empty_bundle(manifest: Manifest, alternate_flavor: bool) -> Bundle {
        Bundle { name: "demo".into(), root: "/tmp/demo".into(), manifest, document: String::new(), code_files: Vec::new(), alternate_flavor }
    }

    #[test]
    fn no_declared_permissions_emits_low_finding() {
        let store = PatternStore::load_dir(Path::new("/nonexistent"));
        let bundle = empty_bundle(Manifest::default(), false);
        let findings = scan_manifest(&bundle, &store);
        assert!(findings.iter().any(|f| f.category == "permissions"));
    }

    #[test]
    fn alternate_flavor_suppresses_no_permissions_finding() {
        let store = PatternStore::load_dir(Path::new("/nonexistent"));
        let bundle = empty_bundle(Manifest::default(), true);
        let findings = scan_manifest(&bundle, &store);
        assert!(!findings.iter().any(|f| f.category == "permissions"));
    }

    #[test]
    fn shell_capability_keyword_is_critical() {
        let store = PatternStore::load_dir(Path::new("/nonexistent"));
        let manifest = Manifest { capabilities: vec!["shell-access".into()], ..Default::default() };
        let bundle = empty_bundle(manifest, false);
        let findings = scan_manifest(&bundle, &store);
        assert!(findings.iter().any(|f| f.category == "capability-keyword" && f.severity == Severity::Critical));
    }

    #[test]
    fn bash_bin_is_critical_dangerous_bin() {
        let store = PatternStore::load_dir(Path::new("/nonexistent"));
        let manifest = Manifest { bins: vec!["bash".into()], ..Default::default() };
        let bundle = empty_bundle(manifest, false);
        let findings = scan_manifest(&bundle, &store);
        assert!(findings.iter().any(|f| f.category == "dangerous-bin" && f.severity == Severity::Critical));
    }

    #[test]
    fn git_bin_is_medium_dangerous_bin() {
        let store = PatternStore::load_dir(Path::new("/nonexistent"));
        let manifest = Manifest { bins: vec!["git".into()], ..Default::default() };
        let bundle = empty_bundle(manifest, false);
        let findings = scan_manifest(&bundle, &store);
        assert!(findings.iter().any(|f| f.category == "dangerous-bin" && f.severity == Severity::Medium));
    }

    #[test]
    fn credential_shaped_env_var_matches_credentials_category() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("credentials.json"),
            r#"{"category":"credentials","patterns":[{"id":"cp-001","name":"API key env var","severity":"HIGH","match":{"type":"regex","value":"(?i)api[_-]?key"},"layer":"manifest","category":"credentials"}]}"#,
        )
        .unwrap();
        let store = PatternStore::load_dir(dir.path());
        let manifest = Manifest { env: vec!["OPENAI_API_KEY".into()], ..Default::default() };
        let bundle = empty_bundle(manifest, false);
        let findings = scan_manifest(&bundle, &store);
        assert!(findings.iter().any(|f| f.category == "credentials" && f.pattern_id.as_deref() == Some("cp-001")));
    }
}
