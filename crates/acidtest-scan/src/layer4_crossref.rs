//! Layer 4 — cross-reference: reconciles what layers 1-3 observed in code
//! against what the manifest declared, and flags the gaps.

use acidtest_core::{Bundle, Finding, Severity};

const NETWORK_CAPABILITY_TOKENS: &[&str] = &["browser", "http", "fetch", "network", "web", "curl", "wget"];
const NETWORK_BINS: &[&str] = &["curl", "wget"];
const SHELL_CAPABILITY_TOKENS: &[&str] = &["shell", "bash", "exec", "command"];
const SHELL_BINS: &[&str] = &["bash", "sh", "zsh", "fish", "cmd", "powershell"];
const FILESYSTEM_CAPABILITY_TOKENS: &[&str] = &["file", "filesystem", "fs", "read", "write"];
const BENIGN_DESCRIPTION_WORDS: &[&str] = &["calculator", "timer", "note", "reminder", "formatter", "converter"];
const MAX_CODE_CHARS: usize = 100_000;
const MAX_AVG_LINE_LEN: usize = 200;

const NETWORK_CODE_CATEGORIES: &[&str] = &["network-access", "data-exfiltration", "url-reference"];
const SHELL_CODE_CATEGORIES: &[&str] = &["shell-execution"];
const FILESYSTEM_CODE_CATEGORIES: &[&str] = &["filesystem-access", "path-traversal"];

pub fn scan_crossref(bundle: &Bundle, prior: &[Finding]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let manifest = &bundle.manifest;

    let has_network_finding = prior.iter().any(|f| NETWORK_CODE_CATEGORIES.contains(&f.category.as_str()));
    let declares_network = has_keyword(&manifest.capabilities, NETWORK_CAPABILITY_TOKENS) || has_exact(&manifest.bins, NETWORK_BINS);
    if has_network_finding && !declares_network && !bundle.alternate_flavor {
        findings.push(Finding::new(
            Severity::Critical,
            "permission-mismatch",
            "Undeclared network access",
            "Code performs network access but the manifest declares no matching capability token or bin.",
        ));
    }

    let has_shell_finding = prior.iter().any(|f| SHELL_CODE_CATEGORIES.contains(&f.category.as_str()));
    let declares_shell = has_keyword(&manifest.capabilities, SHELL_CAPABILITY_TOKENS) || has_exact(&manifest.bins, SHELL_BINS);
    if has_shell_finding && !declares_shell {
        findings.push(Finding::new(
            Severity::Critical,
            "permission-mismatch",
            "Undeclared shell execution",
            "Code executes shell commands but the manifest declares no matching capability token or bin.",
        ));
    }

    let has_filesystem_finding = prior.iter().any(|f| FILESYSTEM_CODE_CATEGORIES.contains(&f.category.as_str()));
    let declares_filesystem = has_keyword(&manifest.capabilities, FILESYSTEM_CAPABILITY_TOKENS);
    if has_filesystem_finding && !declares_filesystem && !bundle.alternate_flavor {
        findings.push(Finding::new(
            Severity::High,
            "permission-mismatch",
            "Undeclared filesystem access",
            "Code reads or writes the filesystem but the manifest declares no matching capability token.",
        ));
    }

    if !bundle.alternate_flavor {
        for var in undeclared_env_vars(bundle) {
            findings.push(Finding::new(
                Severity::High,
                "permission-mismatch",
                "Undeclared environment variable access",
                format!("Code reads the environment variable `{var}`, which is not in the manifest's declared env list."),
            ));
        }
    }

    if let Some(description) = &manifest.description {
        let lower = description.to_lowercase();
        if BENIGN_DESCRIPTION_WORDS.iter().any(|w| lower.contains(w)) && has_network_finding {
            findings.push(Finding::new(
                Severity::High,
                "deception-indicator",
                "Benign description with network access",
                "The manifest describes a simple utility, but the code performs network access.",
            ));
        }
    }

    let total_code_chars: usize = bundle.code_files.iter().map(|f| f.text.len()).sum();
    let is_benign_description = manifest
        .description
        .as_deref()
        .map(|d| BENIGN_DESCRIPTION_WORDS.iter().any(|w| d.to_lowercase().contains(w)))
        .unwrap_or(false);
    if total_code_chars > MAX_CODE_CHARS && is_benign_description {
        findings.push(Finding::new(
            Severity::Medium,
            "supply-chain-risk",
            "Large codebase behind a benign description",
            format!("The bundle's code totals {total_code_chars} characters despite a manifest description suggesting a simple utility."),
        ));
    }

    for file in &bundle.code_files {
        if average_line_length(&file.text) > MAX_AVG_LINE_LEN {
            findings.push(
                Finding::new(
                    Severity::Medium,
                    "supply-chain-risk",
                    "Minified or obfuscated code",
                    "This file's average line length suggests minified or deliberately obfuscated code.",
                )
                .with_file(file.relative_path.clone()),
            );
        }
    }

    findings
}

fn has_keyword(tokens: &[String], keywords: &[&str]) -> bool {
    tokens.iter().any(|t| {
        let lower = t.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

fn has_exact(values: &[String], candidates: &[&str]) -> bool {
    values.iter().any(|v| candidates.contains(&v.to_lowercase().as_str()))
}

/// Scans each JavaScript code file's text for `process.env.X` / `process.env["X"]`
/// accesses not present in the manifest's declared env list.
fn undeclared_env_vars(bundle: &Bundle) -> Vec<String> {
    use std::collections::HashSet;
    let declared: HashSet<&str> = bundle.manifest.env.iter().map(|s| s.as_str()).collect();
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for file in &bundle.code_files {
        for name in env_var_references(&file.text) {
            if !declared.contains(name.as_str()) && seen.insert(name.clone()) {
                result.push(name);
            }
        }
    }
    result
}

fn env_var_references(text: &str) -> Vec<String> {
    let re = regex::Regex::new(r#"process\.env\.([A-Za-z_][A-Za-z0-9_]*)|process\.env\[['"]([A-Za-z_][A-Za-z0-9_]*)['"]\]|os\.environ\[['"]([A-Za-z_][A-Za-z0-9_]*)['"]\]|os\.environ\.get\(['"]([A-Za-z_][A-Za-z0-9_]*)['"]"#)
        .expect("static regex compiles");
    re.captures_iter(text)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)).or_else(|| c.get(4)))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn average_line_length(text: &str) -> usize {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return 0;
    }
    let total: usize = lines.iter().map(|l| l.len()).sum();
    total / lines.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use acidtest_core::{CodeFile, Language, Manifest};

    fn bundle(manifest: Manifest, code_files: Vec<CodeFile>) -> Bundle {
        Bundle { name: "demo".into(), root: "/tmp/demo".into(), manifest, document: String::new(), code_files, alternate_flavor: false }
    }

    #[test]
    fn undeclared_network_access_is_critical_mismatch() {
        let prior = vec![Finding::new(Severity::Medium, "network-access", "fetch call", "detail")];
        let b = bundle(Manifest::default(), Vec::new());
        let findings = scan_crossref(&b, &prior);
        assert!(findings.iter().any(|f| f.title == "Undeclared network access" && f.severity == Severity::Critical));
    }

    #[test]
    fn declared_network_capability_suppresses_mismatch() {
        let prior = vec![Finding::new(Severity::Medium, "network-access", "fetch call", "detail")];
        let manifest = Manifest { capabilities: vec!["network".into()], ..Default::default() };
        let b = bundle(manifest, Vec::new());
        let findings = scan_crossref(&b, &prior);
        assert!(!findings.iter().any(|f| f.title == "Undeclared network access"));
    }

    #[test]
    fn undeclared_env_var_in_code_is_flagged() {
        let code = vec![CodeFile { relative_path: "a.js".into(), text: "const k = process.env.SECRET_TOKEN;".into(), language: Language::JavaScript }];
        let b = bundle(Manifest::default(), code);
        let findings = scan_crossref(&b, &[]);
        assert!(findings.iter().any(|f| f.detail.contains("SECRET_TOKEN")));
    }

    #[test]
    fn declared_env_var_is_not_flagged() {
        let manifest = Manifest { env: vec!["SECRET_TOKEN".into()], ..Default::default() };
        let code = vec![CodeFile { relative_path: "a.js".into(), text: "const k = process.env.SECRET_TOKEN;".into(), language: Language::JavaScript }];
        let b = bundle(manifest, code);
        let findings = scan_crossref(&b, &[]);
        assert!(!findings.iter().any(|f| f.category == "permission-mismatch"));
    }

    #[test]
    fn benign_description_with_network_finding_is_deception_indicator() {
        let prior = vec![Finding::new(Severity::Medium, "network-access", "fetch call", "detail")];
        let manifest = Manifest { description: Some("A simple calculator".into()), capabilities: vec!["network".into()], ..Default::default() };
        let b = bundle(manifest, Vec::new());
        let findings = scan_crossref(&b, &prior);
        assert!(findings.iter().any(|f| f.category == "deception-indicator"));
    }

    #[test]
    fn minified_file_is_supply_chain_risk() {
        let long_line = "x".repeat(500);
        let code = vec![CodeFile { relative_path: "bundle.js".into(), text: long_line, language: Language::JavaScript }];
        let b = bundle(Manifest::default(), code);
        let findings = scan_crossref(&b, &[]);
        assert!(findings.iter().any(|f| f.title == "Minified or obfuscated code"));
    }
}
