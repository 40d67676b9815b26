//! Rule validation: structural checks, ID uniqueness, regex compilation,
//! and remediation well-formedness — run both internally on every load and
//! standalone from the CLI against a directory of pattern files.

use std::collections::HashSet;

use regex::Regex;

use acidtest_core::pattern::{MatchKind, Pattern, PatternBundle};

/// One validation failure, addressed by a JSON-path-like pointer so a
/// standalone run can report exactly where the problem is.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub json_path: String,
    pub message: String,
}

impl ValidationError {
    fn new(json_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { json_path: json_path.into(), message: message.into() }
    }
}

/// Validates a single loaded bundle. Returns every error found rather than
/// stopping at the first one, so a standalone run can report them all.
pub fn validate_bundle(bundle: &PatternBundle) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if bundle.category.trim().is_empty() {
        errors.push(ValidationError::new("$.category", "category must not be empty"));
    }

    let mut seen_ids = HashSet::new();
    for (i, pattern) in bundle.patterns.iter().enumerate() {
        let base = format!("$.patterns[{i}]");
        errors.extend(validate_pattern(pattern, &base));
        if !seen_ids.insert(pattern.id.clone()) {
            errors.push(ValidationError::new(format!("{base}.id"), format!("duplicate pattern id '{}'", pattern.id)));
        }
    }

    errors
}

fn validate_pattern(pattern: &Pattern, base: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if pattern.id.trim().is_empty() {
        errors.push(ValidationError::new(format!("{base}.id"), "id must not be empty"));
    } else if !pattern.id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        errors.push(ValidationError::new(format!("{base}.id"), "id must be kebab-case"));
    }

    if pattern.name.trim().is_empty() {
        errors.push(ValidationError::new(format!("{base}.name"), "name must not be empty"));
    }

    if pattern.match_spec.kind == MatchKind::Regex {
        if let Err(e) = Regex::new(&pattern.match_spec.value) {
            errors.push(ValidationError::new(format!("{base}.match.value"), format!("regex does not compile: {e}")));
        }
    }

    if let Some(remediation) = &pattern.remediation {
        if !remediation.is_well_formed() {
            errors.push(ValidationError::new(
                format!("{base}.remediation"),
                "remediation must have a non-empty title and at least one suggestion",
            ));
        }
    }

    errors
}

/// One file's worth of validation results, for the standalone report.
pub struct FileReport {
    pub path: std::path::PathBuf,
    pub errors: Vec<ValidationError>,
}

/// Validates every `PatternBundle` already parsed from disk, one report per
/// file. Exit-code decision (non-zero on any failure) is the CLI's job.
pub fn validate_files(bundles: &[(std::path::PathBuf, PatternBundle)]) -> Vec<FileReport> {
    bundles
        .iter()
        .map(|(path, bundle)| FileReport { path: path.clone(), errors: validate_bundle(bundle) })
        .collect()
}

pub fn report_is_clean(reports: &[FileReport]) -> bool {
    reports.iter().all(|r| r.errors.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use acidtest_core::pattern::{MatchSpec, TargetLayer};
    use acidtest_core::{Remediation, Severity};

    fn good_pattern() -> Pattern {
        Pattern::new(
            "cred-aws-key",
            "AWS access key",
            Severity::High,
            MatchSpec::regex("AKIA[0-9A-Z]{16}"),
            TargetLayer::Code,
            "credentials",
        )
    }

    #[test]
    fn clean_bundle_has_no_errors() {
        let bundle = PatternBundle { category: "credentials".into(), patterns: vec![good_pattern()] };
        assert!(validate_bundle(&bundle).is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let bundle = PatternBundle { category: "credentials".into(), patterns: vec![good_pattern(), good_pattern()] };
        let errors = validate_bundle(&bundle);
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn bad_regex_is_rejected() {
        let mut pattern = good_pattern();
        pattern.match_spec = MatchSpec::regex("(unclosed");
        let bundle = PatternBundle { category: "credentials".into(), patterns: vec![pattern] };
        let errors = validate_bundle(&bundle);
        assert!(errors.iter().any(|e| e.json_path.ends_with("match.value")));
    }

    #[test]
    fn empty_remediation_is_rejected() {
        let pattern = good_pattern().with_remediation(Remediation::new("", vec![]));
        let bundle = PatternBundle { category: "credentials".into(), patterns: vec![pattern] };
        let errors = validate_bundle(&bundle);
        assert!(errors.iter().any(|e| e.json_path.ends_with("remediation")));
    }
}
