//! Helpers shared by the manifest, document, and code layers: turning a
//! matched pattern into a [`Finding`], and locating the line a byte offset
//! falls on within a text blob.

use acidtest_core::{Finding, Pattern, Severity};
use acidtest_patterns::matching::MatchResult;

pub fn pattern_finding(pattern: &Pattern, file: Option<&str>, result: MatchResult) -> Finding {
    let detail = pattern.description.clone().unwrap_or_else(|| format!("Matched pattern `{}`.", pattern.name));
    let mut finding = Finding::new(pattern.severity, pattern.category.clone(), pattern.name.clone(), detail)
        .with_line(result.first_line)
        .with_evidence(result.first_evidence)
        .with_pattern_id(pattern.id.clone());
    if let Some(file) = file {
        finding = finding.with_file(file);
    }
    if let Some(remediation) = pattern.remediation.clone() {
        finding = finding.with_remediation(remediation);
    }
    finding
}

pub fn code_finding(severity: Severity, category: &str, file: &str, line: usize, title: impl Into<String>, detail: impl Into<String>) -> Finding {
    Finding::new(severity, category, title, detail).with_file(file).with_line(line)
}

pub fn parse_error_finding(file: &str) -> Finding {
    Finding::new(
        Severity::Medium,
        "parse-error",
        "File failed to parse",
        "The syntax front-end could not make sense of this file; syntax-dependent checks were skipped for it.",
    )
    .with_file(file)
}

pub fn line_of(text: &str, byte_offset: usize) -> usize {
    text.as_bytes()[..byte_offset.min(text.len())].iter().filter(|&&b| b == b'\n').count() + 1
}

pub fn line_containing(text: &str, byte_offset: usize) -> &str {
    let offset = byte_offset.min(text.len());
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..].find('\n').map(|i| offset + i).unwrap_or(text.len());
    &text[start..end]
}
