//! Scorer & verdict: deductions with repeat-pattern dampening, status
//! bands, recommendation rules, domain reweighting, and the config-driven
//! ignore filter — all pure functions over a findings sequence.

use std::collections::HashMap;

use acidtest_bundle::config::AcidConfig;
use acidtest_core::{Finding, Severity, Status};

const MAX_DEDUCTIONS_PER_KEY: usize = 3;
const ALTERNATE_FLAVOR_ALLOWLIST: &[&str] = &["ex-001", "cp-006", "ob-001", "ex-006"];

/// Reduces the severity of allow-listed findings by one notch when the
/// bundle is of the alternate (API-client) flavor. Applied before scoring.
pub fn apply_domain_reweighting(findings: Vec<Finding>, alternate_flavor: bool) -> Vec<Finding> {
    if !alternate_flavor {
        return findings;
    }
    findings
        .into_iter()
        .map(|mut finding| {
            if let Some(id) = &finding.pattern_id {
                if ALTERNATE_FLAVOR_ALLOWLIST.contains(&id.as_str()) {
                    finding.severity = finding.severity.lower_notch();
                }
            }
            finding
        })
        .collect()
}

/// Drops findings whose pattern ID, category, or file matches the
/// bundle's `.acidtest.json` ignore lists.
pub fn apply_config_filter(findings: Vec<Finding>, config: &AcidConfig) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|f| {
            let id_ignored = f.pattern_id.as_deref().map(|id| config.ignore.patterns.iter().any(|p| p == id)).unwrap_or(false);
            let category_ignored = config.ignore.categories.iter().any(|c| c == &f.category);
            let file_ignored = f.file.as_deref().map(|file| config.ignore.files.iter().any(|p| p == file)).unwrap_or(false);
            !(id_ignored || category_ignored || file_ignored)
        })
        .collect()
}

pub struct Verdict {
    pub score: u32,
    pub status: Status,
    pub recommendation: String,
}

pub fn score(findings: &[Finding]) -> Verdict {
    let mut deduction_counts: HashMap<&str, usize> = HashMap::new();
    let mut total_deduction: u32 = 0;

    for finding in findings {
        let key = finding.dampening_key();
        let count = deduction_counts.entry(key).or_insert(0);
        if *count < MAX_DEDUCTIONS_PER_KEY {
            total_deduction += finding.severity.weight();
            *count += 1;
        }
    }

    let score = 100u32.saturating_sub(total_deduction);
    let status = Status::from_score(score);
    let recommendation = recommend(findings, status);

    Verdict { score, status, recommendation }
}

fn recommend(findings: &[Finding], status: Status) -> String {
    let exfiltration = findings.iter().any(|f| {
        (f.severity == Severity::Critical && f.category == "permission-mismatch")
            || f.category.contains("exfiltration")
            || f.title.to_lowercase().contains("exfiltrate")
    });
    if exfiltration {
        return "Do not install. Undeclared data exfiltration detected.".to_string();
    }

    let prompt_injection = findings.iter().any(|f| f.severity == Severity::Critical && f.category == "prompt-injection");
    if prompt_injection {
        return "Do not install. Prompt injection attempt detected.".to_string();
    }

    match status {
        Status::Danger => "Do not install. Multiple severe security findings.".to_string(),
        Status::Fail => "Installation not recommended without remediation of the findings below.".to_string(),
        Status::Warn => "Review the findings below before installing.".to_string(),
        Status::Pass if findings.is_empty() => "No security concerns found.".to_string(),
        Status::Pass => "No blocking concerns found; review the findings below.".to_string(),
        Status::Error => "Scan could not complete.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity, pattern_id: &str) -> Finding {
        Finding::new(severity, "test-category", "Test finding", "detail").with_pattern_id(pattern_id)
    }

    #[test]
    fn ten_critical_same_pattern_dampens_to_three_deductions() {
        let findings: Vec<_> = (0..10).map(|_| finding(Severity::Critical, "p-1")).collect();
        let verdict = score(&findings);
        assert_eq!(verdict.score, 25);
        assert_eq!(verdict.status, Status::Fail);
    }

    #[test]
    fn two_patterns_deduct_independently() {
        let findings = vec![finding(Severity::Critical, "a"), finding(Severity::Critical, "a"), finding(Severity::High, "b")];
        let verdict = score(&findings);
        assert_eq!(verdict.score, 35);
    }

    #[test]
    fn score_never_goes_below_zero() {
        let findings: Vec<_> = (0..20).map(|i| finding(Severity::Critical, &format!("p-{i}"))).collect();
        let verdict = score(&findings);
        assert_eq!(verdict.score, 0);
    }

    #[test]
    fn alternate_flavor_reweights_allowlisted_pattern_down_one_notch() {
        let findings = vec![Finding::new(Severity::Medium, "data-exfiltration", "fetch call", "detail").with_pattern_id("ex-001")];
        let reweighted = apply_domain_reweighting(findings, true);
        assert_eq!(reweighted[0].severity, Severity::Low);
        let verdict = score(&reweighted);
        assert_eq!(verdict.score, 97);
    }

    #[test]
    fn non_alternate_flavor_leaves_severities_unchanged() {
        let findings = vec![Finding::new(Severity::Medium, "data-exfiltration", "fetch call", "detail").with_pattern_id("ex-001")];
        let reweighted = apply_domain_reweighting(findings, false);
        assert_eq!(reweighted[0].severity, Severity::Medium);
    }

    #[test]
    fn config_filter_drops_ignored_pattern_id() {
        let mut config = AcidConfig::default();
        config.ignore.patterns.push("p-1".to_string());
        let findings = vec![finding(Severity::Critical, "p-1"), finding(Severity::High, "p-2")];
        let filtered = apply_config_filter(findings, &config);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].dampening_key(), "p-2");
    }

    #[test]
    fn exfiltration_category_forces_do_not_install_recommendation() {
        let findings = vec![Finding::new(Severity::High, "data-exfiltration", "Send secret", "detail")];
        let verdict = score(&findings);
        assert!(verdict.recommendation.starts_with("Do not install"));
    }

    #[test]
    fn pass_with_zero_findings_differs_from_pass_with_findings() {
        let empty_verdict = score(&[]);
        let some_verdict = score(&[Finding::new(Severity::Low, "misc", "Minor note", "detail")]);
        assert_ne!(empty_verdict.recommendation, some_verdict.recommendation);
    }
}
