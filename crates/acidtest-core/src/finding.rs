use serde::{Deserialize, Serialize};

use crate::Severity;

/// Remediation advice attached to a [`crate::Pattern`] or carried forward
/// onto a [`Finding`] that the pattern produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Remediation {
    pub title: String,
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub autofix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl Remediation {
    pub fn new(title: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self { title: title.into(), suggestions, autofix: false, replacement: None }
    }

    /// A remediation is well-formed only with a non-empty title and at
    /// least one suggestion.
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty() && !self.suggestions.is_empty()
    }
}

/// One detection, immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(rename = "patternId", skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}

impl Finding {
    pub fn new(severity: Severity, category: impl Into<String>, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.into(),
            title: title.into(),
            file: None,
            line: None,
            detail: detail.into(),
            evidence: None,
            pattern_id: None,
            remediation: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_pattern_id(mut self, pattern_id: impl Into<String>) -> Self {
        self.pattern_id = Some(pattern_id.into());
        self
    }

    pub fn with_remediation(mut self, remediation: Remediation) -> Self {
        self.remediation = Some(remediation);
        self
    }

    /// The key the scorer dampens on: the pattern ID when present, else the title.
    pub fn dampening_key(&self) -> &str {
        self.pattern_id.as_deref().unwrap_or(&self.title)
    }
}
