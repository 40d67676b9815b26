use serde::{Deserialize, Serialize};

use crate::{Remediation, Severity};

/// Which scanner consumes a pattern. Distinct from the five numbered
/// orchestration layers: this tags only `manifest`, `document`, or `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLayer {
    Manifest,
    Document,
    Code,
}

/// The kind of match a pattern performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    Regex,
    Substring,
    SyntaxNode,
}

/// A pattern's match specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSpec {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

impl MatchSpec {
    pub fn regex(value: impl Into<String>) -> Self {
        Self { kind: MatchKind::Regex, value: value.into(), flags: None }
    }

    pub fn substring(value: impl Into<String>) -> Self {
        Self { kind: MatchKind::Substring, value: value.into(), flags: None }
    }
}

/// A declarative detection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: Severity,
    #[serde(rename = "match")]
    pub match_spec: MatchSpec,
    pub layer: TargetLayer,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}

impl Pattern {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        severity: Severity,
        match_spec: MatchSpec,
        layer: TargetLayer,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            severity,
            match_spec,
            layer,
            category: category.into(),
            remediation: None,
        }
    }

    pub fn with_remediation(mut self, remediation: Remediation) -> Self {
        self.remediation = Some(remediation);
        self
    }
}

/// A category containing a sequence of patterns, as loaded from one pattern file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternBundle {
    pub category: String,
    pub patterns: Vec<Pattern>,
}
