use serde::{Deserialize, Serialize};

use crate::{Finding, Status};

pub const SCHEMA_VERSION: &str = "1.0.0";
pub const TOOL_NAME: &str = "acidtest";

/// The normalized permissions triple. Always present as sequences in the
/// report, possibly empty, regardless of whether the manifest declared them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Permissions {
    pub bins: Vec<String>,
    pub env: Vec<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRef {
    pub name: String,
    pub path: String,
}

/// The final merged report produced by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub tool: String,
    pub version: String,
    pub skill: SkillRef,
    pub score: u32,
    pub status: Status,
    pub permissions: Permissions,
    pub findings: Vec<Finding>,
    pub recommendation: String,
}

impl ScanResult {
    pub fn error(path: impl Into<String>, version: impl Into<String>, reason: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool: TOOL_NAME.to_string(),
            version: version.into(),
            skill: SkillRef { name: String::new(), path },
            score: 0,
            status: Status::Error,
            permissions: Permissions::default(),
            findings: vec![Finding::new(
                crate::Severity::Critical,
                "input-error",
                "bundle could not be loaded",
                reason.into(),
            )],
            recommendation: "Scan could not complete.".to_string(),
        }
    }
}
