//! Core data model and error taxonomy shared by every acidtest crate.

mod bundle;
mod error;
mod finding;
pub mod pattern;
mod result;
mod severity;

pub use bundle::{Bundle, CodeFile, Language, Manifest};
pub use error::{AcidError, Result};
pub use finding::{Finding, Remediation};
pub use pattern::{MatchKind, MatchSpec, Pattern, PatternBundle, TargetLayer};
pub use result::{Permissions, ScanResult, SkillRef, SCHEMA_VERSION, TOOL_NAME};
pub use severity::{Confidence, Severity, Status};
