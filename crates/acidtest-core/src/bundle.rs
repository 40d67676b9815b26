use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The two code file families the syntax front-ends understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    Python,
}

impl Language {
    /// Classify a file by its extension. Returns `None` for files outside
    /// the scanned set (`.ts/.js/.mjs/.cjs/.py`).
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("js") | Some("mjs") | Some("cjs") => Some(Language::JavaScript),
            Some("py") => Some(Language::Python),
            _ => None,
        }
    }
}

/// Declarative metadata extracted from a bundle's manifest: name,
/// description, version, declared env vars, bins, and capability tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub bins: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Raw key/value pairs as declared, for forward compatibility with
    /// keys this model doesn't name explicitly.
    #[serde(default)]
    pub raw: HashMap<String, serde_json::Value>,
}

impl Manifest {
    pub fn has_no_declared_permissions(&self) -> bool {
        self.capabilities.is_empty() && self.env.is_empty() && self.bins.is_empty()
    }
}

/// One code file discovered inside a bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeFile {
    pub relative_path: String,
    pub text: String,
    pub language: Language,
}

/// The unit of analysis: a manifest, an optional markdown document, and an
/// ordered sequence of code files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub name: String,
    pub root: PathBuf,
    pub manifest: Manifest,
    pub document: String,
    pub code_files: Vec<CodeFile>,
    /// Whether this bundle was recognized through an alternate manifest
    /// form (`mcp.json`/`server.json`/`package.json`/`claude_desktop_config.json`)
    /// rather than `SKILL.md`. Changes later reweighting.
    pub alternate_flavor: bool,
}

impl Bundle {
    /// A bundle must carry a document or at least one code file, unless it
    /// is of the alternate flavor (whose manifests may legitimately carry
    /// neither).
    pub fn is_well_formed(&self) -> bool {
        self.alternate_flavor || !self.document.is_empty() || !self.code_files.is_empty()
    }
}
