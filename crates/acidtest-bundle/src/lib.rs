//! Bundle loading: recognizes a `SKILL.md` bundle or one of the four
//! alternate manifest forms, discovers code files, and loads per-bundle
//! config overrides.

pub mod config;
pub mod discovery;
pub mod manifest;

pub use config::AcidConfig;

use std::path::Path;

use acidtest_core::{AcidError, Bundle, Result};

/// Loads a bundle from a directory on disk. The only fatal failure mode:
/// the path is missing, not a directory, or carries no recognizable
/// manifest at all (§7 `InputError`).
pub fn load_bundle(path: &Path) -> Result<Bundle> {
    if !path.is_dir() {
        return Err(AcidError::input(path, "path is not a directory"));
    }

    let skill_md = path.join("SKILL.md");
    let (bundle_manifest, document, alternate_flavor) = if skill_md.is_file() {
        let text = std::fs::read_to_string(&skill_md).map_err(|e| AcidError::input(path, format!("cannot read SKILL.md: {e}")))?;
        let (manifest, document) = manifest::parse_skill_md(&text)?;
        (manifest, document, false)
    } else if let Some(manifest) = manifest::try_alternate(path)? {
        (manifest, String::new(), true)
    } else {
        return Err(AcidError::input(path, "no SKILL.md and no recognized alternate manifest"));
    };

    let code_files = discovery::discover_code_files(path);
    let name = bundle_manifest
        .name
        .clone()
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "bundle".to_string());

    let bundle = Bundle { name, root: path.to_path_buf(), manifest: bundle_manifest, document, code_files, alternate_flavor };
    if !bundle.is_well_formed() {
        return Err(AcidError::input(path, "bundle has neither a document nor any code files"));
    }
    Ok(bundle)
}
