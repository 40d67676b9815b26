//! Recursive code file discovery: a plain directory walk over
//! `std::fs::read_dir`, pruning excluded directories before recursing so
//! `node_modules` and friends never get opened at all.

use std::path::Path;

use acidtest_core::{CodeFile, Language};

const EXCLUDED_DIRS: &[&str] =
    &["node_modules", "dist", "build", "coverage", "test", "tests", "__tests__", "fixture", "fixtures", ".git"];

pub fn discover_code_files(root: &Path) -> Vec<CodeFile> {
    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    files
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<CodeFile>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| EXCLUDED_DIRS.contains(&n.to_lowercase().as_str()))
                .unwrap_or(false);
            if !excluded {
                walk(root, &path, out);
            }
            continue;
        }

        if !is_candidate(&path) {
            continue;
        }

        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("cannot read {}: {}", path.display(), e);
                continue;
            }
        };
        let Some(language) = Language::from_path(&path) else { continue };
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_string_lossy().replace('\\', "/");
        out.push(CodeFile { relative_path, text, language });
    }
}

fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else { return false };
    if name.ends_with(".d.ts") || name.contains(".min.") {
        return false;
    }
    Language::from_path(path).is_some()
}
