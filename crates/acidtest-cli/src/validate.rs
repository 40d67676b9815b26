//! Standalone pattern validation: parses every `*.json` file in a
//! directory as a pattern bundle and reports structural errors, independent
//! of any scan.

use std::fs;
use std::path::Path;

use acidtest_core::pattern::PatternBundle;
use acidtest_patterns::{validate_files, FileReport};
use tracing::{error, info};

pub fn run(dir: &Path) -> bool {
    info!(dir = %dir.display(), "validating pattern bundles");

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "pattern directory unreadable");
            return false;
        }
    };

    let mut bundles = Vec::new();
    let mut parse_failures = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match load_bundle(&path) {
            Ok(bundle) => bundles.push((path, bundle)),
            Err(message) => parse_failures.push((path, message)),
        }
    }

    let reports = validate_files(&bundles);
    let clean = parse_failures.is_empty() && acidtest_patterns::validator::report_is_clean(&reports);

    for (path, message) in &parse_failures {
        error!(path = %path.display(), "{message}");
    }
    print_reports(&reports);

    if clean {
        info!("all pattern bundles valid");
    }
    clean
}

fn load_bundle(path: &Path) -> Result<PatternBundle, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read file: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid pattern bundle JSON: {e}"))
}

fn print_reports(reports: &[FileReport]) {
    for report in reports {
        if report.errors.is_empty() {
            println!("{}: ok", report.path.display());
            continue;
        }
        println!("{}:", report.path.display());
        for error in &report.errors {
            println!("  {} — {}", error.json_path, error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn directory_of_valid_bundles_passes() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = fs::File::create(dir.path().join("credentials.json")).unwrap();
        write!(
            f,
            r#"{{"category":"credentials","patterns":[{{"id":"cred-aws-key","name":"AWS key","severity":"HIGH","match":{{"type":"regex","value":"AKIA[0-9A-Z]{{16}}"}},"layer":"code","category":"credentials"}}]}}"#
        )
        .unwrap();

        assert!(run(dir.path()));
    }

    #[test]
    fn malformed_json_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "not json").unwrap();

        assert!(!run(dir.path()));
    }

    #[test]
    fn unreadable_directory_fails_validation() {
        assert!(!run(Path::new("/nonexistent/patterns/dir")));
    }
}
