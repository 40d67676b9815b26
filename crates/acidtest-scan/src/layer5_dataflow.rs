//! Layer 5 — dataflow: runs the taint engine over every brace-family code
//! file. The indent-family front-end builds no dataflow graph, so Python
//! files contribute nothing here; they are fully covered by layer 3
//! instead.

use std::path::Path;

use rayon::prelude::*;

use acidtest_core::{Bundle, Finding, Language};
use acidtest_parser::{FrontEnd, JavaScriptFrontEnd};

/// No file's dataflow graph depends on another's, so files are parsed and
/// walked in parallel; the orchestrator sorts the merged sequence, so scan
/// order here has no effect on the final report.
pub fn scan_dataflow(bundle: &Bundle) -> Vec<Finding> {
    bundle
        .code_files
        .par_iter()
        .filter(|file| file.language == Language::JavaScript)
        .flat_map(|file| match JavaScriptFrontEnd.parse(Path::new(&file.relative_path), &file.text) {
            Ok(out) => acidtest_dataflow::scan_tree(&out.tree, &file.relative_path),
            Err(_) => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use acidtest_core::{CodeFile, Manifest};

    fn bundle_with(code_files: Vec<CodeFile>) -> Bundle {
        Bundle { name: "demo".into(), root: "/tmp/demo".into(), manifest: Manifest::default(), document: String::new(), code_files, alternate_flavor: false }
    }

    #[test]
    fn reports_dataflow_finding_for_env_to_exec() {
        let code = vec![CodeFile {
            relative_path: "a.js".into(),
            text: "const k = process.env.SECRET; exec(k);".into(),
            language: Language::JavaScript,
        }];
        let findings = scan_dataflow(&bundle_with(code));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "command-injection");
    }

    #[test]
    fn python_files_contribute_no_dataflow_findings() {
        let code = vec![CodeFile {
            relative_path: "a.py".into(),
            text: "import os\nos.system('ls')\n".into(),
            language: Language::Python,
        }];
        let findings = scan_dataflow(&bundle_with(code));
        assert!(findings.is_empty());
    }

    #[test]
    fn untainted_file_contributes_no_dataflow_findings() {
        let code = vec![CodeFile { relative_path: "a.js".into(), text: "const safe = 'x'; exec(safe);".into(), language: Language::JavaScript }];
        let findings = scan_dataflow(&bundle_with(code));
        assert!(findings.is_empty());
    }
}
