//! Forward fixpoint taint propagation, path reconstruction, and the
//! confidence/severity/remediation mapping that turns a tainted path into
//! a [`Finding`].

use std::collections::{HashSet, VecDeque};

use acidtest_core::{Confidence, Finding, Remediation, Severity};

use crate::graph::{DataflowGraph, NodeId, NodeKind, SinkSubtype, SourceSubtype};

/// Standard forward fixpoint: seed the tainted set with every source,
/// then flood along outgoing edges until the worklist is empty. O(N + E).
pub fn propagate(graph: &DataflowGraph) -> HashSet<NodeId> {
    let mut tainted: HashSet<NodeId> = graph.sources.iter().copied().collect();
    let mut worklist: VecDeque<NodeId> = graph.sources.iter().copied().collect();
    while let Some(id) = worklist.pop_front() {
        for edge in graph.outgoing(id) {
            if tainted.insert(edge.to) {
                worklist.push_back(edge.to);
            }
        }
    }
    tainted
}

fn confidence_caveat(confidence: Confidence) -> Option<&'static str> {
    match confidence {
        Confidence::High => None,
        Confidence::Medium => Some("the path traverses several intervening assignments; confidence is medium"),
        Confidence::Low => Some("the path is long or passes through a user-defined function boundary; confidence is low"),
    }
}

pub struct DataflowPath {
    pub source: NodeId,
    pub sink: NodeId,
    pub nodes: Vec<NodeId>,
    pub confidence: Confidence,
}

/// For every tainted sink, BFS from every source and keep the first path
/// found (BFS yields the shortest, which is also the most confident).
pub fn reconstruct_paths(graph: &DataflowGraph, tainted: &HashSet<NodeId>) -> Vec<DataflowPath> {
    let mut paths = Vec::new();
    for &sink in &graph.sinks {
        if !tainted.contains(&sink) {
            continue;
        }
        for &source in &graph.sources {
            if let Some(nodes) = bfs_path(graph, source, sink) {
                let confidence = Confidence::from_path_len(nodes.len());
                paths.push(DataflowPath { source, sink, nodes, confidence });
            }
        }
    }
    paths
}

fn bfs_path(graph: &DataflowGraph, source: NodeId, sink: NodeId) -> Option<Vec<NodeId>> {
    let mut visited = HashSet::new();
    let mut parent = std::collections::HashMap::new();
    let mut queue = VecDeque::new();
    visited.insert(source);
    queue.push_back(source);
    while let Some(cur) = queue.pop_front() {
        if cur == sink {
            let mut path = vec![cur];
            let mut at = cur;
            while let Some(&p) = parent.get(&at) {
                path.push(p);
                at = p;
            }
            path.reverse();
            return Some(path);
        }
        for edge in graph.outgoing(cur) {
            if visited.insert(edge.to) {
                parent.insert(edge.to, cur);
                queue.push_back(edge.to);
            }
        }
    }
    None
}

fn source_subtype(graph: &DataflowGraph, id: NodeId) -> Option<SourceSubtype> {
    match &graph.node(id).kind {
        NodeKind::Source { subtype } => Some(*subtype),
        NodeKind::Parameter { .. } => Some(SourceSubtype::UserInput),
        _ => None,
    }
}

fn sink_subtype(graph: &DataflowGraph, id: NodeId) -> Option<SinkSubtype> {
    match &graph.node(id).kind {
        NodeKind::Sink { subtype, .. } => Some(*subtype),
        _ => None,
    }
}

fn severity_for(source: SourceSubtype, sink: SinkSubtype) -> Severity {
    use SinkSubtype::*;
    use SourceSubtype::*;
    match (source, sink) {
        (EnvVar, CommandExecution) => Severity::Critical,
        (EnvVar, CodeEvaluation) => Severity::Critical,
        (EnvVar, NetworkRequest) => Severity::Critical,
        (EnvVar, FileWrite) => Severity::High,
        (EnvVar, DynamicImport) => Severity::High,
        (UserInput, CommandExecution) => Severity::Critical,
        (UserInput, CodeEvaluation) => Severity::Critical,
        (UserInput, NetworkRequest) => Severity::High,
        (UserInput, FileWrite) => Severity::High,
        (UserInput, DynamicImport) => Severity::High,
        (NetworkResponse, CommandExecution) => Severity::High,
        (NetworkResponse, CodeEvaluation) => Severity::High,
        (NetworkResponse, NetworkRequest) => Severity::Medium,
        (NetworkResponse, FileWrite) => Severity::High,
        (NetworkResponse, DynamicImport) => Severity::High,
        (FileInput, CommandExecution) => Severity::Medium,
        (FileInput, CodeEvaluation) => Severity::Medium,
        (FileInput, NetworkRequest) => Severity::Medium,
        (FileInput, FileWrite) => Severity::High,
        (FileInput, DynamicImport) => Severity::High,
    }
}

fn category_for(sink: SinkSubtype) -> &'static str {
    match sink {
        SinkSubtype::CommandExecution => "command-injection",
        SinkSubtype::CodeEvaluation => "code-injection",
        SinkSubtype::NetworkRequest => "data-exfiltration",
        SinkSubtype::FileWrite => "path-traversal",
        SinkSubtype::DynamicImport => "malicious-code",
    }
}

fn source_description(source: SourceSubtype) -> &'static str {
    match source {
        SourceSubtype::EnvVar => "an environment variable",
        SourceSubtype::UserInput => "a function parameter (untrusted caller input)",
        SourceSubtype::NetworkResponse => "a network response body",
        SourceSubtype::FileInput => "file contents read from disk",
    }
}

fn sink_description(sink: SinkSubtype) -> &'static str {
    match sink {
        SinkSubtype::CommandExecution => "a shell command execution call",
        SinkSubtype::CodeEvaluation => "dynamic code evaluation",
        SinkSubtype::NetworkRequest => "an outbound network request",
        SinkSubtype::FileWrite => "a file write",
        SinkSubtype::DynamicImport => "a dynamic module load",
    }
}

fn remediation_for(source: SourceSubtype, sink: SinkSubtype) -> Remediation {
    use SinkSubtype::*;
    use SourceSubtype::*;
    let (title, suggestion) = match (source, sink) {
        (EnvVar, CommandExecution) => ("Avoid passing secrets to a shell", "Use an argument array with a fixed executable path instead of building a shell command string from environment values."),
        (EnvVar, CodeEvaluation) => ("Avoid evaluating code built from secrets", "Never interpolate credential values into `eval`/`Function`; parse untrusted input as data, not code."),
        (EnvVar, NetworkRequest) => ("Avoid sending secrets over the network", "Confirm the destination is the intended first-party endpoint before sending any credential value in a request."),
        (_, FileWrite) => ("Avoid writing sensitive values to disk", "Write to a path validated against the bundle's declared working directory, and avoid persisting secret values in plaintext."),
        (_, DynamicImport) => ("Avoid dynamic imports of untrusted input", "Resolve module specifiers from a fixed allow-list instead of a runtime-computed string."),
        (_, CommandExecution) => ("Avoid building shell commands from untrusted data", "Use an argument array and a fixed executable rather than a concatenated command string."),
        (_, CodeEvaluation) => ("Avoid evaluating untrusted data as code", "Parse the value as data (e.g. `JSON.parse`) instead of passing it to `eval`/`Function`."),
        (_, NetworkRequest) => ("Review outbound network calls carrying external data", "Confirm the destination host is expected and that no sensitive payload is re-transmitted unexpectedly."),
    };
    Remediation::new(title, vec![suggestion.to_string()])
}

/// Builds the finding for one reconstructed path, attaching it to `file`.
pub fn finding_for_path(graph: &DataflowGraph, path: &DataflowPath, file: &str) -> Option<Finding> {
    let source_sub = source_subtype(graph, path.source)?;
    let sink_sub = sink_subtype(graph, path.sink)?;
    let sink_node = graph.node(path.sink);
    let function_name = match &sink_node.kind {
        NodeKind::Sink { function_name, .. } => function_name.clone(),
        _ => return None,
    };

    let severity = severity_for(source_sub, sink_sub);
    let category = category_for(sink_sub);

    let mut detail = format!(
        "Tainted data from {} reaches {} via `{}`.",
        source_description(source_sub),
        sink_description(sink_sub),
        function_name
    );
    if let Some(caveat) = confidence_caveat(path.confidence) {
        detail.push(' ');
        detail.push_str(caveat);
        detail.push('.');
    }

    let idents: Vec<String> = path
        .nodes
        .iter()
        .map(|&id| graph.node(id).identifier.clone().unwrap_or_else(|| node_label(graph, id)))
        .collect();
    let shown: Vec<&str> = std::iter::once(idents[0].as_str())
        .chain(idents[1..idents.len() - 1].iter().take(5).map(|s| s.as_str()))
        .chain(std::iter::once(idents[idents.len() - 1].as_str()))
        .collect();
    let evidence = shown.join(" → ");

    Some(
        Finding::new(severity, category, format!("Tainted data flows into {function_name}"), detail)
            .with_file(file)
            .with_line(sink_node.line)
            .with_evidence(evidence)
            .with_remediation(remediation_for(source_sub, sink_sub)),
    )
}

fn node_label(graph: &DataflowGraph, id: NodeId) -> String {
    match &graph.node(id).kind {
        NodeKind::Source { .. } => "source".to_string(),
        NodeKind::Sink { function_name, .. } => function_name.clone(),
        NodeKind::Variable { name } => name.clone(),
        NodeKind::Operation { label } => label.clone(),
        NodeKind::Parameter { name } => name.clone(),
        NodeKind::Property { object, name } => format!("{object}.{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::build_graph;
    use acidtest_parser::{FrontEnd, JavaScriptFrontEnd};
    use std::path::Path;

    fn graph_for(src: &str) -> DataflowGraph {
        let out = JavaScriptFrontEnd.parse(Path::new("a.js"), src).unwrap();
        build_graph(&out.tree)
    }

    #[test]
    fn direct_env_to_exec_path_length_three_high_confidence() {
        let g = graph_for("const k = process.env.SECRET; exec(k);");
        let tainted = propagate(&g);
        let paths = reconstruct_paths(&g, &tainted);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes.len(), 3);
        assert_eq!(paths[0].confidence, Confidence::High);
    }

    #[test]
    fn assignment_chain_env_to_exec_path_length_five() {
        let g = graph_for("const a = process.env.K; const b = a; const c = b; exec(c);");
        let tainted = propagate(&g);
        let paths = reconstruct_paths(&g, &tainted);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes.len(), 5);
        assert_eq!(paths[0].confidence, Confidence::High);
    }

    #[test]
    fn no_taint_produces_no_paths() {
        let g = graph_for("const safe = 'x'; exec(safe);");
        let tainted = propagate(&g);
        let paths = reconstruct_paths(&g, &tainted);
        assert!(paths.is_empty());
    }

    #[test]
    fn finding_severity_matches_env_to_exec_matrix_cell() {
        let g = graph_for("const k = process.env.SECRET; exec(k);");
        let tainted = propagate(&g);
        let paths = reconstruct_paths(&g, &tainted);
        let finding = finding_for_path(&g, &paths[0], "a.js").unwrap();
        assert_eq!(finding.severity, Severity::Critical);
        assert_eq!(finding.category, "command-injection");
    }
}
