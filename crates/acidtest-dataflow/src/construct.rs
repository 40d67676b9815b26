//! Walks a brace-family syntax tree once and emits dataflow nodes and
//! edges. A name-to-node-id table records the most recent node bound to
//! each name so later reads link to it; there is no lexical-scope
//! refinement. A function call only carries taint from its arguments into
//! a new node when the callee is a recognized sink — by design, taint
//! does not flow through user-defined functions.

use std::collections::HashMap;

use acidtest_ast::{NodeKind as AstKind, SyntaxNode};

use crate::graph::{DataflowGraph, EdgeKind, NodeId, NodeKind, SinkSubtype, SourceSubtype};

const COMMAND_EXEC_SINKS: &[&str] = &["exec", "execSync", "spawn", "spawnSync", "execFile", "execFileSync"];
const CODE_EVAL_SINKS: &[&str] = &["eval", "Function"];
const NETWORK_SINKS: &[&str] = &["fetch"];
const FILE_WRITE_SINKS: &[&str] = &["writeFile", "writeFileSync", "appendFile", "appendFileSync"];
const DYNAMIC_IMPORT_SINKS: &[&str] = &["require", "import"];

fn sink_subtype(callee: &str) -> Option<SinkSubtype> {
    let tail = callee.rsplit('.').next().unwrap_or(callee);
    let check = |list: &[&str]| list.contains(&callee) || list.contains(&tail);
    if check(COMMAND_EXEC_SINKS) {
        Some(SinkSubtype::CommandExecution)
    } else if check(CODE_EVAL_SINKS) {
        Some(SinkSubtype::CodeEvaluation)
    } else if check(NETWORK_SINKS) {
        Some(SinkSubtype::NetworkRequest)
    } else if check(FILE_WRITE_SINKS) {
        Some(SinkSubtype::FileWrite)
    } else if check(DYNAMIC_IMPORT_SINKS) {
        Some(SinkSubtype::DynamicImport)
    } else {
        None
    }
}

fn is_network_response_call(callee: &str) -> bool {
    callee == "fetch" || callee.ends_with(".json") || callee.ends_with(".text")
}

struct Ctx {
    graph: DataflowGraph,
    bindings: HashMap<String, NodeId>,
}

pub fn build_graph(tree: &SyntaxNode) -> DataflowGraph {
    let mut ctx = Ctx { graph: DataflowGraph::new(), bindings: HashMap::new() };
    visit_statements(&mut ctx, &tree.children);
    ctx.graph
}

fn visit_statements(ctx: &mut Ctx, stmts: &[SyntaxNode]) {
    for s in stmts {
        visit_statement(ctx, s);
    }
}

fn visit_statement(ctx: &mut Ctx, node: &SyntaxNode) {
    match &node.kind {
        AstKind::VariableDecl { name, .. } => {
            let value_id = node.children.first().and_then(|init| eval_expr(ctx, init));
            let var_id = ctx.graph.add_node(NodeKind::Variable { name: name.clone() }, Some(name.clone()), node.line, node.column);
            if let Some(v) = value_id {
                ctx.graph.add_edge(v, var_id, EdgeKind::Assignment, None);
            }
            ctx.bindings.insert(name.clone(), var_id);
        }
        AstKind::Assignment => {
            if node.children.len() == 2 {
                let rhs_id = eval_expr(ctx, &node.children[1]);
                bind_lhs(ctx, &node.children[0], rhs_id);
            }
        }
        AstKind::FunctionDecl { params, .. } => {
            for p in params {
                let pid = ctx.graph.add_node(NodeKind::Parameter { name: p.clone() }, Some(p.clone()), node.line, node.column);
                ctx.graph.mark_source(pid);
                ctx.bindings.insert(p.clone(), pid);
            }
            visit_statements(ctx, &node.children);
        }
        AstKind::Other { .. } => visit_statements(ctx, &node.children),
        AstKind::ClassDecl { .. } | AstKind::Decorator { .. } | AstKind::Import { .. } | AstKind::Block | AstKind::Program => {}
        _ => {
            eval_expr(ctx, node);
        }
    }
}

fn bind_lhs(ctx: &mut Ctx, lhs: &SyntaxNode, rhs_id: Option<NodeId>) {
    match &lhs.kind {
        AstKind::Identifier { name } => {
            let var_id = ctx.graph.add_node(NodeKind::Variable { name: name.clone() }, Some(name.clone()), lhs.line, lhs.column);
            if let Some(v) = rhs_id {
                ctx.graph.add_edge(v, var_id, EdgeKind::Assignment, None);
            }
            ctx.bindings.insert(name.clone(), var_id);
        }
        AstKind::MemberExpression { object, property } => {
            let key = format!("{object}.{property}");
            let prop_id = ctx.graph.add_node(
                NodeKind::Property { object: object.clone(), name: property.clone() },
                Some(key.clone()),
                lhs.line,
                lhs.column,
            );
            if let Some(v) = rhs_id {
                ctx.graph.add_edge(v, prop_id, EdgeKind::PropertyWrite, Some(property.clone()));
            }
            ctx.bindings.insert(key, prop_id);
        }
        AstKind::IndexAccess { object } => {
            let prop_id =
                ctx.graph.add_node(NodeKind::Property { object: object.clone(), name: "[index]".into() }, Some(object.clone()), lhs.line, lhs.column);
            if let Some(v) = rhs_id {
                ctx.graph.add_edge(v, prop_id, EdgeKind::PropertyWrite, None);
            }
        }
        _ => {}
    }
}

fn eval_expr(ctx: &mut Ctx, node: &SyntaxNode) -> Option<NodeId> {
    match &node.kind {
        AstKind::Identifier { name } => ctx.bindings.get(name).copied(),

        AstKind::MemberExpression { object, property } => {
            if object == "process.env" {
                let id = ctx.graph.add_node(NodeKind::Source { subtype: SourceSubtype::EnvVar }, Some(property.clone()), node.line, node.column);
                ctx.graph.mark_source(id);
                return Some(id);
            }
            let key = format!("{object}.{property}");
            if let Some(&id) = ctx.bindings.get(&key) {
                return Some(id);
            }
            if let Some(&obj_id) = ctx.bindings.get(object) {
                let prop_id = ctx.graph.add_node(
                    NodeKind::Property { object: object.clone(), name: property.clone() },
                    Some(key.clone()),
                    node.line,
                    node.column,
                );
                ctx.graph.add_edge(obj_id, prop_id, EdgeKind::PropertyRead, Some(property.clone()));
                ctx.bindings.insert(key, prop_id);
                return Some(prop_id);
            }
            None
        }

        AstKind::IndexAccess { object } => {
            if object == "process.env" {
                let ident = node.children.get(1).and_then(|c| match &c.kind {
                    AstKind::StringLiteral { value } => Some(value.clone()),
                    _ => None,
                });
                let id = ctx.graph.add_node(NodeKind::Source { subtype: SourceSubtype::EnvVar }, ident, node.line, node.column);
                ctx.graph.mark_source(id);
                return Some(id);
            }
            let obj_id = ctx.bindings.get(object).copied()?;
            let prop_id =
                ctx.graph.add_node(NodeKind::Property { object: object.clone(), name: "[index]".into() }, None, node.line, node.column);
            ctx.graph.add_edge(obj_id, prop_id, EdgeKind::PropertyRead, None);
            Some(prop_id)
        }

        AstKind::CallExpression { callee } | AstKind::NewExpression { callee } => call_like(ctx, callee, &node.children, node.line, node.column),

        AstKind::TemplateLiteral => {
            let op_id = ctx.graph.add_node(NodeKind::Operation { label: "template-literal".into() }, None, node.line, node.column);
            for child in &node.children {
                if let Some(v) = eval_expr(ctx, child) {
                    ctx.graph.add_edge(v, op_id, EdgeKind::TemplateLiteral, None);
                }
            }
            Some(op_id)
        }

        AstKind::ObjectLiteral => {
            let op_id = ctx.graph.add_node(NodeKind::Operation { label: "object-literal".into() }, None, node.line, node.column);
            for prop in &node.children {
                if let AstKind::Property { key } = &prop.kind {
                    if let Some(value_node) = prop.children.first() {
                        if let Some(v) = eval_expr(ctx, value_node) {
                            ctx.graph.add_edge(v, op_id, EdgeKind::ObjectConstruction, Some(key.clone()));
                        }
                    }
                }
            }
            Some(op_id)
        }

        AstKind::BinaryExpression { .. } => {
            let op_id = ctx.graph.add_node(NodeKind::Operation { label: "string-concat".into() }, None, node.line, node.column);
            let mut any = false;
            for child in &node.children {
                if let Some(v) = eval_expr(ctx, child) {
                    ctx.graph.add_edge(v, op_id, EdgeKind::TemplateLiteral, None);
                    any = true;
                }
            }
            any.then_some(op_id)
        }

        AstKind::Other { label } if label == "array-literal" => {
            let op_id = ctx.graph.add_node(NodeKind::Operation { label: "array-literal".into() }, None, node.line, node.column);
            let mut any = false;
            for child in &node.children {
                if let Some(v) = eval_expr(ctx, child) {
                    ctx.graph.add_edge(v, op_id, EdgeKind::ObjectConstruction, None);
                    any = true;
                }
            }
            any.then_some(op_id)
        }

        _ => None,
    }
}

fn call_like(ctx: &mut Ctx, callee: &str, args: &[SyntaxNode], line: usize, column: usize) -> Option<NodeId> {
    if let Some(subtype) = sink_subtype(callee) {
        let sink_id = ctx.graph.add_node(NodeKind::Sink { subtype, function_name: callee.to_string() }, Some(callee.to_string()), line, column);
        ctx.graph.mark_sink(sink_id);
        for (i, arg) in args.iter().enumerate() {
            if let Some(arg_id) = eval_expr(ctx, arg) {
                ctx.graph.add_edge(arg_id, sink_id, EdgeKind::FunctionCall, Some(i.to_string()));
            }
        }
        if is_network_response_call(callee) {
            let src_id = ctx.graph.add_node(NodeKind::Source { subtype: SourceSubtype::NetworkResponse }, Some(callee.to_string()), line, column);
            ctx.graph.mark_source(src_id);
            return Some(src_id);
        }
        return Some(sink_id);
    }

    if is_network_response_call(callee) {
        for arg in args {
            eval_expr(ctx, arg);
        }
        let id = ctx.graph.add_node(NodeKind::Source { subtype: SourceSubtype::NetworkResponse }, Some(callee.to_string()), line, column);
        ctx.graph.mark_source(id);
        return Some(id);
    }

    for arg in args {
        eval_expr(ctx, arg);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use acidtest_parser::{FrontEnd, JavaScriptFrontEnd};
    use std::path::Path;

    fn graph_for(src: &str) -> DataflowGraph {
        let out = JavaScriptFrontEnd.parse(Path::new("a.js"), src).unwrap();
        build_graph(&out.tree)
    }

    #[test]
    fn direct_env_to_exec_creates_source_and_sink() {
        let g = graph_for("const k = process.env.SECRET; exec(k);");
        assert_eq!(g.sources.len(), 1);
        assert_eq!(g.sinks.len(), 1);
    }

    #[test]
    fn property_write_then_fetch_links_through_property_node() {
        let g = graph_for("const config = {}; config.apiKey = process.env.KEY; fetch('x', {body: config.apiKey});");
        assert_eq!(g.sources.len(), 1);
        assert!(!g.sinks.is_empty());
    }

    #[test]
    fn no_taint_source_means_no_sources() {
        let g = graph_for("const safe = 'x'; exec(safe);");
        assert!(g.sources.is_empty());
        assert_eq!(g.sinks.len(), 1);
    }
}
