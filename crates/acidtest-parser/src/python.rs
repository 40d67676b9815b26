//! The indent-family front-end: `.py`.
//!
//! Lighter than the brace-family scanner — layer 5's dataflow graph only
//! covers brace-family files, so this front-end only needs to surface what
//! layer 3's code scan and the cross-reference layer need: imports,
//! function signatures, module-level assignments, and call sites.

use std::path::Path;

use acidtest_ast::{FunctionSummary, ImportSummary, ModuleSummary, NodeKind, SyntaxNode, VariableSummary};
use acidtest_core::{AcidError, Result};

use crate::expr::ExprParser;
use crate::front_end::{FrontEnd, ParseOutput};

const INIT_PREVIEW_LEN: usize = 40;

pub struct PythonFrontEnd;

impl FrontEnd for PythonFrontEnd {
    fn can_parse(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("py")
    }

    fn parse(&self, path: &Path, text: &str) -> Result<ParseOutput> {
        let lines = logical_lines(text);
        if lines.is_empty() {
            return Err(AcidError::parse(path, "no statements found"));
        }
        let mut summary = ModuleSummary::default();
        let (children, _) = parse_block(&lines, 0, 0, &mut summary);
        let tree = SyntaxNode::new(NodeKind::Program, 1, 0, "").with_children(children);

        Ok(ParseOutput {
            tree,
            imports: summary.imports,
            functions: summary.functions,
            variables: summary.variables,
        })
    }
}

struct Line {
    indent: usize,
    line_no: usize,
    text: String,
}

fn strip_comment(line: &str) -> String {
    let mut in_str: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if let Some(q) = in_str {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
                continue;
            }
            if c == q {
                in_str = None;
            }
        } else {
            match c {
                '\'' | '"' => in_str = Some(c),
                '#' => return line[..i].to_string(),
                _ => {}
            }
        }
    }
    line.to_string()
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

fn logical_lines(text: &str) -> Vec<Line> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let stripped = strip_comment(raw);
            let trimmed = stripped.trim_end();
            if trimmed.trim().is_empty() {
                return None;
            }
            Some(Line { indent: indent_of(trimmed), line_no: i + 1, text: trimmed.trim().to_string() })
        })
        .collect()
}

fn parse_block(lines: &[Line], mut i: usize, base_indent: usize, summary: &mut ModuleSummary) -> (Vec<SyntaxNode>, usize) {
    let mut out = Vec::new();
    if i >= lines.len() {
        return (out, i);
    }
    let block_indent = lines[i].indent;
    if block_indent < base_indent {
        return (out, i);
    }
    while i < lines.len() && lines[i].indent == block_indent {
        let (node, next) = parse_statement(lines, i, summary);
        out.push(node);
        i = next;
    }
    (out, i)
}

fn parse_statement(lines: &[Line], i: usize, summary: &mut ModuleSummary) -> (SyntaxNode, usize) {
    let line = &lines[i];
    let text = line.text.as_str();
    let line_no = line.line_no;

    if let Some(rest) = text.strip_prefix('@') {
        return (SyntaxNode::new(NodeKind::Decorator { name: rest.trim().to_string() }, line_no, 0, text), i + 1);
    }

    let def_text = text.strip_prefix("async ").unwrap_or(text);
    if def_text.starts_with("def ") {
        return parse_function_def(lines, i, def_text, summary);
    }

    if text.starts_with("class ") {
        let name = text[6..].split(|c: char| c == '(' || c == ':').next().unwrap_or("").trim().to_string();
        let (children, next) = header_body(lines, i, summary);
        return (SyntaxNode::new(NodeKind::ClassDecl { name }, line_no, 0, text).with_children(children), next);
    }

    if text.starts_with("import ") {
        let names_part = &text[7..];
        let mut imports = Vec::new();
        for item in names_part.split(',') {
            let module = item.split(" as ").next().unwrap_or(item).trim().to_string();
            if !module.is_empty() {
                imports.push(ImportSummary { module: module.clone(), names: Vec::new(), line: line_no });
            }
        }
        summary.imports.extend(imports.iter().cloned());
        let first_module = imports.first().map(|i| i.module.clone()).unwrap_or_default();
        return (
            SyntaxNode::new(NodeKind::Import { module: first_module, names: Vec::new() }, line_no, 0, text),
            i + 1,
        );
    }

    if text.starts_with("from ") {
        if let Some(import_pos) = text.find(" import ") {
            let module = text[5..import_pos].trim().to_string();
            let names_part = text[import_pos + 8..].trim().trim_start_matches('(').trim_end_matches(')');
            let names: Vec<String> = names_part
                .split(',')
                .map(|s| s.split(" as ").next().unwrap_or(s).trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            summary.imports.push(ImportSummary { module: module.clone(), names: names.clone(), line: line_no });
            return (SyntaxNode::new(NodeKind::Import { module, names }, line_no, 0, text), i + 1);
        }
    }

    if text.ends_with(':')
        && (text.starts_with("if ")
            || text.starts_with("elif ")
            || text == "else:"
            || text.starts_with("for ")
            || text.starts_with("while ")
            || text.starts_with("with ")
            || text == "try:"
            || text.starts_with("except")
            || text == "finally:")
    {
        let keyword = text.split(|c: char| c.is_whitespace() || c == ':').next().unwrap_or("block").to_string();
        let (children, next) = header_body(lines, i, summary);
        return (SyntaxNode::new(NodeKind::Other { label: keyword }, line_no, 0, text).with_children(children), next);
    }

    if let Some(rest) = text.strip_prefix("return ") {
        let mut p = ExprParser::new(rest, line_no);
        let value = p.parse_expr();
        return (
            SyntaxNode::new(NodeKind::Other { label: "return".to_string() }, line_no, 0, text).with_children(vec![value]),
            i + 1,
        );
    }

    if let Some(eq_idx) = find_top_level_eq(text) {
        let lhs = text[..eq_idx].trim();
        let rhs = text[eq_idx + 1..].trim();
        if is_simple_name(lhs) {
            let mut p = ExprParser::new(rhs, line_no);
            let init = p.parse_expr();
            let preview: String = init.text.chars().take(INIT_PREVIEW_LEN).collect();
            summary.variables.push(VariableSummary { name: lhs.to_string(), init_preview: Some(preview.clone()), line: line_no });
            return (
                SyntaxNode::new(NodeKind::VariableDecl { name: lhs.to_string(), init_preview: Some(preview) }, line_no, 0, text)
                    .with_children(vec![init]),
                i + 1,
            );
        }
        let mut lhs_parser = ExprParser::new(lhs, line_no);
        let lhs_node = lhs_parser.parse_expr();
        let mut rhs_parser = ExprParser::new(rhs, line_no);
        let rhs_node = rhs_parser.parse_expr();
        return (
            SyntaxNode::new(NodeKind::Assignment, line_no, 0, text).with_children(vec![lhs_node, rhs_node]),
            i + 1,
        );
    }

    let mut p = ExprParser::new(text, line_no);
    (p.parse_expr(), i + 1)
}

fn header_body(lines: &[Line], i: usize, summary: &mut ModuleSummary) -> (Vec<SyntaxNode>, usize) {
    let base_indent = lines[i].indent;
    let child_indent = lines.get(i + 1).map(|l| l.indent).unwrap_or(base_indent);
    if child_indent <= base_indent {
        return (Vec::new(), i + 1);
    }
    parse_block(lines, i + 1, child_indent, summary)
}

fn parse_function_def(lines: &[Line], i: usize, text: &str, summary: &mut ModuleSummary) -> (SyntaxNode, usize) {
    let line_no = lines[i].line_no;
    let after_def = &text[4..];
    let name_end = after_def.find('(').unwrap_or(after_def.len());
    let name = after_def[..name_end].trim().to_string();
    let params = if let Some(open) = after_def.find('(') {
        let close = after_def.rfind(')').unwrap_or(after_def.len());
        after_def[open + 1..close.max(open + 1)]
            .split(',')
            .filter_map(|p| {
                let p = p.split(':').next().unwrap_or(p).split('=').next().unwrap_or(p).trim();
                let p = p.trim_start_matches('*');
                if p.is_empty() || p == "self" || p == "cls" {
                    None
                } else {
                    Some(p.to_string())
                }
            })
            .collect()
    } else {
        Vec::new()
    };
    let (children, next) = header_body(lines, i, summary);
    summary.functions.push(FunctionSummary { name: Some(name.clone()), params: params.clone(), line: line_no });
    (SyntaxNode::new(NodeKind::FunctionDecl { name: Some(name), params }, line_no, 0, text).with_children(children), next)
}

fn is_simple_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') && !s.chars().next().unwrap().is_ascii_digit()
}

fn find_top_level_eq(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_str: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = in_str {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                in_str = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' => in_str = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b'=' if depth == 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { 0 };
                let next = bytes.get(i + 1).copied().unwrap_or(0);
                if !matches!(prev, b'=' | b'!' | b'<' | b'>' | b'+' | b'-' | b'*' | b'/') && next != b'=' {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> ParseOutput {
        PythonFrontEnd.parse(Path::new("test.py"), src).unwrap()
    }

    #[test]
    fn extracts_plain_import() {
        let out = parse("import os\n");
        assert!(out.imports.iter().any(|i| i.module == "os"));
    }

    #[test]
    fn extracts_from_import_names() {
        let out = parse("from subprocess import call, Popen\n");
        let imp = out.imports.iter().find(|i| i.module == "subprocess").unwrap();
        assert!(imp.names.contains(&"call".to_string()));
        assert!(imp.names.contains(&"Popen".to_string()));
    }

    #[test]
    fn extracts_function_params() {
        let out = parse("def handler(request, ctx):\n    return 1\n");
        assert_eq!(out.functions.len(), 1);
        assert_eq!(out.functions[0].params, vec!["request".to_string(), "ctx".to_string()]);
    }

    #[test]
    fn recognizes_call_inside_conditional() {
        let out = parse("import os\nif True:\n    os.system(cmd)\n");
        let mut found = false;
        out.tree.walk(&mut |n| {
            if let NodeKind::CallExpression { callee } = &n.kind {
                if callee == "os.system" {
                    found = true;
                }
            }
        });
        assert!(found);
    }

    #[test]
    fn extracts_module_level_assignment() {
        let out = parse("key = os.environ['SECRET']\n");
        assert_eq!(out.variables.len(), 1);
        assert_eq!(out.variables[0].name, "key");
    }
}
