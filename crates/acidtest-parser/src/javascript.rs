//! The brace-family front-end: `.ts/.js/.mjs/.cjs`.
//!
//! Extracts import statements, `require()` calls (as implicit imports),
//! function/arrow declarations with parameter lists, and simple variable
//! bindings with a truncated initializer preview — see module docs in
//! `front_end.rs` for the shared contract.

use std::path::Path;

use acidtest_ast::{FunctionSummary, ImportSummary, ModuleSummary, NodeKind, SyntaxNode, VariableSummary};
use acidtest_core::{AcidError, Result};

use crate::expr::ExprParser;
use crate::front_end::{FrontEnd, ParseOutput};
use crate::lexer::{Lexer, Tok, TokKind};

const INIT_PREVIEW_LEN: usize = 40;

pub struct JavaScriptFrontEnd;

impl FrontEnd for JavaScriptFrontEnd {
    fn can_parse(&self, path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("ts") | Some("js") | Some("mjs") | Some("cjs")
        )
    }

    fn parse(&self, path: &Path, text: &str) -> Result<ParseOutput> {
        let toks = Lexer::new(text, 1).tokenize_all();
        if toks.is_empty() {
            return Err(AcidError::parse(path, "empty token stream"));
        }
        let groups = split_statements(&toks);
        let mut summary = ModuleSummary::default();
        let mut children = Vec::new();
        for group in groups {
            if group.is_empty() {
                continue;
            }
            children.push(parse_statement(&group, &mut summary));
        }
        let tree = SyntaxNode::new(NodeKind::Program, 1, 0, "").with_children(children);

        for req in collect_requires(&tree) {
            summary.imports.push(req);
        }

        Ok(ParseOutput {
            tree,
            imports: summary.imports,
            functions: summary.functions,
            variables: summary.variables,
        })
    }
}

/// Split a flat token stream into statement-sized groups: a simple
/// statement ends at a top-level `;`; a block-bearing statement (function,
/// if, class, an arrow assigned to a const, …) runs through its matching
/// `}`, optionally swallowing a trailing `;`.
fn split_statements(toks: &[Tok]) -> Vec<Vec<Tok>> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < toks.len() && !matches!(toks[i].kind, TokKind::Eof) {
        let start = i;
        let mut depth = 0i32;
        let mut end = i;
        loop {
            if end >= toks.len() || matches!(toks[end].kind, TokKind::Eof) {
                break;
            }
            let closed_block = match &toks[end].kind {
                TokKind::Punct(p) if p == "{" || p == "(" || p == "[" => {
                    depth += 1;
                    false
                }
                TokKind::Punct(p) if p == "}" || p == ")" || p == "]" => {
                    depth -= 1;
                    depth == 0 && p == "}"
                }
                _ => false,
            };
            if closed_block {
                end += 1;
                if end < toks.len() && matches!(&toks[end].kind, TokKind::Punct(s) if s == ";") {
                    end += 1;
                }
                break;
            }
            if depth == 0 && matches!(&toks[end].kind, TokKind::Punct(s) if s == ";") {
                end += 1;
                break;
            }
            end += 1;
        }
        if end == start {
            end = start + 1;
        }
        groups.push(toks[start..end].to_vec());
        i = end;
    }
    groups
}

fn find_matching_brace(toks: &[Tok], open_idx: usize) -> usize {
    let mut depth = 0i32;
    for (i, t) in toks.iter().enumerate().skip(open_idx) {
        match &t.kind {
            TokKind::Punct(p) if p == "{" => depth += 1,
            TokKind::Punct(p) if p == "}" => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    toks.len().saturating_sub(1)
}

fn text_of(toks: &[Tok]) -> String {
    toks.iter().map(|t| t.text.clone()).collect::<Vec<_>>().join(" ")
}

fn ident_at(toks: &[Tok], i: usize) -> Option<&str> {
    match toks.get(i).map(|t| &t.kind) {
        Some(TokKind::Ident(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn parse_statement(toks: &[Tok], summary: &mut ModuleSummary) -> SyntaxNode {
    let line = toks[0].line;
    let col = toks[0].col;

    if ident_at(toks, 0) == Some("import") {
        return parse_import(toks, line, col, summary);
    }

    if ident_at(toks, 0) == Some("function") {
        return parse_function_decl(toks, 1, line, col, summary);
    }

    if matches!(ident_at(toks, 0), Some("const") | Some("let") | Some("var")) {
        return parse_variable_decl(toks, line, col, summary);
    }

    if matches!(
        ident_at(toks, 0),
        Some("if") | Some("for") | Some("while") | Some("try") | Some("switch") | Some("else")
    ) {
        return parse_block_bearing(toks, line, col, summary);
    }

    if ident_at(toks, 0) == Some("class") {
        let name = ident_at(toks, 1).unwrap_or("anonymous").to_string();
        return SyntaxNode::new(NodeKind::ClassDecl { name }, line, col, text_of(toks));
    }

    if ident_at(toks, 0) == Some("return") {
        let mut p = ExprParser::new(&text_of(&toks[1..]), line);
        let value = p.parse_expr();
        return SyntaxNode::new(NodeKind::Other { label: "return".to_string() }, line, col, text_of(toks))
            .with_children(vec![value]);
    }

    // Assignment: a top-level `=` not already consumed by a declaration form.
    if let Some(eq_idx) = find_top_level_assign(toks) {
        let lhs_src = text_of(&toks[..eq_idx]);
        let rhs_src = text_of(&toks[eq_idx + 1..]);
        let mut lhs_parser = ExprParser::new(&lhs_src, line);
        let lhs = lhs_parser.parse_expr();
        let mut rhs_parser = ExprParser::new(&rhs_src, line);
        let rhs = rhs_parser.parse_expr();
        let text = format!("{} = {}", lhs.text, rhs.text);
        return SyntaxNode::new(NodeKind::Assignment, line, col, text).with_children(vec![lhs, rhs]);
    }

    let mut parser = ExprParser::new(&text_of(toks), line);
    parser.parse_expr()
}

fn find_top_level_assign(toks: &[Tok]) -> Option<usize> {
    let mut depth = 0i32;
    for (i, t) in toks.iter().enumerate() {
        match &t.kind {
            TokKind::Punct(p) if p == "(" || p == "{" || p == "[" => depth += 1,
            TokKind::Punct(p) if p == ")" || p == "}" || p == "]" => depth -= 1,
            TokKind::Punct(p) if p == "=" && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_import(toks: &[Tok], line: usize, col: usize, summary: &mut ModuleSummary) -> SyntaxNode {
    let mut names = Vec::new();
    let mut module = String::new();
    let mut i = 1;
    while i < toks.len() {
        match &toks[i].kind {
            TokKind::Str(s) => {
                module = s.clone();
                i += 1;
            }
            TokKind::Ident(name) if name == "from" || name == "as" => {
                i += 1;
            }
            TokKind::Ident(name) => {
                names.push(name.clone());
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }
    let text = text_of(toks);
    summary.imports.push(ImportSummary { module: module.clone(), names: names.clone(), line });
    SyntaxNode::new(NodeKind::Import { module, names }, line, col, text)
}

fn parse_params(toks: &[Tok], open_idx: usize) -> (Vec<String>, usize) {
    let mut depth = 0i32;
    let mut params = Vec::new();
    let mut i = open_idx;
    let mut expect_name = true;
    loop {
        if i >= toks.len() {
            break;
        }
        match &toks[i].kind {
            TokKind::Punct(p) if p == "(" => {
                depth += 1;
                i += 1;
            }
            TokKind::Punct(p) if p == ")" => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    break;
                }
            }
            TokKind::Ident(name) if depth == 1 && expect_name => {
                params.push(name.clone());
                expect_name = false;
                i += 1;
            }
            TokKind::Punct(p) if p == "," && depth == 1 => {
                expect_name = true;
                i += 1;
            }
            _ => {
                i += 1;
            }
        }
    }
    (params, i)
}

fn parse_function_decl(
    toks: &[Tok],
    after_keyword: usize,
    line: usize,
    col: usize,
    summary: &mut ModuleSummary,
) -> SyntaxNode {
    let mut i = after_keyword;
    let name = if let Some(n) = ident_at(toks, i) {
        let n = n.to_string();
        i += 1;
        Some(n)
    } else {
        None
    };
    while i < toks.len() && !matches!(&toks[i].kind, TokKind::Punct(p) if p == "(") {
        i += 1;
    }
    let (params, after_params) = parse_params(toks, i);
    let body_children = parse_body_block(toks, after_params, summary);
    summary.functions.push(FunctionSummary { name: name.clone(), params: params.clone(), line });
    SyntaxNode::new(NodeKind::FunctionDecl { name, params }, line, col, text_of(toks)).with_children(body_children)
}

fn parse_body_block(toks: &[Tok], from: usize, summary: &mut ModuleSummary) -> Vec<SyntaxNode> {
    let mut i = from;
    while i < toks.len() && !matches!(&toks[i].kind, TokKind::Punct(p) if p == "{") {
        i += 1;
    }
    if i >= toks.len() {
        return Vec::new();
    }
    let close = find_matching_brace(toks, i);
    let inner = &toks[i + 1..close];
    split_statements(inner).into_iter().filter(|g| !g.is_empty()).map(|g| parse_statement(&g, summary)).collect()
}

/// Detects `(params) => { body }` / `(params) => expr` starting at `from`.
fn try_parse_arrow(toks: &[Tok], from: usize, line: usize, col: usize, summary: &mut ModuleSummary) -> Option<SyntaxNode> {
    let mut i = from;
    let params = if matches!(&toks.get(i)?.kind, TokKind::Punct(p) if p == "(") {
        let (params, after) = parse_params(toks, i);
        i = after;
        params
    } else if let Some(name) = ident_at(toks, i) {
        i += 1;
        vec![name.to_string()]
    } else {
        return None;
    };
    if !matches!(&toks.get(i)?.kind, TokKind::Punct(p) if p == "=>") {
        return None;
    }
    i += 1;
    let body_children = if matches!(&toks.get(i)?.kind, TokKind::Punct(p) if p == "{") {
        parse_body_block(toks, i, summary)
    } else {
        let mut p = ExprParser::new(&text_of(&toks[i..]), line);
        vec![p.parse_expr()]
    };
    Some(SyntaxNode::new(NodeKind::FunctionDecl { name: None, params }, line, col, text_of(toks)).with_children(body_children))
}

fn parse_variable_decl(toks: &[Tok], line: usize, col: usize, summary: &mut ModuleSummary) -> SyntaxNode {
    let name = ident_at(toks, 1).unwrap_or("_").to_string();
    let eq_idx = toks.iter().position(|t| matches!(&t.kind, TokKind::Punct(p) if p == "="));
    let Some(eq_idx) = eq_idx else {
        return SyntaxNode::new(
            NodeKind::VariableDecl { name, init_preview: None },
            line,
            col,
            text_of(toks),
        );
    };

    if let Some(func_node) = try_parse_arrow(toks, eq_idx + 1, line, col, summary) {
        if let NodeKind::FunctionDecl { params, .. } = &func_node.kind {
            summary.functions.push(FunctionSummary { name: Some(name.clone()), params: params.clone(), line });
            let named = SyntaxNode::new(
                NodeKind::FunctionDecl { name: Some(name), params: params.clone() },
                line,
                col,
                text_of(toks),
            )
            .with_children(func_node.children);
            return named;
        }
    }

    let rhs_src = text_of(&toks[eq_idx + 1..]);
    let mut parser = ExprParser::new(&rhs_src, line);
    let init = parser.parse_expr();
    let preview: String = init.text.chars().take(INIT_PREVIEW_LEN).collect();
    summary.variables.push(VariableSummary { name: name.clone(), init_preview: Some(preview.clone()), line });
    SyntaxNode::new(NodeKind::VariableDecl { name, init_preview: Some(preview) }, line, col, text_of(toks))
        .with_children(vec![init])
}

fn parse_block_bearing(toks: &[Tok], line: usize, col: usize, summary: &mut ModuleSummary) -> SyntaxNode {
    let keyword = ident_at(toks, 0).unwrap_or("block").to_string();
    let open = toks.iter().position(|t| matches!(&t.kind, TokKind::Punct(p) if p == "{"));
    let children = match open {
        Some(idx) => parse_body_block(toks, idx, summary),
        None => Vec::new(),
    };
    SyntaxNode::new(NodeKind::Other { label: keyword }, line, col, text_of(toks)).with_children(children)
}

/// Post-pass: every `require("literal")` call anywhere in the tree is an
/// implicit import, per the front-end contract.
fn collect_requires(tree: &SyntaxNode) -> Vec<ImportSummary> {
    let mut out = Vec::new();
    tree.walk(&mut |node| {
        if let NodeKind::CallExpression { callee } = &node.kind {
            if callee == "require" {
                if let Some(NodeKind::StringLiteral { value }) = node.children.first().map(|c| &c.kind) {
                    out.push(ImportSummary { module: value.clone(), names: Vec::new(), line: node.line });
                }
            }
        }
    });
    out
}
