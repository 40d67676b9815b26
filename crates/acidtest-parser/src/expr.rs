//! Expression parsing shared by both front-ends. Identifiers, member and
//! index access, calls, `new`-expressions, template and object literals,
//! and `+` for string concatenation. Anything outside that grammar —
//! ternaries, arrow functions as values, boolean operators — resolves to
//! an opaque [`NodeKind::Other`] leaf rather than failing the parse.

use acidtest_ast::{NodeKind, SyntaxNode};

use crate::lexer::{template_interpolations, Lexer, Tok, TokKind};

pub struct ExprParser {
    toks: Vec<Tok>,
    pos: usize,
}

impl ExprParser {
    pub fn new(source: &str, base_line: usize) -> Self {
        let toks = Lexer::new(source, base_line).tokenize_all();
        Self { toks, pos: 0 }
    }

    fn peek(&self) -> &Tok {
        &self.toks[self.pos.min(self.toks.len() - 1)]
    }

    fn is_punct(&self, p: &str) -> bool {
        matches!(&self.peek().kind, TokKind::Punct(s) if s == p)
    }

    fn is_ident(&self, word: &str) -> bool {
        matches!(&self.peek().kind, TokKind::Ident(s) if s == word)
    }

    fn bump(&mut self) -> Tok {
        let tok = self.toks[self.pos.min(self.toks.len() - 1)].clone();
        if self.pos < self.toks.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek().kind, TokKind::Eof)
    }

    /// Parse one full expression (the only entry point callers need).
    pub fn parse_expr(&mut self) -> SyntaxNode {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> SyntaxNode {
        let mut left = self.parse_postfix();
        while self.is_punct("+") {
            let op_tok = self.bump();
            let right = self.parse_postfix();
            let text = format!("{} + {}", left.text, right.text);
            left = SyntaxNode::new(
                NodeKind::BinaryExpression { operator: "+".to_string() },
                left.line,
                left.column,
                text,
            )
            .with_children(vec![left, right]);
            let _ = op_tok;
        }
        left
    }

    fn parse_postfix(&mut self) -> SyntaxNode {
        let mut node = self.parse_primary();
        loop {
            if self.is_punct(".") {
                self.bump();
                let prop_tok = self.bump();
                let prop = match prop_tok.kind {
                    TokKind::Ident(s) => s,
                    _ => prop_tok.text,
                };
                let text = format!("{}.{}", node.text, prop);
                let line = node.line;
                let col = node.column;
                node = SyntaxNode::new(
                    NodeKind::MemberExpression { object: node.text.clone(), property: prop },
                    line,
                    col,
                    text,
                )
                .with_children(vec![node]);
            } else if self.is_punct("[") {
                self.bump();
                let index = self.parse_expr();
                if self.is_punct("]") {
                    self.bump();
                }
                let text = format!("{}[{}]", node.text, index.text);
                let line = node.line;
                let col = node.column;
                node = SyntaxNode::new(NodeKind::IndexAccess { object: node.text.clone() }, line, col, text)
                    .with_children(vec![node, index]);
            } else if self.is_punct("(") {
                self.bump();
                let mut args = Vec::new();
                if !self.is_punct(")") {
                    loop {
                        args.push(self.parse_expr());
                        if self.is_punct(",") {
                            self.bump();
                            continue;
                        }
                        break;
                    }
                }
                if self.is_punct(")") {
                    self.bump();
                }
                let callee = node.text.clone();
                let arg_text: Vec<_> = args.iter().map(|a| a.text.clone()).collect();
                let text = format!("{}({})", callee, arg_text.join(", "));
                let line = node.line;
                let col = node.column;
                node = SyntaxNode::new(NodeKind::CallExpression { callee }, line, col, text).with_children(args);
            } else {
                break;
            }
        }
        node
    }

    fn parse_primary(&mut self) -> SyntaxNode {
        let tok = self.peek().clone();
        match tok.kind {
            TokKind::Ident(ref name) if name == "new" => {
                self.bump();
                let target = self.parse_postfix();
                match target.kind {
                    NodeKind::CallExpression { callee } => SyntaxNode::new(
                        NodeKind::NewExpression { callee },
                        target.line,
                        target.column,
                        format!("new {}", target.text),
                    )
                    .with_children(target.children),
                    _ => SyntaxNode::new(
                        NodeKind::NewExpression { callee: target.text.clone() },
                        target.line,
                        target.column,
                        format!("new {}", target.text),
                    ),
                }
            }
            TokKind::Ident(ref name) if name == "true" || name == "false" || name == "True" || name == "False" => {
                self.bump();
                SyntaxNode::new(NodeKind::BooleanLiteral, tok.line, tok.col, tok.text)
            }
            TokKind::Ident(ref name) if name == "null" || name == "undefined" || name == "None" => {
                self.bump();
                SyntaxNode::new(NodeKind::NullLiteral, tok.line, tok.col, tok.text)
            }
            TokKind::Ident(name) => {
                self.bump();
                SyntaxNode::new(NodeKind::Identifier { name: name.clone() }, tok.line, tok.col, name)
            }
            TokKind::Str(value) => {
                self.bump();
                SyntaxNode::new(NodeKind::StringLiteral { value }, tok.line, tok.col, tok.text)
            }
            TokKind::Template(raw) => {
                self.bump();
                let children = template_interpolations(&raw)
                    .into_iter()
                    .map(|src| {
                        let mut p = ExprParser::new(&src, tok.line);
                        p.parse_expr()
                    })
                    .collect();
                SyntaxNode::new(NodeKind::TemplateLiteral, tok.line, tok.col, tok.text).with_children(children)
            }
            TokKind::Num(_) => {
                self.bump();
                SyntaxNode::new(NodeKind::NumberLiteral, tok.line, tok.col, tok.text)
            }
            TokKind::Punct(ref p) if p == "{" => self.parse_object_literal(),
            TokKind::Punct(ref p) if p == "(" => {
                self.bump();
                let inner = self.parse_expr();
                if self.is_punct(")") {
                    self.bump();
                }
                inner
            }
            TokKind::Punct(ref p) if p == "[" => {
                self.bump();
                let mut elements = Vec::new();
                if !self.is_punct("]") {
                    loop {
                        elements.push(self.parse_expr());
                        if self.is_punct(",") {
                            self.bump();
                            continue;
                        }
                        break;
                    }
                }
                if self.is_punct("]") {
                    self.bump();
                }
                SyntaxNode::new(NodeKind::Other { label: "array-literal".to_string() }, tok.line, tok.col, tok.text)
                    .with_children(elements)
            }
            _ => {
                self.bump();
                SyntaxNode::new(NodeKind::Other { label: "opaque".to_string() }, tok.line, tok.col, tok.text)
            }
        }
    }

    fn parse_object_literal(&mut self) -> SyntaxNode {
        let open = self.bump(); // "{"
        let mut properties = Vec::new();
        while !self.is_punct("}") && !self.at_eof() {
            let key_tok = self.bump();
            let key = match key_tok.kind {
                TokKind::Ident(s) => s,
                TokKind::Str(s) => s,
                _ => key_tok.text.clone(),
            };
            let value = if self.is_punct(":") {
                self.bump();
                self.parse_expr()
            } else {
                // Shorthand `{ key }` — value is the key identifier itself.
                SyntaxNode::new(NodeKind::Identifier { name: key.clone() }, key_tok.line, key_tok.col, key.clone())
            };
            let prop_text = format!("{}: {}", key, value.text);
            properties.push(
                SyntaxNode::new(NodeKind::Property { key: key.clone() }, key_tok.line, key_tok.col, prop_text)
                    .with_children(vec![value]),
            );
            if self.is_punct(",") {
                self.bump();
            }
        }
        if self.is_punct("}") {
            self.bump();
        }
        SyntaxNode::new(NodeKind::ObjectLiteral, open.line, open.col, open.text).with_children(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SyntaxNode {
        ExprParser::new(src, 1).parse_expr()
    }

    #[test]
    fn parses_member_chain() {
        let node = parse("process.env.SECRET");
        match node.kind {
            NodeKind::MemberExpression { object, property } => {
                assert_eq!(object, "process.env");
                assert_eq!(property, "SECRET");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn parses_call_with_args() {
        let node = parse("exec(k)");
        match node.kind {
            NodeKind::CallExpression { callee } => assert_eq!(callee, "exec"),
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn parses_new_expression() {
        let node = parse("new Function(payload)");
        match node.kind {
            NodeKind::NewExpression { callee } => assert_eq!(callee, "Function"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn parses_index_access() {
        let node = parse(r#"process.env["X"]"#);
        match &node.kind {
            NodeKind::IndexAccess { object } => assert_eq!(object, "process.env"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn parses_template_literal_interpolation() {
        let node = parse("`x?k=${k}`");
        assert_eq!(node.kind, NodeKind::TemplateLiteral);
        assert_eq!(node.children.len(), 1);
        assert!(matches!(&node.children[0].kind, NodeKind::Identifier { name } if name == "k"));
    }

    #[test]
    fn parses_object_literal_properties() {
        let node = parse("{body: config.apiKey}");
        assert_eq!(node.kind, NodeKind::ObjectLiteral);
        assert_eq!(node.children.len(), 1);
        match &node.children[0].kind {
            NodeKind::Property { key } => assert_eq!(key, "body"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
