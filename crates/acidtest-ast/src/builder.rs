//! Fluent constructors for the node kinds the front-ends emit most often.

use crate::nodes::{NodeKind, SyntaxNode};

pub struct NodeBuilder;

impl NodeBuilder {
    pub fn identifier(name: &str, line: usize, column: usize) -> SyntaxNode {
        SyntaxNode::new(NodeKind::Identifier { name: name.to_string() }, line, column, name)
    }

    pub fn string_literal(value: &str, line: usize, column: usize, text: &str) -> SyntaxNode {
        SyntaxNode::new(NodeKind::StringLiteral { value: value.to_string() }, line, column, text)
    }

    pub fn call(callee: &str, line: usize, column: usize, text: &str, args: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(NodeKind::CallExpression { callee: callee.to_string() }, line, column, text)
            .with_children(args)
    }

    pub fn member(object: &str, property: &str, line: usize, column: usize, text: &str) -> SyntaxNode {
        SyntaxNode::new(
            NodeKind::MemberExpression { object: object.to_string(), property: property.to_string() },
            line,
            column,
            text,
        )
    }

    pub fn index_access(object: &str, line: usize, column: usize, text: &str, key: SyntaxNode) -> SyntaxNode {
        SyntaxNode::new(NodeKind::IndexAccess { object: object.to_string() }, line, column, text)
            .with_children(vec![key])
    }

    pub fn variable_decl(name: &str, init_preview: Option<String>, line: usize, column: usize, text: &str) -> SyntaxNode {
        SyntaxNode::new(NodeKind::VariableDecl { name: name.to_string(), init_preview }, line, column, text)
    }

    pub fn template_literal(line: usize, column: usize, text: &str, interpolations: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(NodeKind::TemplateLiteral, line, column, text).with_children(interpolations)
    }

    pub fn object_literal(line: usize, column: usize, text: &str, properties: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(NodeKind::ObjectLiteral, line, column, text).with_children(properties)
    }

    pub fn property(key: &str, line: usize, column: usize, text: &str, value: SyntaxNode) -> SyntaxNode {
        SyntaxNode::new(NodeKind::Property { key: key.to_string() }, line, column, text).with_children(vec![value])
    }
}
