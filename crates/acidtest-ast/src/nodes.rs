//! The syntax tree shared by both front-ends.
//!
//! A closed tagged union rather than a string-keyed kind: per-kind data
//! lives in the variant payload, so a caller pattern-matching on `kind`
//! gets its fields for free instead of probing a loose attribute map.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Program,
    /// `import X from "mod"` / `require("mod")` / Python `import X` / `from X import Y`.
    Import { module: String, names: Vec<String> },
    FunctionDecl { name: Option<String>, params: Vec<String> },
    ClassDecl { name: String },
    Decorator { name: String },
    VariableDecl { name: String, init_preview: Option<String> },
    Assignment,
    CallExpression { callee: String },
    MemberExpression { object: String, property: String },
    NewExpression { callee: String },
    /// `G[...]` style index access.
    IndexAccess { object: String },
    Identifier { name: String },
    StringLiteral { value: String },
    NumberLiteral,
    BooleanLiteral,
    NullLiteral,
    TemplateLiteral,
    ObjectLiteral,
    Property { key: String },
    BinaryExpression { operator: String },
    Block,
    /// Catch-all for constructs neither front-end gives special treatment.
    Other { label: String },
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Program => "program",
            NodeKind::Import { .. } => "import",
            NodeKind::FunctionDecl { .. } => "function-decl",
            NodeKind::ClassDecl { .. } => "class-decl",
            NodeKind::Decorator { .. } => "decorator",
            NodeKind::VariableDecl { .. } => "variable-decl",
            NodeKind::Assignment => "assignment",
            NodeKind::CallExpression { .. } => "call-expression",
            NodeKind::MemberExpression { .. } => "member-expression",
            NodeKind::NewExpression { .. } => "new-expression",
            NodeKind::IndexAccess { .. } => "index-access",
            NodeKind::Identifier { .. } => "identifier",
            NodeKind::StringLiteral { .. } => "string-literal",
            NodeKind::NumberLiteral => "number-literal",
            NodeKind::BooleanLiteral => "boolean-literal",
            NodeKind::NullLiteral => "null-literal",
            NodeKind::TemplateLiteral => "template-literal",
            NodeKind::ObjectLiteral => "object-literal",
            NodeKind::Property { .. } => "property",
            NodeKind::BinaryExpression { .. } => "binary-expression",
            NodeKind::Block => "block",
            NodeKind::Other { .. } => "other",
        }
    }
}

/// One node in the tree. Line is 1-indexed, column is 0-indexed, matching
/// the position convention the rest of the pipeline uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub line: usize,
    pub column: usize,
    pub text: String,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self { kind, line, column, text: text.into(), children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn push_child(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    /// Depth-first pre-order visit of this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Module-level structure summary a front-end hands back alongside the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub imports: Vec<ImportSummary>,
    pub functions: Vec<FunctionSummary>,
    pub variables: Vec<VariableSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub module: String,
    pub names: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSummary {
    pub name: String,
    pub init_preview: Option<String>,
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_visits_pre_order() {
        let leaf = SyntaxNode::new(NodeKind::Identifier { name: "x".into() }, 1, 0, "x");
        let root = SyntaxNode::new(NodeKind::Program, 1, 0, "").with_children(vec![leaf]);
        let mut labels = Vec::new();
        root.walk(&mut |n| labels.push(n.kind.label()));
        assert_eq!(labels, vec!["program", "identifier"]);
    }
}
