//! Syntax tree node representation shared by the brace-family and
//! indent-family front-ends.

pub mod builder;
pub mod nodes;

pub use builder::NodeBuilder;
pub use nodes::{FunctionSummary, ImportSummary, ModuleSummary, NodeKind, SyntaxNode, VariableSummary};
