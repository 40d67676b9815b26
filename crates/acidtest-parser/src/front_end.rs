//! The contract both language front-ends implement: can this file be
//! parsed, and if so, hand back a syntax tree plus the module-level
//! summary (imports, functions, variables) that layers 3 and 5 consume.
//!
//! A front-end never panics on malformed input. A file it cannot make
//! sense of becomes a `parse-error` finding upstream, not a crash.

use std::path::Path;

use acidtest_ast::{FunctionSummary, ImportSummary, SyntaxNode, VariableSummary};
use acidtest_core::Result;

pub struct ParseOutput {
    pub tree: SyntaxNode,
    pub imports: Vec<ImportSummary>,
    pub functions: Vec<FunctionSummary>,
    pub variables: Vec<VariableSummary>,
}

pub trait FrontEnd {
    fn can_parse(&self, path: &Path) -> bool;
    fn parse(&self, path: &Path, text: &str) -> Result<ParseOutput>;
}
