//! Syntax front-ends for the languages acidtest scans.
//!
//! Each front-end turns a code file into a [`SyntaxNode`] tree plus a flat
//! module summary (imports, functions, variables). A shared [`Lexer`] and
//! [`ExprParser`] do the expression-level work for both; only top-level
//! statement shape differs between the brace family and the indent family.

pub mod expr;
pub mod front_end;
pub mod javascript;
pub mod lexer;
pub mod python;

pub use front_end::{FrontEnd, ParseOutput};
pub use javascript::JavaScriptFrontEnd;
pub use python::PythonFrontEnd;

use std::path::Path;

use acidtest_core::{AcidError, Result};

/// Picks the front-end for a path by extension and parses with it.
pub fn parse_file(path: &Path, text: &str) -> Result<ParseOutput> {
    let front_ends: [&dyn FrontEnd; 2] = [&JavaScriptFrontEnd, &PythonFrontEnd];
    for fe in front_ends {
        if fe.can_parse(path) {
            return fe.parse(path, text);
        }
    }
    Err(AcidError::parse(path, "no front-end recognizes this extension"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_extension() {
        let out = parse_file(Path::new("a.js"), "const x = 1;").unwrap();
        assert_eq!(out.variables.len(), 1);
        let out = parse_file(Path::new("a.py"), "x = 1\n").unwrap();
        assert_eq!(out.variables.len(), 1);
    }

    #[test]
    fn unrecognized_extension_errors() {
        assert!(parse_file(Path::new("a.rb"), "puts 1").is_err());
    }
}
