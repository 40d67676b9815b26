//! acidtest — security scanner for AI-agent code bundles.
//!
//! Re-exports the workspace crates that make up the analysis kernel: bundle
//! loading, the pattern store, the syntax front-ends, the dataflow engine,
//! and the layer-scanner pipeline that produces a [`scan::ScanResult`].

pub use acidtest_core as core;
pub use acidtest_ast as ast;
pub use acidtest_parser as parser;
pub use acidtest_patterns as patterns;
pub use acidtest_dataflow as dataflow;
pub use acidtest_bundle as bundle;
pub use acidtest_scan as scan;

pub use acidtest_core::{
    AcidError, Bundle, Confidence, Finding, Manifest, Pattern, Remediation, Result, Severity,
    Status,
};
pub use acidtest_bundle::load_bundle;
pub use acidtest_scan::{run_scan, ScanConfig};

/// Crate version, forwarded for inclusion in [`acidtest_core::ScanResult::version`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
