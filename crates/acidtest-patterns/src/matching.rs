//! Applies a pattern's match specification against a blob of text. Shared
//! by the document scan (layer 2) and the regex sweep half of the code
//! scan (layer 3) — the only two layers that match against raw text
//! instead of a syntax tree.

use regex::RegexBuilder;

use acidtest_core::pattern::{MatchKind, MatchSpec};

/// Summary of every place a pattern matched within one text blob.
pub struct MatchResult {
    pub first_line: usize,
    pub first_evidence: String,
    pub count: usize,
}

/// Returns `None` when the pattern does not match at all, or when its kind
/// is `syntax-node` (those are matched against the tree directly by the
/// code-scan layer, not here).
pub fn find(spec: &MatchSpec, text: &str) -> Option<MatchResult> {
    match spec.kind {
        MatchKind::Regex => find_regex(spec, text),
        MatchKind::Substring => find_substring(spec, text),
        MatchKind::SyntaxNode => None,
    }
}

fn find_regex(spec: &MatchSpec, text: &str) -> Option<MatchResult> {
    let case_insensitive = spec.flags.as_deref().map(|f| f.contains('i')).unwrap_or(false);
    let re = RegexBuilder::new(&spec.value).case_insensitive(case_insensitive).build().ok()?;
    let mut count = 0usize;
    let mut first: Option<(usize, String)> = None;
    for m in re.find_iter(text) {
        count += 1;
        if first.is_none() {
            let line = line_of(text, m.start());
            first = Some((line, m.as_str().to_string()));
        }
    }
    first.map(|(line, evidence)| MatchResult { first_line: line, first_evidence: evidence, count })
}

fn find_substring(spec: &MatchSpec, text: &str) -> Option<MatchResult> {
    let mut count = 0usize;
    let mut first_line = None;
    let mut start = 0;
    while let Some(idx) = text[start..].find(&spec.value) {
        let abs = start + idx;
        count += 1;
        if first_line.is_none() {
            first_line = Some(line_of(text, abs));
        }
        start = abs + spec.value.len().max(1);
    }
    first_line.map(|line| MatchResult { first_line: line, first_evidence: spec.value.clone(), count })
}

fn line_of(text: &str, byte_offset: usize) -> usize {
    text.as_bytes()[..byte_offset.min(text.len())].iter().filter(|&&b| b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_counts_every_occurrence() {
        let spec = MatchSpec::regex("foo");
        let result = find(&spec, "foo\nbar\nfoo").unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.first_line, 1);
    }

    #[test]
    fn substring_reports_first_line() {
        let spec = MatchSpec::substring("secret");
        let result = find(&spec, "a\nb has secret\nc has secret too").unwrap();
        assert_eq!(result.first_line, 2);
        assert_eq!(result.count, 2);
    }

    #[test]
    fn no_match_returns_none() {
        let spec = MatchSpec::regex("zzz_not_present");
        assert!(find(&spec, "nothing here").is_none());
    }
}
