use serde::{Deserialize, Serialize};

/// Severity band for a [`crate::Finding`] or a [`crate::Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Deduction weight used by the scorer.
    pub fn weight(self) -> u32 {
        match self {
            Severity::Critical => 25,
            Severity::High => 15,
            Severity::Medium => 8,
            Severity::Low => 3,
            Severity::Info => 0,
        }
    }

    /// One notch down, used by domain reweighting. `Info` has no lower notch.
    pub fn lower_notch(self) -> Severity {
        match self {
            Severity::Critical => Severity::High,
            Severity::High => Severity::Medium,
            Severity::Medium => Severity::Low,
            Severity::Low => Severity::Info,
            Severity::Info => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        write!(f, "{s}")
    }
}

/// Status band assigned to a completed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Warn,
    Fail,
    Danger,
    /// Reserved for abort paths; never derived from a findings sequence.
    Error,
}

impl Status {
    /// Status band for a score in `[0, 100]`. Never returns `Error`.
    pub fn from_score(score: u32) -> Self {
        match score {
            80..=100 => Status::Pass,
            50..=79 => Status::Warn,
            20..=49 => Status::Fail,
            _ => Status::Danger,
        }
    }
}

/// Confidence band derived from dataflow path length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Confidence band for a path of `len` nodes (source and sink inclusive).
    pub fn from_path_len(len: usize) -> Self {
        match len {
            0..=5 => Confidence::High,
            6..=10 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_weights_match_spec() {
        assert_eq!(Severity::Critical.weight(), 25);
        assert_eq!(Severity::High.weight(), 15);
        assert_eq!(Severity::Medium.weight(), 8);
        assert_eq!(Severity::Low.weight(), 3);
        assert_eq!(Severity::Info.weight(), 0);
    }

    #[test]
    fn status_bands_match_boundaries() {
        assert_eq!(Status::from_score(100), Status::Pass);
        assert_eq!(Status::from_score(80), Status::Pass);
        assert_eq!(Status::from_score(79), Status::Warn);
        assert_eq!(Status::from_score(50), Status::Warn);
        assert_eq!(Status::from_score(49), Status::Fail);
        assert_eq!(Status::from_score(20), Status::Fail);
        assert_eq!(Status::from_score(19), Status::Danger);
        assert_eq!(Status::from_score(0), Status::Danger);
    }

    #[test]
    fn confidence_bands_match_path_length() {
        assert_eq!(Confidence::from_path_len(2), Confidence::High);
        assert_eq!(Confidence::from_path_len(5), Confidence::High);
        assert_eq!(Confidence::from_path_len(6), Confidence::Medium);
        assert_eq!(Confidence::from_path_len(10), Confidence::Medium);
        assert_eq!(Confidence::from_path_len(11), Confidence::Low);
    }

    #[test]
    fn lower_notch_steps_down_one_band() {
        assert_eq!(Severity::Medium.lower_notch(), Severity::Low);
        assert_eq!(Severity::Low.lower_notch(), Severity::Info);
        assert_eq!(Severity::Info.lower_notch(), Severity::Info);
    }
}
