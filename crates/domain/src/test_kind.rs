//! The closed set of supported hypothesis tests.

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hypothesis test selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    /// Student two-sample t-test with pooled variance
    TTest,
    /// One-way analysis of variance
    Anova,
    /// Chi-square test of independence on the group × value table
    ChiSquare,
    /// Mann-Whitney U rank-sum test
    MannWhitneyU,
    /// Wilcoxon signed-rank test on paired differences
    Wilcoxon,
    /// Kruskal-Wallis H test
    KruskalWallis,
}

/// How many groups a test expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRequirement {
    /// Exactly two groups; any other count yields a structural outcome
    ExactlyTwo,
    /// Two or more groups
    AtLeastTwo,
    /// No group-count check
    Any,
}

impl TestKind {
    /// Every supported test, in presentation order
    pub const ALL: [TestKind; 6] = [
        TestKind::TTest,
        TestKind::Anova,
        TestKind::ChiSquare,
        TestKind::MannWhitneyU,
        TestKind::Wilcoxon,
        TestKind::KruskalWallis,
    ];

    /// Canonical machine name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TTest => "t-test",
            Self::Anova => "anova",
            Self::ChiSquare => "chi-square",
            Self::MannWhitneyU => "mann-whitney-u",
            Self::Wilcoxon => "wilcoxon",
            Self::KruskalWallis => "kruskal-wallis",
        }
    }

    /// Human-readable name used in messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TTest => "t-test",
            Self::Anova => "ANOVA",
            Self::ChiSquare => "chi-square",
            Self::MannWhitneyU => "Mann-Whitney U",
            Self::Wilcoxon => "Wilcoxon",
            Self::KruskalWallis => "Kruskal-Wallis",
        }
    }

    /// Structural group requirement
    pub fn group_requirement(&self) -> GroupRequirement {
        match self {
            Self::TTest | Self::MannWhitneyU | Self::Wilcoxon => GroupRequirement::ExactlyTwo,
            Self::Anova | Self::KruskalWallis => GroupRequirement::AtLeastTwo,
            Self::ChiSquare => GroupRequirement::Any,
        }
    }

    /// Short description of what the test compares
    pub fn description(&self) -> &'static str {
        match self {
            Self::TTest => "Compares the means of two independent groups assuming equal variances",
            Self::Anova => "Compares the means of two or more groups",
            Self::ChiSquare => "Tests independence between group and value treated as categories",
            Self::MannWhitneyU => "Compares the distributions of two independent groups by rank",
            Self::Wilcoxon => "Compares two paired samples by the ranks of their differences",
            Self::KruskalWallis => "Compares the distributions of two or more groups by rank",
        }
    }

    /// Message used when the group count does not fit the test
    pub fn structural_message(&self) -> String {
        format!("{} requires exactly 2 groups", self.display_name())
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = EngineError;

    /// Case-insensitive; spaces and underscores are treated as hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "t-test" | "ttest" => Ok(Self::TTest),
            "anova" => Ok(Self::Anova),
            "chi-square" => Ok(Self::ChiSquare),
            "mann-whitney-u" => Ok(Self::MannWhitneyU),
            "wilcoxon" => Ok(Self::Wilcoxon),
            "kruskal-wallis" => Ok(Self::KruskalWallis),
            _ => Err(EngineError::UnknownTestKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for kind in TestKind::ALL {
            assert_eq!(kind.as_str().parse::<TestKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_display_labels() {
        assert_eq!("ANOVA".parse::<TestKind>().unwrap(), TestKind::Anova);
        assert_eq!(
            "Mann-Whitney U".parse::<TestKind>().unwrap(),
            TestKind::MannWhitneyU
        );
        assert_eq!("Wilcoxon".parse::<TestKind>().unwrap(), TestKind::Wilcoxon);
        assert_eq!(
            "Kruskal-Wallis".parse::<TestKind>().unwrap(),
            TestKind::KruskalWallis
        );
        for kind in TestKind::ALL {
            assert_eq!(kind.display_name().parse::<TestKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "bogus".parse::<TestKind>().unwrap_err();
        assert_eq!(err, EngineError::UnknownTestKind("bogus".into()));
    }

    #[test]
    fn test_structural_message() {
        assert_eq!(
            TestKind::MannWhitneyU.structural_message(),
            "Mann-Whitney U requires exactly 2 groups"
        );
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        assert_eq!(
            serde_json::to_string(&TestKind::KruskalWallis).unwrap(),
            "\"kruskal-wallis\""
        );
    }
}
