//! Risk classification bands shared by diagnostics and reporting.

/// Qualitative band a risk value falls into, ordered from least to most
/// dangerous.  Thresholds live in [`SafetyThresholds`](crate::SafetyThresholds).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskLevel {
    #[default]
    Safe,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Safe,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Human-readable label, useful for reports and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Safe     => "safe",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High     => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// `true` for `High` and `Critical`.
    #[inline]
    pub fn is_flagged(self) -> bool {
        self >= RiskLevel::High
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
