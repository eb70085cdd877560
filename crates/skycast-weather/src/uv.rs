//! UV index severity scale.

/// Lower bound of each severity band, ascending
pub const UV_THRESHOLDS: [f64; 5] = [0.0, 3.0, 6.0, 8.0, 11.0];

/// Qualitative UV index category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvSeverity {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvSeverity {
    const SCALE: [UvSeverity; 5] = [
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::VeryHigh,
        Self::Extreme,
    ];

    /// Band whose threshold is the greatest one not above `value`.
    /// Anything below the first threshold (and NaN) is `Low`.
    pub fn from_index(value: f64) -> Self {
        let band = UV_THRESHOLDS
            .iter()
            .rposition(|threshold| *threshold <= value)
            .unwrap_or(0);
        Self::SCALE[band]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very-high",
            Self::Extreme => "extreme",
        }
    }

    /// Display color for the band
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "gold",
            Self::High => "orange",
            Self::VeryHigh => "red",
            Self::Extreme => "purple",
        }
    }
}

impl std::fmt::Display for UvSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
