//! Inspection recency bands

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecencyBand {
    /// Due date within the last 90 days (or in the future)
    Recent,
    /// Due date within the last 365 days
    Aging,
    Stale,
}

impl RecencyBand {
    pub const ALL: [RecencyBand; 3] = [RecencyBand::Recent, RecencyBand::Aging, RecencyBand::Stale];

    /// Row fill color (hex, no marker)
    pub fn color(&self) -> &'static str {
        match self {
            RecencyBand::Recent => "007500",
            RecencyBand::Aging => "FFA500",
            RecencyBand::Stale => "b30000",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecencyBand::Recent => "recent",
            RecencyBand::Aging => "aging",
            RecencyBand::Stale => "stale",
        }
    }
}

impl std::fmt::Display for RecencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
