wire_enum! {
    /// Sensitivity tier of an artifact. Ordered: `L1 < L2 < L3`.
    #[derive(PartialOrd, Ord)]
    pub enum RiskGrade {
        /// Empty or trivially low-risk content.
        L1 => "L1",
        /// Ordinary code.
        L2 => "L2",
        /// Security-sensitive code. Always requires human approval.
        L3 => "L3",
    }
}

impl RiskGrade {
    /// One step up, saturating at L3.
    pub fn escalate(self) -> Self {
        match self {
            Self::L1 => Self::L2,
            Self::L2 | Self::L3 => Self::L3,
        }
    }

    /// The trust context an outcome at this grade is scored under.
    pub fn risk_context(self) -> RiskContext {
        match self {
            Self::L3 => RiskContext::HighRisk,
            Self::L1 | Self::L2 => RiskContext::LowRisk,
        }
    }
}

wire_enum! {
    /// Context that selects the EWMA smoothing factor.
    pub enum RiskContext {
        HighRisk => "HIGH_RISK",
        LowRisk => "LOW_RISK",
    }
}
