use std::fmt;

/// Tier assigned to a sender-authentication TXT record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureTier {
    /// `-all` for SPF, `p=reject` for DMARC.
    StrictPass,
    /// `~all` for SPF, `p=quarantine` for DMARC.
    ModeratePass,
    /// `+all` for SPF, `p=none` for DMARC.
    LaxFail,
    /// The record could not be resolved.
    Absent,
}

impl fmt::Display for PostureTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StrictPass => "strict-pass",
            Self::ModeratePass => "moderate-pass",
            Self::LaxFail => "lax-fail",
            Self::Absent => "absent",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Spf,
    Dmarc,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Spf => "SPF",
            Self::Dmarc => "DMARC",
        })
    }
}

/// A TXT record together with the tier it was classified into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub record: String,
    pub tier: PostureTier,
}

/// Outcome of checking one record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordCheck {
    /// The name resolved. Holds one entry per record carrying the kind's
    /// marker and a recognised qualifier; other records are ignored, so the
    /// list may be empty.
    Classified(Vec<Classification>),
    /// Resolution failed or returned no TXT data.
    Absent { reason: String },
}

impl RecordCheck {
    /// Tiers reported for this check, `Absent` included.
    pub fn tiers(&self) -> Vec<PostureTier> {
        match self {
            Self::Classified(items) => items.iter().map(|item| item.tier).collect(),
            Self::Absent { .. } => vec![PostureTier::Absent],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostureReport {
    pub domain: String,
    pub spf: RecordCheck,
    pub dmarc: RecordCheck,
}

impl PostureReport {
    pub(crate) fn new(domain: String, spf: RecordCheck, dmarc: RecordCheck) -> Self {
        Self { domain, spf, dmarc }
    }

    pub fn check(&self, kind: RecordKind) -> &RecordCheck {
        match kind {
            RecordKind::Spf => &self.spf,
            RecordKind::Dmarc => &self.dmarc,
        }
    }
}
