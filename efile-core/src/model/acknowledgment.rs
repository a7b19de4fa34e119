use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The regulator's verdict on one submission.
///
/// Immutable once recorded; each status check produces a fresh value rather
/// than mutating an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub submission_id: String,
    pub status: AcknowledgmentStatus,
    /// Document control number, issued only on acceptance.
    pub dcn: Option<String>,
    pub errors: Vec<AckError>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcknowledgmentStatus {
    Accepted,
    Rejected,
    Pending,
}

impl AcknowledgmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckError {
    /// Regulator business-rule code as received on the wire.
    pub code: String,
    pub category: ErrorCategory,
    pub message: String,
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Blocks the submission; a corrected return may be resubmitted.
    Reject,
    /// Informational; the submission still stands.
    Alert,
}

impl ErrorCategory {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("alert") {
            Self::Alert
        } else {
            Self::Reject
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn category_parse_defaults_to_reject() {
        assert_eq!(ErrorCategory::parse("Reject"), ErrorCategory::Reject);
        assert_eq!(ErrorCategory::parse("ALERT"), ErrorCategory::Alert);
        assert_eq!(ErrorCategory::parse("garbage"), ErrorCategory::Reject);
    }
}
