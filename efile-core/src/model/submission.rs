use serde::{Deserialize, Serialize};

/// One filing attempt handed to the transport layer.
///
/// `status` and `attempts` are the only mutable fields; they advance only
/// through the transmission state machine, never by direct assignment from
/// callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub submission_id: String,
    pub tax_year: i32,
    pub submission_type: SubmissionType,
    pub xml_payload: String,
    pub status: SubmissionStatus,
    /// Transmission attempts so far, counted when transmission starts.
    pub attempts: u32,
}

impl Submission {
    pub fn new(submission_id: String, tax_year: i32, xml_payload: String) -> Self {
        Self {
            submission_id,
            tax_year,
            submission_type: SubmissionType::Form1040,
            xml_payload,
            status: SubmissionStatus::Pending,
            attempts: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionType {
    Form1040,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form1040 => "1040",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Transmitting,
    Transmitted,
    Accepted,
    Rejected,
    Error,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Transmitting => "transmitting",
            Self::Transmitted => "transmitted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }

    /// Terminal statuses need no further transport activity.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_submission_starts_pending_with_zero_attempts() {
        let submission = Submission::new("12345620ABCDEF".to_string(), 2024, "<Return/>".to_string());

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.attempts, 0);
        assert_eq!(submission.submission_type.as_str(), "1040");
    }

    #[test]
    fn only_accepted_is_terminal() {
        assert!(SubmissionStatus::Accepted.is_terminal());
        assert!(!SubmissionStatus::Rejected.is_terminal());
        assert!(!SubmissionStatus::Error.is_terminal());
        assert!(!SubmissionStatus::Pending.is_terminal());
    }
}
