//! Business-rule reject codes and what a filer does about them.

use serde::{Deserialize, Serialize};

/// The reject codes this transmitter recognizes well enough to offer
/// remediation guidance. Anything else is carried through verbatim as
/// `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectCode {
    /// R0000-902-01: a return for this taxpayer identity was already
    /// accepted this year.
    DuplicateSubmission,
    /// IND-031-04: the primary taxpayer's prior-year AGI does not match
    /// agency records.
    PriorYearAgiMismatch,
    /// IND-032-04: the spouse's prior-year AGI does not match agency
    /// records.
    SpousePriorYearAgiMismatch,
    /// R0000-500-01: the primary name control and SSN do not match SSA
    /// records.
    PrimaryNameSsnMismatch,
    /// R0000-504-02: a dependent's name control and SSN do not match SSA
    /// records.
    DependentNameSsnMismatch,
    /// SEIC-F1040-501-02: a qualifying child claimed for the earned income
    /// credit does not reconcile with agency records.
    EitcQualifyingChildMismatch,
    /// IND-181-01: the taxpayer has an identity-protection PIN on file and
    /// the return arrived without it.
    MissingIdentityProtectionPin,
    Unknown(String),
}

impl RejectCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "R0000-902-01" => Self::DuplicateSubmission,
            "IND-031-04" => Self::PriorYearAgiMismatch,
            "IND-032-04" => Self::SpousePriorYearAgiMismatch,
            "R0000-500-01" => Self::PrimaryNameSsnMismatch,
            "R0000-504-02" => Self::DependentNameSsnMismatch,
            "SEIC-F1040-501-02" => Self::EitcQualifyingChildMismatch,
            "IND-181-01" => Self::MissingIdentityProtectionPin,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DuplicateSubmission => "R0000-902-01",
            Self::PriorYearAgiMismatch => "IND-031-04",
            Self::SpousePriorYearAgiMismatch => "IND-032-04",
            Self::PrimaryNameSsnMismatch => "R0000-500-01",
            Self::DependentNameSsnMismatch => "R0000-504-02",
            Self::EitcQualifyingChildMismatch => "SEIC-F1040-501-02",
            Self::MissingIdentityProtectionPin => "IND-181-01",
            Self::Unknown(code) => code,
        }
    }

    /// Plain-language next step shown to the filer alongside the agency's
    /// own message.
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::DuplicateSubmission => {
                "A return with this SSN was already accepted for the year. Verify the \
                 SSN was entered correctly; if it was, someone may have filed using \
                 this identity, so file Form 14039 (identity-theft affidavit) and \
                 submit the return on paper."
            }
            Self::PriorYearAgiMismatch => {
                "Re-enter the prior-year adjusted gross income exactly as it appears \
                 on the originally filed return for that year, not an amended figure. \
                 First-time filers with no prior-year return use 0."
            }
            Self::SpousePriorYearAgiMismatch => {
                "Re-enter the spouse's prior-year adjusted gross income exactly as \
                 originally filed. On a joint prior-year return both taxpayers use \
                 the same whole-return AGI."
            }
            Self::PrimaryNameSsnMismatch => {
                "Check the primary taxpayer's name and SSN against the Social \
                 Security card. The first four letters of the last name must match \
                 SSA records; a recent name change may not have reached the agency \
                 yet."
            }
            Self::DependentNameSsnMismatch => {
                "Check each dependent's name and SSN against their Social Security \
                 card. A recently corrected card can take several weeks to propagate \
                 into SSA records."
            }
            Self::EitcQualifyingChildMismatch => {
                "A child claimed for the earned income credit was claimed on another \
                 accepted return or does not match SSA records. Confirm the child's \
                 SSN and that no other filer claims the same child."
            }
            Self::MissingIdentityProtectionPin => {
                "This taxpayer has an identity-protection PIN on file. Enter the \
                 current-year six-digit IP PIN from the CP01A notice and retransmit."
            }
            Self::Unknown(_) => {
                "Correct the return per the agency's error message and resubmit. \
                 Codes not listed here are documented in the agency's business-rule \
                 catalog for the form and year."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for code in [
            "R0000-902-01",
            "IND-031-04",
            "IND-032-04",
            "R0000-500-01",
            "R0000-504-02",
            "SEIC-F1040-501-02",
            "IND-181-01",
        ] {
            let parsed = RejectCode::parse(code);
            assert!(!matches!(parsed, RejectCode::Unknown(_)), "{code}");
            assert_eq!(parsed.as_str(), code);
        }
    }

    #[test]
    fn unrecognized_codes_are_preserved_verbatim() {
        let parsed = RejectCode::parse("F1040-071-05");
        assert_eq!(parsed, RejectCode::Unknown("F1040-071-05".to_string()));
        assert_eq!(parsed.as_str(), "F1040-071-05");
    }

    #[test]
    fn duplicate_identity_guidance_points_at_the_affidavit() {
        let guidance = RejectCode::DuplicateSubmission.remediation();
        assert!(guidance.contains("Form 14039"));
    }

    #[test]
    fn agi_mismatch_guidance_demands_the_originally_filed_figure() {
        assert!(RejectCode::PriorYearAgiMismatch
            .remediation()
            .contains("exactly as it appears"));
        assert!(RejectCode::SpousePriorYearAgiMismatch
            .remediation()
            .contains("exactly as"));
    }
}
