use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "S" => Some(Self::Single),
            "MFJ" => Some(Self::MarriedFilingJointly),
            "MFS" => Some(Self::MarriedFilingSeparately),
            "HOH" => Some(Self::HeadOfHousehold),
            "QSS" => Some(Self::QualifyingSurvivingSpouse),
            _ => None,
        }
    }

    /// Numeric code used in the `IndividualReturnFilingStatusCd` element.
    pub fn mef_code(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::MarriedFilingJointly => 2,
            Self::MarriedFilingSeparately => 3,
            Self::HeadOfHousehold => 4,
            Self::QualifyingSurvivingSpouse => 5,
        }
    }

    pub fn is_joint(&self) -> bool {
        matches!(self, Self::MarriedFilingJointly)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_round_trips_every_status() {
        for status in FilingStatus::ALL {
            assert_eq!(FilingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(FilingStatus::parse("X"), None);
    }

    #[test]
    fn mef_codes_are_one_through_five() {
        let codes: Vec<u8> = FilingStatus::ALL.iter().map(|s| s.mef_code()).collect();

        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }
}
