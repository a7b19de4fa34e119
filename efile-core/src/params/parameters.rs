use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::FilingStatus;

use super::bracket::TaxBracket;
use super::credits::{ActcParameters, CtcParameters, EitcParameters};
use super::surtaxes::{AdditionalMedicareParameters, AmtParameters, NiitParameters};

/// Errors raised when a parameter set violates its structural invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    /// A filing status has no brackets at all.
    #[error("no tax brackets for filing status {0}")]
    EmptyBracketSchedule(&'static str),

    /// The first bracket of a schedule must start at zero income.
    #[error("bracket schedule for {status} starts at {min_income}, expected 0")]
    ScheduleStartsAboveZero {
        status: &'static str,
        min_income: Decimal,
    },

    /// Adjacent brackets must meet exactly, with no gap or overlap.
    #[error("bracket schedule for {status} is discontinuous at {min_income}")]
    ScheduleDiscontinuity {
        status: &'static str,
        min_income: Decimal,
    },

    /// Every schedule must end with an unbounded top bracket.
    #[error("bracket schedule for {0} does not cover all incomes")]
    ScheduleNotUnbounded(&'static str),

    /// A rate outside [0, 1].
    #[error("bracket rate for {status} out of range: {rate}")]
    InvalidRate {
        status: &'static str,
        rate: Decimal,
    },

    /// Parameters for this year were already published to the store.
    #[error("parameters for tax year {0} are already published")]
    YearAlreadyPublished(i32),
}

/// One value per filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerStatus<T> {
    pub single: T,
    pub married_filing_jointly: T,
    pub married_filing_separately: T,
    pub head_of_household: T,
    pub qualifying_surviving_spouse: T,
}

impl<T> PerStatus<T> {
    pub fn get(&self, status: FilingStatus) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
            FilingStatus::QualifyingSurvivingSpouse => &self.qualifying_surviving_spouse,
        }
    }
}

impl<T: Clone> PerStatus<T> {
    /// The same value for every filing status.
    pub fn uniform(value: T) -> Self {
        Self {
            single: value.clone(),
            married_filing_jointly: value.clone(),
            married_filing_separately: value.clone(),
            head_of_household: value.clone(),
            qualifying_surviving_spouse: value,
        }
    }
}

/// Qualified business income deduction parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QbiParameters {
    pub rate: Decimal,
    /// Taxable-income window over which the deduction phases to zero.
    pub phase_out_start: PerStatus<Decimal>,
    pub phase_out_end: PerStatus<Decimal>,
}

/// Self-employment tax rates and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeTaxParameters {
    pub ss_wage_max: Decimal,
    pub ss_tax_rate: Decimal,
    pub medicare_tax_rate: Decimal,
    /// Portion of net profit subject to SE tax, typically 92.35%.
    pub net_earnings_factor: Decimal,
    /// Deductible share of the computed tax, typically 50%.
    pub deduction_factor: Decimal,
    /// Net earnings at or below this amount owe no SE tax.
    pub min_se_threshold: Decimal,
}

/// Every bracket, threshold, and rate for one tax year.
///
/// Immutable once published. The bracket schedules must satisfy
/// [`TaxParameters::validate`]: each schedule starts at zero, bands meet
/// exactly, and the top band is unbounded, so every non-negative income maps
/// to exactly one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxParameters {
    pub tax_year: i32,
    pub brackets: PerStatus<Vec<TaxBracket>>,
    pub standard_deduction: PerStatus<Decimal>,
    pub eitc: EitcParameters,
    pub ctc: CtcParameters,
    pub actc: ActcParameters,
    pub amt: AmtParameters,
    pub niit: NiitParameters,
    pub additional_medicare: AdditionalMedicareParameters,
    pub qbi: QbiParameters,
    pub se_tax: SeTaxParameters,
    pub salt_cap: Decimal,
    pub educator_expense_cap: Decimal,
    pub student_loan_interest_cap: Decimal,
}

impl TaxParameters {
    /// Checks the bracket-coverage invariants for every filing status.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if any schedule is empty, starts above
    /// zero, has a gap or overlap between adjacent bands, carries a rate
    /// outside `[0, 1]`, or ends with a bounded top band.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for status in FilingStatus::ALL {
            Self::validate_schedule(status.as_str(), self.brackets.get(status))?;
        }
        Ok(())
    }

    fn validate_schedule(
        status: &'static str,
        schedule: &[TaxBracket],
    ) -> Result<(), ParameterError> {
        let Some(first) = schedule.first() else {
            return Err(ParameterError::EmptyBracketSchedule(status));
        };
        if first.min_income != Decimal::ZERO {
            return Err(ParameterError::ScheduleStartsAboveZero {
                status,
                min_income: first.min_income,
            });
        }

        for pair in schedule.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.max_income != Some(upper.min_income) {
                return Err(ParameterError::ScheduleDiscontinuity {
                    status,
                    min_income: upper.min_income,
                });
            }
        }

        for bracket in schedule {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(ParameterError::InvalidRate {
                    status,
                    rate: bracket.rate,
                });
            }
        }

        match schedule.last() {
            Some(last) if last.max_income.is_none() => Ok(()),
            _ => Err(ParameterError::ScheduleNotUnbounded(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::testutil::parameters_2024;

    use super::*;

    #[test]
    fn validate_accepts_published_2024_set() {
        let params = parameters_2024();

        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_schedule() {
        let mut params = parameters_2024();
        params.brackets.head_of_household.clear();

        let result = params.validate();

        assert_eq!(result, Err(ParameterError::EmptyBracketSchedule("HOH")));
    }

    #[test]
    fn validate_rejects_schedule_starting_above_zero() {
        let mut params = parameters_2024();
        params.brackets.single[0].min_income = dec!(100);

        let result = params.validate();

        assert_eq!(
            result,
            Err(ParameterError::ScheduleStartsAboveZero {
                status: "S",
                min_income: dec!(100),
            })
        );
    }

    #[test]
    fn validate_rejects_gap_between_brackets() {
        let mut params = parameters_2024();
        params.brackets.single[1].min_income = dec!(12000);

        let result = params.validate();

        assert_eq!(
            result,
            Err(ParameterError::ScheduleDiscontinuity {
                status: "S",
                min_income: dec!(12000),
            })
        );
    }

    #[test]
    fn validate_rejects_bounded_top_bracket() {
        let mut params = parameters_2024();
        let last = params.brackets.single.last_mut().unwrap();
        last.max_income = Some(dec!(9999999));

        let result = params.validate();

        assert_eq!(result, Err(ParameterError::ScheduleNotUnbounded("S")));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut params = parameters_2024();
        params.brackets.single[2].rate = dec!(1.1);

        let result = params.validate();

        assert_eq!(
            result,
            Err(ParameterError::InvalidRate {
                status: "S",
                rate: dec!(1.1),
            })
        );
    }

    #[test]
    fn per_status_uniform_repeats_value() {
        let thresholds = PerStatus::uniform(dec!(200000));

        for status in FilingStatus::ALL {
            assert_eq!(*thresholds.get(status), dec!(200000));
        }
    }
}
