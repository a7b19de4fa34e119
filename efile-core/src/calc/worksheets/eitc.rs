use rust_decimal::Decimal;

use crate::calc::common::{max, round_whole};
use crate::model::FilingStatus;
use crate::params::EitcParameters;

/// Earned income credit calculator.
///
/// The credit phases in on earned income, plateaus at the row maximum, and
/// phases out on AGI. Joint filers get a fixed upward adjustment to both the
/// phase-out start and the income ceiling.
pub struct EitcWorksheet<'a> {
    params: &'a EitcParameters,
}

impl<'a> EitcWorksheet<'a> {
    pub fn new(params: &'a EitcParameters) -> Self {
        Self { params }
    }

    /// # Form Reference
    /// Form 1040, line 27, per the EIC worksheet in the instructions.
    /// `investment_income` is taxable interest plus ordinary dividends; over
    /// the limit the filer is disqualified outright, as are separate filers.
    pub fn calculate(
        &self,
        filing_status: FilingStatus,
        qualifying_children: u32,
        earned_income: Decimal,
        adjusted_gross_income: Decimal,
        investment_income: Decimal,
    ) -> Decimal {
        if filing_status == FilingStatus::MarriedFilingSeparately {
            return Decimal::ZERO;
        }
        if investment_income > self.params.investment_income_limit {
            return Decimal::ZERO;
        }

        let row = self.params.row(qualifying_children as usize);
        let adjustment = if filing_status.is_joint() {
            self.params.joint_adjustment
        } else {
            Decimal::ZERO
        };

        let income_limit = row.income_limit + adjustment;
        if adjusted_gross_income > income_limit || earned_income > income_limit {
            return Decimal::ZERO;
        }

        let mut credit = (earned_income * row.phase_in_rate).min(row.max_credit);

        let phase_out_start = row.phase_out_start + adjustment;
        if adjusted_gross_income > phase_out_start {
            let reduction = (adjusted_gross_income - phase_out_start) * row.phase_out_rate;
            credit = max(Decimal::ZERO, credit - reduction);
        }

        round_whole(credit)
    }
}

// =============================================================================
// Tests
// =============================================================================
