use rust_decimal::Decimal;

use crate::calc::common::{max, round_whole};
use crate::model::FilingStatus;
use crate::params::{ActcParameters, CtcParameters};

/// Everything the child credit worksheet needs from the rest of the return.
#[derive(Debug, Clone)]
pub struct ChildCreditInput {
    pub qualifying_children: u32,
    pub other_dependents: u32,
    pub filing_status: FilingStatus,
    pub adjusted_gross_income: Decimal,
    /// Income tax plus surtax add-ons; the nonrefundable credit caps here.
    pub tax_before_credits: Decimal,
    pub earned_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCreditResult {
    /// Phased-out credit pool for qualifying children.
    pub child_tax_credit: Decimal,
    /// Phased-out credit pool for other dependents.
    pub other_dependent_credit: Decimal,
    /// The amount actually allowed against tax this year.
    pub allowed_credit: Decimal,
    /// Refundable portion claimed through Schedule 8812.
    pub additional_child_tax_credit: Decimal,
}

/// Schedule 8812 calculator: child tax credit, credit for other dependents,
/// and the refundable additional child tax credit.
pub struct ChildCreditWorksheet<'a> {
    ctc: &'a CtcParameters,
    actc: &'a ActcParameters,
}

impl<'a> ChildCreditWorksheet<'a> {
    pub fn new(ctc: &'a CtcParameters, actc: &'a ActcParameters) -> Self {
        Self { ctc, actc }
    }

    pub fn calculate(&self, input: &ChildCreditInput) -> ChildCreditResult {
        let (child_tax_credit, other_dependent_credit) = self.phased_pools(input);
        let combined = child_tax_credit + other_dependent_credit;
        let allowed_credit = combined.min(input.tax_before_credits);
        let additional_child_tax_credit = self.refundable_portion(input, child_tax_credit);

        ChildCreditResult {
            child_tax_credit,
            other_dependent_credit,
            allowed_credit,
            additional_child_tax_credit,
        }
    }

    /// Credit pools after the high-income phase-out.
    ///
    /// # Form Reference
    /// Schedule 8812, lines 1-5 and the Line 5 worksheet: the combined pool
    /// shrinks by the phase-out rate per step of AGI over the threshold, and
    /// the reduction is shared across both pools in proportion.
    fn phased_pools(&self, input: &ChildCreditInput) -> (Decimal, Decimal) {
        let ctc_pool = Decimal::from(input.qualifying_children) * self.ctc.credit_per_child;
        let odc_pool = Decimal::from(input.other_dependents) * self.ctc.credit_per_other_dependent;
        let combined = ctc_pool + odc_pool;
        if combined == Decimal::ZERO {
            return (Decimal::ZERO, Decimal::ZERO);
        }

        let threshold = *self.ctc.phase_out_threshold.get(input.filing_status);
        if input.adjusted_gross_income <= threshold {
            return (ctc_pool, odc_pool);
        }

        let excess = input.adjusted_gross_income - threshold;
        let steps = (excess / self.ctc.phase_out_step).ceil();
        let reduced = max(Decimal::ZERO, combined - steps * self.ctc.phase_out_rate);
        let ratio = reduced / combined;
        (round_whole(ctc_pool * ratio), round_whole(odc_pool * ratio))
    }

    /// Refundable additional child tax credit.
    ///
    /// # Form Reference
    /// Schedule 8812, Part II-A: the unused child-credit pool, limited by 15%
    /// of earned income over the floor and by the per-child refundable cap.
    fn refundable_portion(&self, input: &ChildCreditInput, ctc_pool: Decimal) -> Decimal {
        let nonrefundable = ctc_pool.min(input.tax_before_credits);
        let unused = ctc_pool - nonrefundable;
        if unused <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        if input.earned_income <= self.actc.earned_income_floor {
            return Decimal::ZERO;
        }

        let earned_limit =
            (input.earned_income - self.actc.earned_income_floor) * self.actc.refundable_rate;
        let per_child_cap =
            Decimal::from(input.qualifying_children) * self.actc.max_refundable_per_child;
        round_whole(unused.min(earned_limit).min(per_child_cap))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::testutil::parameters_2024;

    fn input(qualifying: u32, other: u32) -> ChildCreditInput {
        ChildCreditInput {
            qualifying_children: qualifying,
            other_dependents: other,
            filing_status: FilingStatus::MarriedFilingJointly,
            adjusted_gross_income: dec!(75000),
            tax_before_credits: dec!(5032),
            earned_income: dec!(75000),
        }
    }

    #[test]
    fn no_dependents_yields_no_credit() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let result = worksheet.calculate(&input(0, 0));
        assert_eq!(result.child_tax_credit, dec!(0));
        assert_eq!(result.other_dependent_credit, dec!(0));
        assert_eq!(result.allowed_credit, dec!(0));
        assert_eq!(result.additional_child_tax_credit, dec!(0));
    }

    #[test]
    fn two_children_under_the_threshold() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let result = worksheet.calculate(&input(2, 0));
        assert_eq!(result.child_tax_credit, dec!(4000));
        assert_eq!(result.other_dependent_credit, dec!(0));
        assert_eq!(result.allowed_credit, dec!(4000));
        // The whole pool is absorbed against tax, so nothing is refundable.
        assert_eq!(result.additional_child_tax_credit, dec!(0));
    }

    #[test]
    fn phase_out_reduces_the_pool_per_thousand_over_the_threshold() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let mut over = input(1, 0);
        over.filing_status = FilingStatus::Single;
        over.adjusted_gross_income = dec!(205000);
        over.tax_before_credits = dec!(40000);

        let result = worksheet.calculate(&over);
        // 5000 over the threshold is five steps of 50.
        assert_eq!(result.child_tax_credit, dec!(1750));
    }

    #[test]
    fn partial_steps_round_up() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let mut over = input(1, 0);
        over.filing_status = FilingStatus::Single;
        over.adjusted_gross_income = dec!(200001);
        over.tax_before_credits = dec!(40000);

        let result = worksheet.calculate(&over);
        assert_eq!(result.child_tax_credit, dec!(1950));
    }

    #[test]
    fn phase_out_is_shared_across_both_pools() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let mut over = input(1, 1);
        over.filing_status = FilingStatus::Single;
        over.adjusted_gross_income = dec!(210000);
        over.tax_before_credits = dec!(40000);

        let result = worksheet.calculate(&over);
        // Pool of 2500 reduced by 500; each pool keeps 80%.
        assert_eq!(result.child_tax_credit, dec!(1600));
        assert_eq!(result.other_dependent_credit, dec!(400));
    }

    #[test]
    fn phase_out_can_eliminate_the_credit_entirely() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let mut over = input(2, 1);
        over.filing_status = FilingStatus::Single;
        over.adjusted_gross_income = dec!(500000);
        over.tax_before_credits = dec!(100000);

        let result = worksheet.calculate(&over);
        assert_eq!(result.child_tax_credit, dec!(0));
        assert_eq!(result.other_dependent_credit, dec!(0));
    }

    #[test]
    fn refundable_portion_when_tax_is_too_small_to_absorb_the_pool() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let low_tax = ChildCreditInput {
            qualifying_children: 1,
            other_dependents: 0,
            filing_status: FilingStatus::HeadOfHousehold,
            adjusted_gross_income: dec!(25000),
            tax_before_credits: dec!(310),
            earned_income: dec!(25000),
        };

        let result = worksheet.calculate(&low_tax);
        assert_eq!(result.child_tax_credit, dec!(2000));
        assert_eq!(result.allowed_credit, dec!(310));
        // 1690 unused, earned limit 3375, per-child cap 1700.
        assert_eq!(result.additional_child_tax_credit, dec!(1690));
    }

    #[test]
    fn refundable_portion_requires_earned_income_over_the_floor() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let mut no_earnings = input(1, 0);
        no_earnings.tax_before_credits = dec!(0);
        no_earnings.earned_income = dec!(2500);

        let result = worksheet.calculate(&no_earnings);
        assert_eq!(result.additional_child_tax_credit, dec!(0));
    }

    #[test]
    fn refundable_portion_is_capped_per_child() {
        let params = parameters_2024();
        let worksheet = ChildCreditWorksheet::new(&params.ctc, &params.actc);

        let mut zero_tax = input(3, 0);
        zero_tax.tax_before_credits = dec!(0);
        zero_tax.earned_income = dec!(50000);

        let result = worksheet.calculate(&zero_tax);
        // Unused pool 6000 and earned limit 7125, but the cap is 3 * 1700.
        assert_eq!(result.additional_child_tax_credit, dec!(5100));
    }
}
