use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::calc::common::{max, round_whole};
use crate::calc::worksheets::{
    AmtWorksheet, ChildCreditInput, ChildCreditWorksheet, EitcWorksheet, SeTaxError, SeTaxWorksheet,
};
use crate::model::{ComputedResult, DeductionElection, FilingStatus, Income, TaxReturn};
use crate::params::TaxParameters;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error("return is for tax year {return_year} but parameters cover {parameter_year}")]
    TaxYearMismatch {
        return_year: i32,
        parameter_year: i32,
    },
    #[error("negative amount for {field}: {amount}")]
    NegativeAmount {
        field: &'static str,
        amount: Decimal,
    },
    #[error("no rate schedule bracket covers taxable income {0}")]
    NoBracketForIncome(Decimal),
    #[error(transparent)]
    SeTax(#[from] SeTaxError),
}

/// Form 1040 engine for a single year's parameters.
///
/// `compute` is a pure function of the return and the parameter set: the same
/// inputs always produce the same [`ComputedResult`]. Business conditions
/// (zero income, phased-out credits, a balance due) are results, not errors;
/// only malformed input or a broken parameter set returns `Err`.
pub struct ReturnCalculator<'a> {
    params: &'a TaxParameters,
}

impl<'a> ReturnCalculator<'a> {
    pub fn new(params: &'a TaxParameters) -> Self {
        Self { params }
    }

    pub fn compute(&self, tax_return: &TaxReturn) -> Result<ComputedResult, CalcError> {
        self.check_input(tax_return)?;

        let income = &tax_return.income;
        let filing_status = tax_return.filing_status;
        let wages = income.total_wages();
        let business_profit = income.business_net_profit();

        let se = SeTaxWorksheet::new(&self.params.se_tax)
            .calculate(business_profit, income.total_social_security_wages())?;

        let total_income = round_whole(
            wages
                + income.taxable_interest
                + income.ordinary_dividends
                + income.capital_gains
                + business_profit
                + income.other_income,
        );
        let total_adjustments = self.adjustments_total(tax_return, se.deduction);
        let adjusted_gross_income = max(Decimal::ZERO, total_income - total_adjustments);

        let (deduction, used_itemized_deduction) = self.deduction(tax_return);
        let qbi_deduction =
            self.qbi_deduction(filing_status, business_profit, adjusted_gross_income);
        let taxable_income =
            max(Decimal::ZERO, adjusted_gross_income - deduction - qbi_deduction);

        let income_tax = self.bracket_tax(filing_status, taxable_income)?;

        let amt = AmtWorksheet::new(&self.params.amt).calculate(filing_status, adjusted_gross_income);
        let additional_medicare_tax = self.additional_medicare_tax(filing_status, wages);
        let net_investment_income_tax =
            self.net_investment_income_tax(filing_status, income, adjusted_gross_income);
        let tax_before_credits =
            income_tax + amt.net_liability + additional_medicare_tax + net_investment_income_tax;

        let qualifying_children =
            tax_return.dependents.iter().filter(|d| d.ctc_eligible).count() as u32;
        let other_dependents =
            tax_return.dependents.iter().filter(|d| d.odc_eligible).count() as u32;
        let earned_income = wages + business_profit;

        let credits = ChildCreditWorksheet::new(&self.params.ctc, &self.params.actc).calculate(
            &ChildCreditInput {
                qualifying_children,
                other_dependents,
                filing_status,
                adjusted_gross_income,
                tax_before_credits,
                earned_income,
            },
        );
        let total_credits = credits.allowed_credit;
        let tax_after_credits = max(Decimal::ZERO, tax_before_credits - total_credits);
        let total_tax = tax_after_credits + se.self_employment_tax;

        let earned_income_credit = EitcWorksheet::new(&self.params.eitc).calculate(
            filing_status,
            qualifying_children,
            earned_income,
            adjusted_gross_income,
            income.taxable_interest + income.ordinary_dividends,
        );

        let withholding = income.total_withholding();
        let total_payments = withholding
            + tax_return.estimated_payments
            + earned_income_credit
            + credits.additional_child_tax_credit;

        let refund = max(Decimal::ZERO, total_payments - total_tax);
        let amount_owed = max(Decimal::ZERO, total_tax - total_payments);

        debug!(
            tax_year = tax_return.tax_year,
            agi = %adjusted_gross_income,
            taxable_income = %taxable_income,
            total_tax = %total_tax,
            "return computed"
        );

        Ok(ComputedResult {
            tax_year: tax_return.tax_year,
            total_income,
            total_adjustments,
            adjusted_gross_income,
            deduction,
            used_itemized_deduction,
            qbi_deduction,
            taxable_income,
            income_tax,
            additional_medicare_tax,
            net_investment_income_tax,
            amt,
            tax_before_credits,
            child_tax_credit: credits.child_tax_credit,
            other_dependent_credit: credits.other_dependent_credit,
            total_credits,
            tax_after_credits,
            self_employment_tax: se.self_employment_tax,
            total_tax,
            withholding,
            earned_income_credit,
            additional_child_tax_credit: credits.additional_child_tax_credit,
            estimated_payments: tax_return.estimated_payments,
            total_payments,
            refund,
            amount_owed,
        })
    }

    fn check_input(&self, tax_return: &TaxReturn) -> Result<(), CalcError> {
        if tax_return.tax_year != self.params.tax_year {
            return Err(CalcError::TaxYearMismatch {
                return_year: tax_return.tax_year,
                parameter_year: self.params.tax_year,
            });
        }

        let income = &tax_return.income;
        for w2 in &income.w2s {
            Self::require_non_negative("W-2 wages", w2.wages)?;
            Self::require_non_negative("W-2 federal withholding", w2.federal_withholding)?;
        }
        Self::require_non_negative("taxable interest", income.taxable_interest)?;
        Self::require_non_negative("ordinary dividends", income.ordinary_dividends)?;
        Self::require_non_negative("qualified dividends", income.qualified_dividends)?;
        Self::require_non_negative("estimated payments", tax_return.estimated_payments)?;
        Ok(())
    }

    fn require_non_negative(field: &'static str, amount: Decimal) -> Result<(), CalcError> {
        if amount < Decimal::ZERO {
            return Err(CalcError::NegativeAmount { field, amount });
        }
        Ok(())
    }

    /// Above-the-line adjustments.
    ///
    /// # Form Reference
    /// Schedule 1, Part II: educator expenses and student loan interest are
    /// capped, the SE tax deduction comes off the Schedule SE result, and the
    /// rest pass through as claimed.
    fn adjustments_total(&self, tax_return: &TaxReturn, se_deduction: Decimal) -> Decimal {
        let adj = &tax_return.adjustments;
        let educator = adj.educator_expenses.min(self.params.educator_expense_cap);
        let student_loan = adj
            .student_loan_interest
            .min(self.params.student_loan_interest_cap);
        round_whole(
            educator
                + adj.hsa_deduction
                + se_deduction
                + adj.self_employed_health_insurance
                + adj.ira_deduction
                + student_loan,
        )
    }

    /// Standard-or-itemized deduction and which one was used.
    ///
    /// An itemized election only sticks when the itemized total actually
    /// beats the standard deduction; otherwise the standard amount applies.
    fn deduction(&self, tax_return: &TaxReturn) -> (Decimal, bool) {
        let standard = *self.params.standard_deduction.get(tax_return.filing_status);
        match &tax_return.deduction {
            DeductionElection::Standard => (standard, false),
            DeductionElection::Itemized(detail) => {
                let salt = detail.salt_total().min(self.params.salt_cap);
                let itemized = round_whole(
                    detail.medical_expenses
                        + salt
                        + detail.mortgage_interest
                        + detail.mortgage_insurance_premiums
                        + detail.charitable_cash
                        + detail.charitable_noncash
                        + detail.casualty_losses
                        + detail.other,
                );
                if itemized > standard {
                    (itemized, true)
                } else {
                    (standard, false)
                }
            }
        }
    }

    /// Qualified business income deduction.
    ///
    /// # Form Reference
    /// Form 8995: 20% of Schedule C profit, phased down to zero across the
    /// AGI window where the wage and basis limits would take over.
    fn qbi_deduction(
        &self,
        filing_status: FilingStatus,
        business_profit: Decimal,
        agi: Decimal,
    ) -> Decimal {
        if business_profit <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let full = business_profit * self.params.qbi.rate;
        let start = *self.params.qbi.phase_out_start.get(filing_status);
        let end = *self.params.qbi.phase_out_end.get(filing_status);

        if agi <= start {
            return round_whole(full);
        }
        if agi >= end {
            return Decimal::ZERO;
        }

        let phased_out_share = (agi - start) / (end - start);
        round_whole(full * (Decimal::ONE - phased_out_share))
    }

    /// Tax from the rate schedules.
    ///
    /// # Form Reference
    /// Form 1040, line 16, using the schedule formula directly: each bracket
    /// carries the cumulative tax at its floor plus the marginal rate.
    fn bracket_tax(
        &self,
        filing_status: FilingStatus,
        taxable_income: Decimal,
    ) -> Result<Decimal, CalcError> {
        let schedule = self.params.brackets.get(filing_status);
        for bracket in schedule {
            let within = match bracket.max_income {
                Some(max_income) => taxable_income <= max_income,
                None => true,
            };
            if within {
                let tax = bracket.base_tax + (taxable_income - bracket.min_income) * bracket.rate;
                return Ok(round_whole(tax));
            }
        }
        Err(CalcError::NoBracketForIncome(taxable_income))
    }

    /// Additional Medicare tax on wages over the threshold.
    ///
    /// # Form Reference
    /// Form 8959, Part I.
    fn additional_medicare_tax(&self, filing_status: FilingStatus, wages: Decimal) -> Decimal {
        let threshold = *self.params.additional_medicare.wage_threshold.get(filing_status);
        if wages <= threshold {
            return Decimal::ZERO;
        }
        round_whole((wages - threshold) * self.params.additional_medicare.rate)
    }

    /// Net investment income tax.
    ///
    /// # Form Reference
    /// Form 8960: the rate applies to the lesser of net investment income
    /// and the MAGI excess over the threshold.
    fn net_investment_income_tax(
        &self,
        filing_status: FilingStatus,
        income: &Income,
        agi: Decimal,
    ) -> Decimal {
        let threshold = *self.params.niit.magi_threshold.get(filing_status);
        if agi <= threshold {
            return Decimal::ZERO;
        }
        let investment_income =
            income.taxable_interest + income.ordinary_dividends + income.capital_gains;
        let base = investment_income.min(agi - threshold);
        round_whole(base * self.params.niit.rate)
    }
}

// =============================================================================
// Tests
// =============================================================================
