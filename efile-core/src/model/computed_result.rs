use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every derived amount for one return, in form order.
///
/// All values are whole dollars. Invariant: `refund` and `amount_owed` are
/// each `max(0, …)` of opposite differences, so at most one is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedResult {
    pub tax_year: i32,
    pub total_income: Decimal,
    pub total_adjustments: Decimal,
    pub adjusted_gross_income: Decimal,
    pub deduction: Decimal,
    pub used_itemized_deduction: bool,
    pub qbi_deduction: Decimal,
    pub taxable_income: Decimal,
    /// Tax from the rate schedules alone.
    pub income_tax: Decimal,
    pub additional_medicare_tax: Decimal,
    pub net_investment_income_tax: Decimal,
    pub amt: AmtDetail,
    /// Income tax plus the surtax add-ons; credits are capped here.
    pub tax_before_credits: Decimal,
    pub child_tax_credit: Decimal,
    pub other_dependent_credit: Decimal,
    pub total_credits: Decimal,
    pub tax_after_credits: Decimal,
    pub self_employment_tax: Decimal,
    pub total_tax: Decimal,
    pub withholding: Decimal,
    pub earned_income_credit: Decimal,
    pub additional_child_tax_credit: Decimal,
    pub estimated_payments: Decimal,
    pub total_payments: Decimal,
    pub refund: Decimal,
    pub amount_owed: Decimal,
}

/// Tentative alternative-minimum-tax figures.
///
/// The exemption and tentative tax are computed in full, but `net_liability`
/// is always zero: the regular-tax-vs-tentative comparison on Form 6251 is
/// not modeled, so no AMT is ever added to the total. Callers that need a
/// real AMT figure must not read one out of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtDetail {
    pub exemption: Decimal,
    pub tentative_minimum_tax: Decimal,
    pub net_liability: Decimal,
}

impl AmtDetail {
    pub fn zero() -> Self {
        Self {
            exemption: Decimal::ZERO,
            tentative_minimum_tax: Decimal::ZERO,
            net_liability: Decimal::ZERO,
        }
    }
}
