use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::calc::common::{max, round_cents, round_whole};
use crate::params::SeTaxParameters;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeTaxError {
    #[error("self-employment {field} rate must be between 0 and 1, got {rate}")]
    RateOutOfRange { field: &'static str, rate: Decimal },
    #[error("social security wage base must be positive, got {0}")]
    NonPositiveWageBase(Decimal),
}

/// Line-level result of the Schedule SE computation.
///
/// Intermediate lines are carried at cent precision; the two amounts the
/// return actually reports (`self_employment_tax` on Schedule 2 and
/// `deduction` on Schedule 1) are whole dollars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeTaxResult {
    pub net_earnings: Decimal,
    pub social_security_taxable: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_tax: Decimal,
    pub self_employment_tax: Decimal,
    pub deduction: Decimal,
}

impl SeTaxResult {
    fn zero() -> Self {
        Self {
            net_earnings: Decimal::ZERO,
            social_security_taxable: Decimal::ZERO,
            social_security_tax: Decimal::ZERO,
            medicare_tax: Decimal::ZERO,
            self_employment_tax: Decimal::ZERO,
            deduction: Decimal::ZERO,
        }
    }
}

/// Schedule SE calculator for a single year's parameters.
pub struct SeTaxWorksheet<'a> {
    params: &'a SeTaxParameters,
}

impl<'a> SeTaxWorksheet<'a> {
    pub fn new(params: &'a SeTaxParameters) -> Self {
        Self { params }
    }

    /// Computes self-employment tax on net Schedule C profit.
    ///
    /// `w2_social_security_wages` reduce the Social Security wage base
    /// available to self-employment earnings. A filer whose net earnings fall
    /// under the filing threshold owes no SE tax at all.
    pub fn calculate(
        &self,
        net_profit: Decimal,
        w2_social_security_wages: Decimal,
    ) -> Result<SeTaxResult, SeTaxError> {
        self.validate()?;

        if net_profit <= Decimal::ZERO {
            return Ok(SeTaxResult::zero());
        }

        let net_earnings = self.net_earnings(net_profit);
        if net_earnings < self.params.min_se_threshold {
            warn!(
                net_earnings = %net_earnings,
                threshold = %self.params.min_se_threshold,
                "net earnings below the SE filing threshold, no SE tax due"
            );
            return Ok(SeTaxResult::zero());
        }

        let social_security_taxable =
            self.social_security_taxable(net_earnings, w2_social_security_wages);
        let social_security_tax = round_cents(social_security_taxable * self.params.ss_tax_rate);
        let medicare_tax = round_cents(net_earnings * self.params.medicare_tax_rate);
        let self_employment_tax = round_whole(social_security_tax + medicare_tax);
        let deduction = round_whole(self_employment_tax * self.params.deduction_factor);

        Ok(SeTaxResult {
            net_earnings,
            social_security_taxable,
            social_security_tax,
            medicare_tax,
            self_employment_tax,
            deduction,
        })
    }

    fn validate(&self) -> Result<(), SeTaxError> {
        if self.params.ss_wage_max <= Decimal::ZERO {
            return Err(SeTaxError::NonPositiveWageBase(self.params.ss_wage_max));
        }
        for (field, rate) in [
            ("social security tax", self.params.ss_tax_rate),
            ("medicare tax", self.params.medicare_tax_rate),
            ("net earnings", self.params.net_earnings_factor),
            ("deduction", self.params.deduction_factor),
        ] {
            if rate <= Decimal::ZERO || rate >= Decimal::ONE {
                return Err(SeTaxError::RateOutOfRange { field, rate });
            }
        }
        Ok(())
    }

    /// Net earnings from self-employment.
    ///
    /// # Form Reference
    /// Schedule SE, Part I, line 4a: net profit multiplied by 92.35%.
    fn net_earnings(&self, net_profit: Decimal) -> Decimal {
        round_cents(net_profit * self.params.net_earnings_factor)
    }

    /// Portion of net earnings subject to the Social Security rate.
    ///
    /// # Form Reference
    /// Schedule SE, Part I, lines 8a-9: the wage base, less Social Security
    /// wages already taxed through Form W-2, caps the taxable amount.
    fn social_security_taxable(&self, net_earnings: Decimal, w2_wages: Decimal) -> Decimal {
        let remaining_base = max(Decimal::ZERO, self.params.ss_wage_max - w2_wages);
        net_earnings.min(remaining_base)
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

    fn worksheet_params() -> SeTaxParameters {
        parameters_2024().se_tax
    }

    #[test]
    fn no_tax_on_zero_or_negative_profit() {
        let params = worksheet_params();
        let worksheet = SeTaxWorksheet::new(&params);

        let result = worksheet.calculate(dec!(0), dec!(0)).unwrap();
        assert_eq!(result.self_employment_tax, dec!(0));

        let result = worksheet.calculate(dec!(-12000), dec!(0)).unwrap();
        assert_eq!(result.self_employment_tax, dec!(0));
        assert_eq!(result.deduction, dec!(0));
    }

    #[test]
    fn no_tax_below_filing_threshold() {
        let params = worksheet_params();
        let worksheet = SeTaxWorksheet::new(&params);

        // 400.00 * 0.9235 = 369.40, under the 400 threshold.
        let result = worksheet.calculate(dec!(400), dec!(0)).unwrap();
        assert_eq!(result, SeTaxResult::zero());
    }

    #[test]
    fn standard_computation_without_w2_wages() {
        let params = worksheet_params();
        let worksheet = SeTaxWorksheet::new(&params);

        let result = worksheet.calculate(dec!(80000), dec!(0)).unwrap();
        assert_eq!(result.net_earnings, dec!(73880.00));
        assert_eq!(result.social_security_taxable, dec!(73880.00));
        assert_eq!(result.social_security_tax, dec!(9161.12));
        assert_eq!(result.medicare_tax, dec!(2142.52));
        assert_eq!(result.self_employment_tax, dec!(11304));
        assert_eq!(result.deduction, dec!(5652));
    }

    #[test]
    fn w2_wages_reduce_the_social_security_base() {
        let params = worksheet_params();
        let worksheet = SeTaxWorksheet::new(&params);

        let result = worksheet.calculate(dec!(80000), dec!(100000)).unwrap();
        // 168600 - 100000 leaves 68600 of base for SE earnings.
        assert_eq!(result.social_security_taxable, dec!(68600));
        assert_eq!(result.social_security_tax, dec!(8506.40));
        assert_eq!(result.medicare_tax, dec!(2142.52));
        assert_eq!(result.self_employment_tax, dec!(10649));
        assert_eq!(result.deduction, dec!(5325));
    }

    #[test]
    fn exhausted_wage_base_leaves_medicare_only() {
        let params = worksheet_params();
        let worksheet = SeTaxWorksheet::new(&params);

        let result = worksheet.calculate(dec!(80000), dec!(170000)).unwrap();
        assert_eq!(result.social_security_taxable, dec!(0));
        assert_eq!(result.social_security_tax, dec!(0));
        assert_eq!(result.self_employment_tax, dec!(2143));
    }

    #[test]
    fn invalid_rates_are_rejected() {
        let mut params = worksheet_params();
        params.ss_tax_rate = dec!(1.24);
        let worksheet = SeTaxWorksheet::new(&params);

        assert_eq!(
            worksheet.calculate(dec!(50000), dec!(0)),
            Err(SeTaxError::RateOutOfRange {
                field: "social security tax",
                rate: dec!(1.24),
            })
        );
    }

    #[test]
    fn non_positive_wage_base_is_rejected() {
        let mut params = worksheet_params();
        params.ss_wage_max = dec!(0);
        let worksheet = SeTaxWorksheet::new(&params);

        assert_eq!(
            worksheet.calculate(dec!(50000), dec!(0)),
            Err(SeTaxError::NonPositiveWageBase(dec!(0)))
        );
    }
}
