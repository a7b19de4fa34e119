use rust_decimal::Decimal;

use crate::calc::common::{max, round_whole};
use crate::model::{AmtDetail, FilingStatus};
use crate::params::AmtParameters;

/// Alternative minimum tax calculator.
///
/// Produces the exemption and tentative minimum tax for the return record.
/// The full Form 6251 adjustment set is not modeled, so alternative minimum
/// taxable income equals AGI and the comparison against regular tax never
/// yields a positive net liability.
pub struct AmtWorksheet<'a> {
    params: &'a AmtParameters,
}

impl<'a> AmtWorksheet<'a> {
    pub fn new(params: &'a AmtParameters) -> Self {
        Self { params }
    }

    pub fn calculate(&self, filing_status: FilingStatus, agi: Decimal) -> AmtDetail {
        let exemption = self.exemption(filing_status, agi);
        let base = max(Decimal::ZERO, agi - exemption);
        let tentative_minimum_tax = self.tentative_tax(base);

        AmtDetail {
            exemption,
            tentative_minimum_tax,
            net_liability: Decimal::ZERO,
        }
    }

    /// Exemption after the high-income phase-out.
    ///
    /// # Form Reference
    /// Form 6251, line 5: the exemption drops by a quarter of the income over
    /// the phase-out start, to a floor of zero.
    fn exemption(&self, filing_status: FilingStatus, agi: Decimal) -> Decimal {
        let full = self.params.exemption.get(filing_status);
        let start = self.params.phase_out_start.get(filing_status);
        let excess = max(Decimal::ZERO, agi - start);
        round_whole(max(Decimal::ZERO, full - excess * self.params.phase_out_rate))
    }

    /// Two-rate tentative minimum tax.
    ///
    /// # Form Reference
    /// Form 6251, line 7: 26% up to the rate threshold, 28% above it.
    fn tentative_tax(&self, base: Decimal) -> Decimal {
        if base <= self.params.high_rate_threshold {
            return round_whole(base * self.params.low_rate);
        }
        let low_portion = self.params.high_rate_threshold * self.params.low_rate;
        let high_portion = (base - self.params.high_rate_threshold) * self.params.high_rate;
        round_whole(low_portion + high_portion)
    }
}

// =============================================================================
// Tests
// =============================================================================
