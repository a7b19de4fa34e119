use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::parameters::PerStatus;

/// Earned income credit table row for one qualifying-child count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcRow {
    pub max_credit: Decimal,
    pub phase_in_rate: Decimal,
    pub phase_out_start: Decimal,
    pub phase_out_rate: Decimal,
    /// AGI/earned-income ceiling above which no credit is allowed.
    pub income_limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EitcParameters {
    /// Rows indexed by qualifying-child count; the last row covers 3 or more.
    pub rows: [EitcRow; 4],
    /// Added to `phase_out_start` and `income_limit` on joint returns.
    pub joint_adjustment: Decimal,
    /// Investment income at or above this amount disqualifies the credit.
    pub investment_income_limit: Decimal,
}

impl EitcParameters {
    /// Table row for a qualifying-child count, saturating at 3+.
    pub fn row(&self, qualifying_children: usize) -> &EitcRow {
        &self.rows[qualifying_children.min(3)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtcParameters {
    pub credit_per_child: Decimal,
    pub credit_per_other_dependent: Decimal,
    pub phase_out_threshold: PerStatus<Decimal>,
    /// AGI increment over the threshold that triggers one reduction step.
    pub phase_out_step: Decimal,
    /// Credit reduction per step.
    pub phase_out_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActcParameters {
    /// Earned income must exceed this floor for any refundable credit.
    pub earned_income_floor: Decimal,
    pub refundable_rate: Decimal,
    pub max_refundable_per_child: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn table() -> EitcParameters {
        let row = |max: Decimal| EitcRow {
            max_credit: max,
            phase_in_rate: dec!(0.34),
            phase_out_start: dec!(22720),
            phase_out_rate: dec!(0.1598),
            income_limit: dec!(49084),
        };
        EitcParameters {
            rows: [row(dec!(632)), row(dec!(4213)), row(dec!(6960)), row(dec!(7830))],
            joint_adjustment: dec!(7430),
            investment_income_limit: dec!(11600),
        }
    }

    #[test]
    fn row_lookup_saturates_at_three_children() {
        let eitc = table();

        assert_eq!(eitc.row(0).max_credit, dec!(632));
        assert_eq!(eitc.row(3).max_credit, dec!(7830));
        assert_eq!(eitc.row(7).max_credit, dec!(7830));
    }
}
