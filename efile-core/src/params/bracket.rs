use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal rate band of a rate schedule.
///
/// Tax for income inside the band is `base_tax + (income - min_income) * rate`.
/// The top band of a schedule has `max_income = None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}
