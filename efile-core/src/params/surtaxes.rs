use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::parameters::PerStatus;

/// Alternative minimum tax exemption and rate structure.
///
/// Only the tentative side of Form 6251 is parameterized; see the calculator
/// for what is and is not computed from these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtParameters {
    pub exemption: PerStatus<Decimal>,
    pub phase_out_start: PerStatus<Decimal>,
    /// Exemption reduction per dollar of income over the phase-out start.
    pub phase_out_rate: Decimal,
    pub low_rate: Decimal,
    pub high_rate: Decimal,
    /// Income at which the tentative tax switches to the high rate.
    pub high_rate_threshold: Decimal,
}

/// Net investment income tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiitParameters {
    pub rate: Decimal,
    pub magi_threshold: PerStatus<Decimal>,
}

/// Additional Medicare tax on wages over a filing-status threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalMedicareParameters {
    pub rate: Decimal,
    pub wage_threshold: PerStatus<Decimal>,
}
