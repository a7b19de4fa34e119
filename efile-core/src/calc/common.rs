//! Shared arithmetic helpers used across the calculation worksheets.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to a whole dollar, with exact half-dollars rounding away from zero.
///
/// Form 1040 and its schedules carry whole-dollar entries; every line the
/// engine records in a [`ComputedResult`](crate::model::ComputedResult) passes
/// through this helper.
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to cents, with exact half-cents rounding away from zero.
///
/// Worksheet intermediates (the Schedule SE lines in particular) are carried
/// at cent precision before the final whole-dollar entry.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two amounts.
pub fn max(a: Decimal, b: Decimal) -> Decimal {
    if a > b { a } else { b }
}
