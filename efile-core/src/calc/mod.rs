//! Form 1040 calculation pipeline.
//!
//! [`ReturnCalculator`] wires the per-topic worksheets together in form-line
//! order: income, adjustments, deductions, rate-schedule tax, surtax add-ons,
//! credits, payments, and the final refund-or-owed settlement. Everything is
//! parameter-driven: the same engine serves any published tax year.

pub mod common;
mod engine;
pub mod worksheets;

pub use engine::{CalcError, ReturnCalculator};
pub use worksheets::{
    AmtWorksheet, ChildCreditInput, ChildCreditResult, ChildCreditWorksheet, EitcWorksheet,
    SeTaxError, SeTaxResult, SeTaxWorksheet,
};
