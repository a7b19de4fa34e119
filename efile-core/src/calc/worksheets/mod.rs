//! Per-topic worksheets backing the Form 1040 pipeline.
//!
//! Each worksheet borrows its slice of the year's [`TaxParameters`] and
//! exposes a single `calculate` entry point. The engine owns line ordering;
//! the worksheets own the arithmetic of one schedule or credit apiece.
//!
//! [`TaxParameters`]: crate::params::TaxParameters

mod amt;
mod child_credit;
mod eitc;
mod se_tax;

pub use amt::AmtWorksheet;
pub use child_credit::{ChildCreditInput, ChildCreditResult, ChildCreditWorksheet};
pub use eitc::EitcWorksheet;
pub use se_tax::{SeTaxError, SeTaxResult, SeTaxWorksheet};
