//! Versioned per-year tax parameters and the process-wide store.
//!
//! A [`TaxParameters`] value holds every bracket, threshold, and rate the
//! calculator needs for one tax year. Sets are published into the
//! [`ParameterStore`] once and never rewritten; the store hands out shared
//! snapshots so concurrent filings for the same year read identical data.

mod bracket;
mod credits;
mod parameters;
mod store;
mod surtaxes;

pub use bracket::TaxBracket;
pub use credits::{ActcParameters, CtcParameters, EitcParameters, EitcRow};
pub use parameters::{ParameterError, PerStatus, QbiParameters, SeTaxParameters, TaxParameters};
pub use store::ParameterStore;
pub use surtaxes::{AdditionalMedicareParameters, AmtParameters, NiitParameters};
