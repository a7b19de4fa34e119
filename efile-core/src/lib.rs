//! Core e-file engine: the return model, yearly tax parameters, the Form
//! 1040 calculator, pre-submission validation, MeF return encoding, and the
//! structural checks that gate transmission.

pub mod calc;
pub mod encode;
pub mod model;
pub mod params;
pub mod rules;
pub mod structure;

#[cfg(test)]
pub(crate) mod testutil;
