//! Pre-submission business rules.
//!
//! [`validate`] runs every check and reports all failures at once in a
//! [`ValidationOutcome`](crate::model::ValidationOutcome); errors block
//! encoding, warnings ride along for display. Nothing here mutates the
//! return or attempts a correction.

mod routing;
mod validator;

pub use routing::is_valid_routing_number;
pub use validator::validate;
