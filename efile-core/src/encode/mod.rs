//! MeF return document encoding.
//!
//! Turns a validated return plus its computed result into the submission XML
//! accepted by the A2A gateway. Encoding is deterministic: the transmission
//! timestamp comes in through [`EncodeContext`], so identical inputs always
//! produce byte-identical output.

mod return_doc;
mod submission_id;
mod xml;

pub use return_doc::{build_submission, encode_return, EncodeContext, EncodeError};
pub use submission_id::generate_submission_id;
pub use xml::{escape_xml, format_amount};
