//! Pre-transmission structural checks on the encoded payload.
//!
//! The regulator runs the authoritative XSD validation server-side at
//! submission. This pass catches malformed documents before they leave the
//! building: required elements, identifier and amount formats, and tag
//! balance when the published schema package is on disk.

mod manifest;
mod validator;

pub use manifest::SchemaManifest;
pub use validator::{StructuralReport, StructuralValidator};
