use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::{ValidationIssue, ValidationOutcome};
use crate::structure::manifest::SchemaManifest;

const IRS_NAMESPACE: &str = "http://www.irs.gov/efile";

/// Every leaf element in the payload: `<Name>text</Name>` with no nested
/// markup. Opening and closing names are captured separately so mismatched
/// pairs can be ignored here and left to the well-formedness pass.
static LEAF_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9]*)>([^<]*)</([A-Za-z][A-Za-z0-9]*)>").unwrap()
});
static RETURN_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Return(\s[^>]*)?>").unwrap());
static XMLNS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"xmlns="([^"]*)""#).unwrap());
static VERSION_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"returnVersion="([^"]*)""#).unwrap());
static DIGITS_9: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9}$").unwrap());
static DIGITS_6: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{6}$").unwrap());
static DIGITS_5: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").unwrap());
static WHOLE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+$").unwrap());
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub schema_version: String,
    pub validated_at: DateTime<Utc>,
    pub xml_hash: String,
}

/// Structural checker for one processing year.
///
/// Runs in one of two modes depending on whether the published schema
/// package sits under the schema root. With the package present the payload
/// additionally gets a tag-balance pass; without it the report carries a
/// `SCHEMAS_NOT_DOWNLOADED` warning and a `(structural only)` version marker.
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    tax_year: i32,
    schema_root: PathBuf,
}

impl StructuralValidator {
    pub fn for_year(tax_year: i32) -> Self {
        Self {
            tax_year,
            schema_root: PathBuf::from("schemas").join(tax_year.to_string()),
        }
    }

    pub fn with_schema_root(mut self, schema_root: impl Into<PathBuf>) -> Self {
        self.schema_root = schema_root.into();
        self
    }

    pub fn validate(&self, xml: &str) -> StructuralReport {
        let validated_at = Utc::now();
        let xml_hash = hash_xml(xml);

        let Some(manifest) = SchemaManifest::for_year(self.tax_year) else {
            let mut outcome = ValidationOutcome::new();
            outcome.error(
                "SCHEMA_NOT_FOUND",
                format!("no schema manifest for tax year {}", self.tax_year),
            );
            return StructuralReport {
                valid: false,
                errors: outcome.errors,
                warnings: outcome.warnings,
                schema_version: "unknown".to_string(),
                validated_at,
                xml_hash,
            };
        };

        let mut outcome = ValidationOutcome::new();
        let missing = manifest.missing_files(&self.schema_root);
        let schema_version = if missing.is_empty() {
            check_well_formed(xml, &mut outcome);
            manifest.version.to_string()
        } else {
            outcome.warning(
                "SCHEMAS_NOT_DOWNLOADED",
                format!(
                    "schema package not found under {}, missing: {}",
                    self.schema_root.display(),
                    missing.join(", ")
                ),
            );
            format!("{} (structural only)", manifest.version)
        };

        self.check_return_element(xml, &mut outcome);
        check_return_header(xml, &mut outcome);
        check_return_data(xml, &mut outcome);
        check_leaf_formats(xml, &mut outcome);

        StructuralReport {
            valid: outcome.is_valid(),
            errors: outcome.errors,
            warnings: outcome.warnings,
            schema_version,
            validated_at,
            xml_hash,
        }
    }

    fn check_return_element(&self, xml: &str, outcome: &mut ValidationOutcome) {
        let Some(open) = RETURN_OPEN.find(xml) else {
            outcome.error("MISSING_RETURN", "root <Return> element not found");
            return;
        };
        let attrs = open.as_str();

        match XMLNS_ATTR.captures(attrs) {
            Some(captures) if &captures[1] == IRS_NAMESPACE => {}
            Some(captures) => outcome.error(
                "INVALID_NAMESPACE",
                format!("namespace {:?}, expected {IRS_NAMESPACE:?}", &captures[1]),
            ),
            None => outcome.error(
                "INVALID_NAMESPACE",
                format!("missing xmlns, expected {IRS_NAMESPACE:?}"),
            ),
        }

        match VERSION_ATTR.captures(attrs) {
            Some(captures) if captures[1].starts_with(&self.tax_year.to_string()) => {}
            Some(captures) => outcome.warning(
                "VERSION_MISMATCH",
                format!(
                    "returnVersion {} may not match tax year {}",
                    &captures[1], self.tax_year
                ),
            ),
            None => outcome.error("MISSING_RETURN_VERSION", "returnVersion attribute is required"),
        }
    }
}

fn check_return_header(xml: &str, outcome: &mut ValidationOutcome) {
    if !xml.contains("<ReturnHeader") {
        outcome.error("MISSING_RETURN_HEADER", "ReturnHeader element is required");
        return;
    }
    for name in ["TaxYr", "ReturnTypeCd", "Filer"] {
        if !xml.contains(&format!("<{name}>")) {
            outcome.error_on(
                "MISSING_HEADER_ELEMENT",
                &format!("ReturnHeader.{name}"),
                format!("required header element <{name}> not found"),
            );
        }
    }
}

fn check_return_data(xml: &str, outcome: &mut ValidationOutcome) {
    if !xml.contains("<ReturnData") {
        outcome.error("MISSING_RETURN_DATA", "ReturnData element is required");
        return;
    }
    let Some(form) = slice_between(xml, "<IRS1040>", "</IRS1040>") else {
        outcome.error("MISSING_IRS1040", "IRS1040 element is required in ReturnData");
        return;
    };
    for name in [
        "IndividualReturnFilingStatusCd",
        "TotalIncomeAmt",
        "AdjustedGrossIncomeAmt",
        "TaxableIncomeAmt",
    ] {
        if !form.contains(&format!("<{name}>")) {
            outcome.error_on(
                "MISSING_1040_ELEMENT",
                &format!("IRS1040.{name}"),
                format!("required Form 1040 element <{name}> not found"),
            );
        }
    }
}

/// Format rules keyed off the element name. Empty text is left to the
/// required-element checks; a present value must match its shape.
fn check_leaf_formats(xml: &str, outcome: &mut ValidationOutcome) {
    for captures in LEAF_ELEMENT.captures_iter(xml) {
        let name = &captures[1];
        if name != &captures[3] {
            continue;
        }
        let value = captures[2].trim();
        if value.is_empty() {
            continue;
        }

        if name == "EFIN" {
            if !DIGITS_6.is_match(value) {
                outcome.error_on(
                    "INVALID_EFIN",
                    name,
                    format!("EFIN must be exactly 6 digits, got {value:?}"),
                );
            }
        } else if name.ends_with("SignaturePIN") {
            if !DIGITS_5.is_match(value) {
                outcome.error_on(
                    "INVALID_SIGNATURE_PIN",
                    name,
                    format!("signature PIN must be exactly 5 digits, got {value:?}"),
                );
            }
        } else if name.contains("SSN") {
            if !DIGITS_9.is_match(value) {
                outcome.error_on(
                    "INVALID_SSN_FORMAT",
                    name,
                    format!("SSN must be 9 digits with no separators, got {value:?}"),
                );
            }
        } else if name == "EIN" || name == "EmployerEIN" {
            if !DIGITS_9.is_match(value) {
                outcome.error_on(
                    "INVALID_EIN_FORMAT",
                    name,
                    format!("EIN must be 9 digits with no separators, got {value:?}"),
                );
            }
        } else if name.ends_with("Amt") {
            if !WHOLE_AMOUNT.is_match(value) {
                outcome.error_on(
                    "INVALID_AMOUNT_FORMAT",
                    name,
                    format!("amount must be a whole number of dollars, got {value:?}"),
                );
            }
        } else if name.ends_with("Dt") && !ISO_DATE.is_match(value) {
            outcome.error_on(
                "INVALID_DATE_FORMAT",
                name,
                format!("date must be YYYY-MM-DD, got {value:?}"),
            );
        }
    }
}

/// Tag-balance pass used in full mode. Declarations, comments, and
/// self-closing tags are skipped; everything else must nest properly.
fn check_well_formed(xml: &str, outcome: &mut ValidationOutcome) {
    let mut stack: Vec<&str> = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find('<') {
        rest = &rest[start..];
        let Some(end) = rest.find('>') else {
            outcome.error("XML_PARSE_ERROR", "unterminated tag");
            return;
        };
        let tag = &rest[1..end];
        rest = &rest[end + 1..];

        if tag.starts_with('?') || tag.starts_with('!') || tag.ends_with('/') {
            continue;
        }
        if let Some(name) = tag.strip_prefix('/') {
            match stack.pop() {
                Some(open) if open == name => {}
                Some(open) => {
                    outcome.error(
                        "XML_PARSE_ERROR",
                        format!("closing tag </{name}> does not match <{open}>"),
                    );
                    return;
                }
                None => {
                    outcome.error(
                        "XML_PARSE_ERROR",
                        format!("closing tag </{name}> without opening tag"),
                    );
                    return;
                }
            }
        } else {
            let name = tag.split([' ', '\t', '\n']).next().unwrap_or(tag);
            stack.push(name);
        }
    }

    if let Some(open) = stack.last() {
        outcome.error("XML_PARSE_ERROR", format!("unclosed tag <{open}>"));
    }
}

fn slice_between<'a>(xml: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = xml.find(open)? + open.len();
    let end = xml[start..].find(close)? + start;
    Some(&xml[start..end])
}

/// First 16 hex characters of the payload's SHA-256, recorded in the report
/// and the evidence bundle so a payload can be tied back to its review.
fn hash_xml(xml: &str) -> String {
    let digest = Sha256::digest(xml.as_bytes());
    hex::encode(digest)[..16].to_string()
}

// =============================================================================
// Tests
// =============================================================================
