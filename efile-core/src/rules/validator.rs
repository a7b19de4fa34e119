use rust_decimal::Decimal;

use crate::model::{DeductionElection, TaxReturn, ValidationOutcome};
use crate::params::TaxParameters;
use crate::rules::routing::is_valid_routing_number;

/// Runs every business rule against the return.
///
/// The whole rule set always runs so a caller sees every problem in one
/// pass. Blocking errors mean the return must not be encoded; warnings are
/// advisory only.
pub fn validate(tax_return: &TaxReturn, params: &TaxParameters) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::new();

    check_identity(tax_return, &mut outcome);
    check_address(tax_return, &mut outcome);
    check_spouse(tax_return, &mut outcome);
    check_dependents(tax_return, &mut outcome);
    check_w2s(tax_return, &mut outcome);
    check_signature(tax_return, &mut outcome);
    check_direct_deposit(tax_return, &mut outcome);
    check_salt(tax_return, params, &mut outcome);

    outcome
}

fn is_nine_digits(value: &str) -> bool {
    value.len() == 9 && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_five_digits(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

fn check_identity(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    let taxpayer = &tax_return.taxpayer;
    if taxpayer.first_name.trim().is_empty() {
        outcome.error_on("MISSING_FIELD", "taxpayer.first_name", "first name is required");
    }
    if taxpayer.last_name.trim().is_empty() {
        outcome.error_on("MISSING_FIELD", "taxpayer.last_name", "last name is required");
    }
    if !is_nine_digits(&taxpayer.ssn) {
        outcome.error_on("INVALID_SSN", "taxpayer.ssn", "SSN must be exactly 9 digits");
    }
}

fn check_address(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    let address = &tax_return.address;
    for (value, field) in [
        (&address.line1, "address.line1"),
        (&address.city, "address.city"),
        (&address.state, "address.state"),
        (&address.zip, "address.zip"),
    ] {
        if value.trim().is_empty() {
            outcome.error_on("MISSING_FIELD", field, "address field is required");
        }
    }
}

fn check_spouse(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    let Some(spouse) = &tax_return.spouse else {
        if tax_return.filing_status.is_joint() {
            outcome.error_on(
                "MISSING_SPOUSE",
                "spouse",
                "joint returns require spouse name and SSN",
            );
        }
        return;
    };

    if !is_nine_digits(&spouse.ssn) {
        outcome.error_on("INVALID_SSN", "spouse.ssn", "SSN must be exactly 9 digits");
    }
}

fn check_dependents(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    for (index, dependent) in tax_return.dependents.iter().enumerate() {
        if !is_nine_digits(&dependent.ssn) {
            outcome.error_on(
                "INVALID_SSN",
                &format!("dependents[{index}].ssn"),
                "SSN must be exactly 9 digits",
            );
        }
    }
}

fn check_w2s(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    for (index, w2) in tax_return.income.w2s.iter().enumerate() {
        if !is_nine_digits(&w2.employer_ein) {
            outcome.error_on(
                "INVALID_EIN",
                &format!("income.w2s[{index}].employer_ein"),
                "employer EIN must be exactly 9 digits",
            );
        }
        if w2.wages < Decimal::ZERO {
            outcome.error_on(
                "NEGATIVE_AMOUNT",
                &format!("income.w2s[{index}].wages"),
                "wages cannot be negative",
            );
        }
        if w2.federal_withholding < Decimal::ZERO {
            outcome.error_on(
                "NEGATIVE_AMOUNT",
                &format!("income.w2s[{index}].federal_withholding"),
                "withholding cannot be negative",
            );
        } else if w2.federal_withholding > w2.wages * Decimal::new(5, 1) {
            outcome.warning_on(
                "HIGH_WITHHOLDING",
                &format!("income.w2s[{index}].federal_withholding"),
                "withholding exceeds half of wages, verify the W-2 entry",
            );
        }
    }
}

fn check_signature(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    let signature = &tax_return.signature;
    if !is_five_digits(&signature.primary_pin) {
        outcome.error_on(
            "INVALID_PIN",
            "signature.primary_pin",
            "signature PIN must be exactly 5 digits",
        );
    }
    match &signature.spouse_pin {
        Some(pin) => {
            if !is_five_digits(pin) {
                outcome.error_on(
                    "INVALID_PIN",
                    "signature.spouse_pin",
                    "signature PIN must be exactly 5 digits",
                );
            }
        }
        None => {
            if tax_return.filing_status.is_joint() {
                outcome.error_on(
                    "MISSING_SPOUSE_PIN",
                    "signature.spouse_pin",
                    "joint returns require a spouse signature PIN",
                );
            }
        }
    }
}

fn check_direct_deposit(tax_return: &TaxReturn, outcome: &mut ValidationOutcome) {
    let Some(deposit) = &tax_return.direct_deposit else {
        return;
    };

    if !is_valid_routing_number(&deposit.routing_number) {
        outcome.error_on(
            "INVALID_ROUTING_NUMBER",
            "direct_deposit.routing_number",
            "routing number fails the ABA checksum",
        );
    }
    if deposit.account_number.trim().is_empty() {
        outcome.error_on(
            "MISSING_FIELD",
            "direct_deposit.account_number",
            "account number is required for direct deposit",
        );
    }
}

fn check_salt(tax_return: &TaxReturn, params: &TaxParameters, outcome: &mut ValidationOutcome) {
    let DeductionElection::Itemized(detail) = &tax_return.deduction else {
        return;
    };

    if detail.salt_total() > params.salt_cap {
        outcome.warning_on(
            "SALT_OVER_CAP",
            "deduction.state_local_taxes",
            format!(
                "state and local taxes of {} exceed the {} cap, the excess is not deductible",
                detail.salt_total(),
                params.salt_cap
            ),
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
