use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::encode::submission_id::generate_submission_id;
use crate::encode::xml::{amount_elem, elem, text_elem};
use crate::model::{ComputedResult, DeductionElection, Submission, TaxReturn};
use crate::params::TaxParameters;

const IRS_NAMESPACE: &str = "http://www.irs.gov/efile";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Transmitter identity and the timestamp stamped into the header.
///
/// The timestamp is passed in rather than read from the clock so that
/// re-encoding a stored return reproduces the exact payload that was hashed.
#[derive(Debug, Clone)]
pub struct EncodeContext {
    pub efin: String,
    pub software_id: String,
    pub software_version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("EFIN must be exactly 6 digits, got {0:?}")]
    InvalidEfin(String),
    #[error("computed result is for tax year {result_year} but the return is for {return_year}")]
    YearMismatch { return_year: i32, result_year: i32 },
}

/// Serializes the return and its computed amounts into the submission
/// document. Byte-identical output for identical input.
pub fn encode_return(
    tax_return: &TaxReturn,
    result: &ComputedResult,
    params: &TaxParameters,
    ctx: &EncodeContext,
) -> Result<String, EncodeError> {
    if ctx.efin.len() != 6 || !ctx.efin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EncodeError::InvalidEfin(ctx.efin.clone()));
    }
    if tax_return.tax_year != result.tax_year {
        return Err(EncodeError::YearMismatch {
            return_year: tax_return.tax_year,
            result_year: result.tax_year,
        });
    }

    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push_str(&format!(
        r#"<Return xmlns="{IRS_NAMESPACE}" xmlns:xsi="{XSI_NAMESPACE}" returnVersion="{}v1.0">"#,
        tax_return.tax_year
    ));
    return_header(&mut out, tax_return, ctx);
    out.push_str(r#"<ReturnData documentCnt="1">"#);
    form_1040(&mut out, tax_return, result);
    w2_statements(&mut out, tax_return);
    schedule_c(&mut out, tax_return);
    schedule_a(&mut out, tax_return, params);
    out.push_str("</ReturnData></Return>");
    Ok(out)
}

/// Encodes the return and wraps it in a fresh [`Submission`] with a newly
/// generated submission ID.
pub fn build_submission(
    tax_return: &TaxReturn,
    result: &ComputedResult,
    params: &TaxParameters,
    ctx: &EncodeContext,
) -> Result<Submission, EncodeError> {
    let xml = encode_return(tax_return, result, params, ctx)?;
    Ok(Submission::new(
        generate_submission_id(&ctx.efin),
        tax_return.tax_year,
        xml,
    ))
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// First four characters of the controlling name, uppercased.
fn name_control(name: &str) -> String {
    name.chars().take(4).collect::<String>().to_uppercase()
}

fn return_header(out: &mut String, tax_return: &TaxReturn, ctx: &EncodeContext) {
    let signature = &tax_return.signature;

    out.push_str(r#"<ReturnHeader binaryAttachmentCnt="0">"#);
    elem(
        out,
        "ReturnTs",
        &ctx.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    elem(out, "TaxYr", &tax_return.tax_year.to_string());
    elem(out, "TaxPeriodBeginDt", &format!("{}-01-01", tax_return.tax_year));
    elem(out, "TaxPeriodEndDt", &format!("{}-12-31", tax_return.tax_year));
    text_elem(out, "SoftwareId", &ctx.software_id);
    text_elem(out, "SoftwareVersionNum", &ctx.software_version);
    out.push_str("<OriginatorGrp>");
    elem(out, "EFIN", &ctx.efin);
    elem(out, "OriginatorTypeCd", "OnlineFiler");
    out.push_str("</OriginatorGrp>");
    elem(out, "PINTypeCd", "Self-Select On-Line");
    elem(out, "JuratDisclosureCd", "Online Self Select PIN");
    elem(out, "PrimaryPINEnteredByCd", "Taxpayer");
    elem(out, "PrimarySignaturePIN", &signature.primary_pin);
    elem(out, "PrimarySignatureDt", &signature.primary_signature_date.to_string());
    if tax_return.spouse.is_some() {
        if let Some(pin) = &signature.spouse_pin {
            elem(out, "SpouseSignaturePIN", pin);
            let date = signature
                .spouse_signature_date
                .unwrap_or(signature.primary_signature_date);
            elem(out, "SpouseSignatureDt", &date.to_string());
        }
    }
    elem(out, "ReturnTypeCd", "1040");

    out.push_str("<Filer>");
    elem(out, "PrimarySSN", &digits_only(&tax_return.taxpayer.ssn));
    if let Some(spouse) = &tax_return.spouse {
        elem(out, "SpouseSSN", &digits_only(&spouse.ssn));
    }
    text_elem(
        out,
        "NameLine1Txt",
        &format!("{} {}", tax_return.taxpayer.first_name, tax_return.taxpayer.last_name),
    );
    elem(out, "PrimaryNameControlTxt", &name_control(&tax_return.taxpayer.last_name));
    if let Some(spouse) = &tax_return.spouse {
        elem(out, "SpouseNameControlTxt", &name_control(&spouse.last_name));
    }
    out.push_str("<USAddress>");
    text_elem(out, "AddressLine1Txt", &tax_return.address.line1);
    if let Some(apartment) = &tax_return.address.apartment {
        text_elem(out, "AddressLine2Txt", apartment);
    }
    text_elem(out, "CityNm", &tax_return.address.city);
    elem(out, "StateAbbreviationCd", &tax_return.address.state);
    elem(out, "ZIPCd", &tax_return.address.zip);
    out.push_str("</USAddress></Filer>");

    if let Some(deposit) = &tax_return.direct_deposit {
        out.push_str("<RefundDirectDeposit>");
        elem(out, "RoutingTransitNum", &deposit.routing_number);
        elem(out, "BankAccountNum", &deposit.account_number);
        elem(out, "BankAccountTypeCd", &deposit.account_type.mef_code().to_string());
        out.push_str("</RefundDirectDeposit>");
    }
    out.push_str("</ReturnHeader>");
}

fn form_1040(out: &mut String, tax_return: &TaxReturn, result: &ComputedResult) {
    let income = &tax_return.income;

    out.push_str("<IRS1040>");
    elem(
        out,
        "IndividualReturnFilingStatusCd",
        &tax_return.filing_status.mef_code().to_string(),
    );

    if !tax_return.dependents.is_empty() {
        out.push_str("<DependentDetail>");
        for dependent in &tax_return.dependents {
            out.push_str("<DependentInformationGrp>");
            text_elem(out, "DependentFirstNm", &dependent.first_name);
            text_elem(out, "DependentLastNm", &dependent.last_name);
            elem(out, "DependentNameControlTxt", &name_control(&dependent.last_name));
            elem(out, "DependentSSN", &digits_only(&dependent.ssn));
            elem(out, "DependentRelationshipCd", &dependent.relationship.to_uppercase());
            if dependent.ctc_eligible {
                out.push_str("<EligibleForChildTaxCreditInd>X</EligibleForChildTaxCreditInd>");
            }
            if dependent.odc_eligible {
                out.push_str("<EligibleForODCInd>X</EligibleForODCInd>");
            }
            out.push_str("</DependentInformationGrp>");
        }
        out.push_str("</DependentDetail>");
    }

    amount_elem(out, "WagesAmt", income.total_wages());
    if income.taxable_interest > Decimal::ZERO {
        amount_elem(out, "TaxableInterestAmt", income.taxable_interest);
    }
    if income.ordinary_dividends > Decimal::ZERO {
        amount_elem(out, "OrdinaryDividendsAmt", income.ordinary_dividends);
        amount_elem(out, "QualifiedDividendsAmt", income.qualified_dividends);
    }
    if !income.businesses.is_empty() {
        amount_elem(out, "ScheduleCNetProfitLossAmt", income.business_net_profit());
    }
    amount_elem(out, "TotalIncomeAmt", result.total_income);

    if result.total_adjustments > Decimal::ZERO {
        amount_elem(out, "TotalAdjustmentsAmt", result.total_adjustments);
    }
    amount_elem(out, "AdjustedGrossIncomeAmt", result.adjusted_gross_income);

    amount_elem(out, "TotalItemizedOrStandardDedAmt", result.deduction);
    if result.used_itemized_deduction {
        out.push_str("<ItemizedDeductionsInd>X</ItemizedDeductionsInd>");
    } else {
        out.push_str("<StandardDeductionInd>X</StandardDeductionInd>");
    }
    if result.qbi_deduction > Decimal::ZERO {
        amount_elem(out, "QualifiedBusinessIncomeDedAmt", result.qbi_deduction);
    }
    amount_elem(out, "TaxableIncomeAmt", result.taxable_income);
    amount_elem(out, "TaxAmt", result.tax_before_credits);

    if result.child_tax_credit > Decimal::ZERO {
        amount_elem(out, "ChildTaxCreditAmt", result.child_tax_credit);
    }
    if result.other_dependent_credit > Decimal::ZERO {
        amount_elem(out, "CreditForOtherDependentsAmt", result.other_dependent_credit);
    }
    amount_elem(out, "TotalCreditsAmt", result.total_credits);
    amount_elem(out, "TotalTaxAmt", result.total_tax);

    amount_elem(out, "WithholdingTaxAmt", result.withholding);
    if result.earned_income_credit > Decimal::ZERO {
        amount_elem(out, "EarnedIncomeCreditAmt", result.earned_income_credit);
    }
    if result.additional_child_tax_credit > Decimal::ZERO {
        amount_elem(out, "AdditionalChildTaxCreditAmt", result.additional_child_tax_credit);
    }
    if result.estimated_payments > Decimal::ZERO {
        amount_elem(out, "EstimatedTaxPaymentsAmt", result.estimated_payments);
    }
    amount_elem(out, "TotalPaymentsAmt", result.total_payments);

    if result.refund > Decimal::ZERO {
        amount_elem(out, "OverpaidAmt", result.refund);
        amount_elem(out, "RefundAmt", result.refund);
    }
    if result.amount_owed > Decimal::ZERO {
        amount_elem(out, "OwedAmt", result.amount_owed);
    }
    out.push_str("</IRS1040>");
}

fn w2_statements(out: &mut String, tax_return: &TaxReturn) {
    let w2s = &tax_return.income.w2s;
    if w2s.is_empty() {
        return;
    }

    out.push_str("<IRSW2>");
    for w2 in w2s {
        for group in &w2.state_tax_groups {
            out.push_str("<W2StateLocalTaxGrp><W2StateTaxGrp>");
            elem(out, "StateAbbreviationCd", &group.state);
            text_elem(out, "EmployerStateIdNum", &group.employer_state_id);
            amount_elem(out, "StateWagesAmt", group.state_wages);
            amount_elem(out, "StateIncomeTaxAmt", group.state_withholding);
            out.push_str("</W2StateTaxGrp></W2StateLocalTaxGrp>");
        }
        elem(out, "EmployerEIN", &digits_only(&w2.employer_ein));
        elem(out, "EmployerNameControlTxt", &name_control(&w2.employer_name));
        out.push_str("<EmployerName>");
        text_elem(out, "BusinessNameLine1Txt", &w2.employer_name);
        out.push_str("</EmployerName><EmployerUSAddress>");
        text_elem(out, "AddressLine1Txt", &w2.employer_address.line1);
        text_elem(out, "CityNm", &w2.employer_address.city);
        elem(out, "StateAbbreviationCd", &w2.employer_address.state);
        elem(out, "ZIPCd", &w2.employer_address.zip);
        out.push_str("</EmployerUSAddress>");
        elem(out, "EmployeeSSN", &digits_only(&tax_return.taxpayer.ssn));
        text_elem(
            out,
            "EmployeeNm",
            &format!("{} {}", tax_return.taxpayer.first_name, tax_return.taxpayer.last_name),
        );
        amount_elem(out, "WagesAmt", w2.wages);
        amount_elem(out, "WithholdingAmt", w2.federal_withholding);
        amount_elem(out, "SocialSecurityWagesAmt", w2.social_security_wages);
        amount_elem(out, "SocialSecurityTaxAmt", w2.social_security_tax);
        amount_elem(out, "MedicareWagesAndTipsAmt", w2.medicare_wages);
        amount_elem(out, "MedicareTaxWithheldAmt", w2.medicare_tax);
        if w2.retirement_plan {
            out.push_str("<RetirementPlanInd>X</RetirementPlanInd>");
        }
    }
    out.push_str("</IRSW2>");
}

fn schedule_c(out: &mut String, tax_return: &TaxReturn) {
    for business in &tax_return.income.businesses {
        out.push_str("<IRS1040ScheduleC>");
        text_elem(out, "BusinessNameLine1Txt", &business.business_name);
        elem(out, "PrincipalBusinessActivityCd", &business.activity_code);
        if let Some(ein) = &business.ein {
            elem(out, "EIN", &digits_only(ein));
        }
        elem(out, "AccountingMethodCd", business.accounting_method.as_str());
        amount_elem(out, "TotalGrossReceiptsAmt", business.gross_receipts);
        if business.returns_and_allowances > Decimal::ZERO {
            amount_elem(out, "ReturnsAndAllowancesAmt", business.returns_and_allowances);
        }
        amount_elem(out, "GrossIncomeAmt", business.gross_income());
        if business.cost_of_goods_sold > Decimal::ZERO {
            amount_elem(out, "CostOfGoodsSoldAmt", business.cost_of_goods_sold);
        }
        amount_elem(out, "GrossProfitAmt", business.gross_profit());

        let expenses = &business.expenses;
        for (name, value) in [
            ("AdvertisingAmt", expenses.advertising),
            ("CarAndTruckExpensesAmt", expenses.car_and_truck),
            ("CommissionsAndFeesAmt", expenses.commissions_and_fees),
            ("ContractLaborAmt", expenses.contract_labor),
            ("DepreciationAndSection179Amt", expenses.depreciation),
            ("InsuranceAmt", expenses.insurance),
            ("MortgageInterestPaidAmt", expenses.mortgage_interest),
            ("OtherInterestAmt", expenses.other_interest),
            ("LegalAndProfessionalAmt", expenses.legal_and_professional),
            ("OfficeExpensesAmt", expenses.office_expense),
            ("MachineryAndEquipmentAmt", expenses.rent_machinery),
            ("OtherBusinessPropertyAmt", expenses.rent_other),
            ("RepairsAndMaintenanceAmt", expenses.repairs),
            ("SuppliesAmt", expenses.supplies),
            ("TaxesAndLicensesAmt", expenses.taxes_and_licenses),
            ("TravelAmt", expenses.travel),
            ("MealsAndEntertainmentAmt", expenses.meals),
            ("UtilitiesAmt", expenses.utilities),
            ("WagesAmt", expenses.wages),
        ] {
            if value > Decimal::ZERO {
                amount_elem(out, name, value);
            }
        }
        amount_elem(out, "TotalExpensesAmt", expenses.total());
        amount_elem(out, "NetProfitOrLossAmt", business.net_profit());
        out.push_str("</IRS1040ScheduleC>");
    }
}

fn schedule_a(out: &mut String, tax_return: &TaxReturn, params: &TaxParameters) {
    let DeductionElection::Itemized(detail) = &tax_return.deduction else {
        return;
    };
    let capped_salt = detail.salt_total().min(params.salt_cap);
    let total = detail.medical_expenses
        + capped_salt
        + detail.mortgage_interest
        + detail.mortgage_insurance_premiums
        + detail.charitable_cash
        + detail.charitable_noncash
        + detail.casualty_losses
        + detail.other;

    out.push_str("<IRS1040ScheduleA>");
    if detail.medical_expenses > Decimal::ZERO {
        amount_elem(out, "MedicalAndDentalExpensesAmt", detail.medical_expenses);
    }
    amount_elem(out, "StateAndLocalTaxesAmt", capped_salt);
    if detail.mortgage_interest > Decimal::ZERO {
        amount_elem(out, "MortgageInterestAmt", detail.mortgage_interest);
    }
    if detail.charitable_cash > Decimal::ZERO {
        amount_elem(out, "GiftsByCashOrCheckAmt", detail.charitable_cash);
    }
    if detail.charitable_noncash > Decimal::ZERO {
        amount_elem(out, "OtherThanByCashOrCheckAmt", detail.charitable_noncash);
    }
    amount_elem(out, "TotalItemizedDeductionsAmt", total);
    out.push_str("</IRS1040ScheduleA>");
}

// =============================================================================
// Tests
// =============================================================================
