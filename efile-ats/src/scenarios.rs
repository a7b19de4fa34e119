//! The four acceptance scenarios and the figures each one must produce.
//!
//! Identities use the 400-00-xxxx SSN range reserved for gateway testing;
//! none of them belong to a real person.

use chrono::NaiveDate;
use efile_core::model::{
    AccountingMethod, AcknowledgmentStatus, Address, Adjustments, DeductionElection, Dependent,
    FilingStatus, Income, Person, ScheduleC, ScheduleCExpenses, SignatureBlock, TaxReturn, W2,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const TAX_YEAR: i32 = 2024;

pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tax_return: TaxReturn,
    pub expected: ExpectedResult,
}

/// Figures the engine must produce for the scenario to pass, plus the
/// verdict the gateway is expected to hand back.
pub struct ExpectedResult {
    pub acknowledgment: AcknowledgmentStatus,
    pub taxable_income: Decimal,
    pub total_tax: Decimal,
    pub refund: Decimal,
    pub amount_owed: Decimal,
}

pub fn all() -> Vec<Scenario> {
    vec![
        single_w2_filer(),
        joint_with_children(),
        self_employment(),
        eitc_eligible(),
    ]
}

pub fn by_id(id: &str) -> Option<Scenario> {
    all().into_iter().find(|s| s.id.eq_ignore_ascii_case(id))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn person(first_name: &str, last_name: &str, ssn: &str) -> Person {
    Person {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        ssn: ssn.to_string(),
    }
}

fn address(line1: &str, city: &str, state: &str, zip: &str) -> Address {
    Address {
        line1: line1.to_string(),
        apartment: None,
        city: city.to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
    }
}

fn signed() -> SignatureBlock {
    SignatureBlock {
        primary_pin: "12345".to_string(),
        primary_signature_date: date(2025, 2, 15),
        spouse_pin: None,
        spouse_signature_date: None,
        prior_year_agi: None,
    }
}

struct W2Input<'a> {
    employer_ein: &'a str,
    employer_name: &'a str,
    employer_address: Address,
    wages: Decimal,
    federal_withholding: Decimal,
    social_security_tax: Decimal,
    medicare_tax: Decimal,
}

fn w2(input: W2Input<'_>) -> W2 {
    W2 {
        employer_ein: input.employer_ein.to_string(),
        employer_name: input.employer_name.to_string(),
        employer_address: input.employer_address,
        wages: input.wages,
        federal_withholding: input.federal_withholding,
        social_security_wages: input.wages,
        social_security_tax: input.social_security_tax,
        medicare_wages: input.wages,
        medicare_tax: input.medicare_tax,
        retirement_plan: false,
        state_tax_groups: vec![],
    }
}

fn single_w2_filer() -> Scenario {
    Scenario {
        id: "ATS-001",
        name: "Single Filer - W-2 Only",
        description: "Basic single filer with W-2 income, standard deduction",
        tax_return: TaxReturn {
            tax_year: TAX_YEAR,
            filing_status: FilingStatus::Single,
            taxpayer: person("JOHN", "TESTCASE", "400000001"),
            spouse: None,
            address: address("123 TEST STREET", "INDIANAPOLIS", "IN", "46201"),
            dependents: vec![],
            income: Income {
                w2s: vec![w2(W2Input {
                    employer_ein: "123456789",
                    employer_name: "TEST CORPORATION",
                    employer_address: address("456 BUSINESS AVE", "CHICAGO", "IL", "60601"),
                    wages: dec!(50000),
                    federal_withholding: dec!(5000),
                    social_security_tax: dec!(3100),
                    medicare_tax: dec!(725),
                })],
                ..Income::default()
            },
            adjustments: Adjustments::default(),
            deduction: DeductionElection::Standard,
            estimated_payments: Decimal::ZERO,
            signature: signed(),
            direct_deposit: None,
        },
        expected: ExpectedResult {
            acknowledgment: AcknowledgmentStatus::Accepted,
            taxable_income: dec!(35400),
            total_tax: dec!(4016),
            refund: dec!(984),
            amount_owed: dec!(0),
        },
    }
}

fn joint_with_children() -> Scenario {
    Scenario {
        id: "ATS-002",
        name: "MFJ with Dependents",
        description: "Married filing jointly with two children, child tax credit",
        tax_return: TaxReturn {
            tax_year: TAX_YEAR,
            filing_status: FilingStatus::MarriedFilingJointly,
            taxpayer: person("JANE", "TESTCASE", "400000002"),
            spouse: Some(person("BOB", "TESTCASE", "400000003")),
            address: address("456 TEST AVENUE", "INDIANAPOLIS", "IN", "46202"),
            dependents: vec![
                Dependent {
                    first_name: "CHILD".to_string(),
                    last_name: "ONE".to_string(),
                    ssn: "400000004".to_string(),
                    relationship: "son".to_string(),
                    birth_date: date(2015, 5, 1),
                    ctc_eligible: true,
                    odc_eligible: false,
                },
                Dependent {
                    first_name: "CHILD".to_string(),
                    last_name: "TWO".to_string(),
                    ssn: "400000005".to_string(),
                    relationship: "daughter".to_string(),
                    birth_date: date(2018, 8, 15),
                    ctc_eligible: true,
                    odc_eligible: false,
                },
            ],
            income: Income {
                w2s: vec![w2(W2Input {
                    employer_ein: "987654321",
                    employer_name: "EMPLOYER ONE INC",
                    employer_address: address("789 WORK BLVD", "INDIANAPOLIS", "IN", "46203"),
                    wages: dec!(75000),
                    federal_withholding: dec!(8000),
                    social_security_tax: dec!(4650),
                    medicare_tax: dec!(1087.50),
                })],
                ..Income::default()
            },
            adjustments: Adjustments::default(),
            deduction: DeductionElection::Standard,
            estimated_payments: Decimal::ZERO,
            signature: SignatureBlock {
                spouse_pin: Some("54321".to_string()),
                spouse_signature_date: Some(date(2025, 2, 15)),
                ..signed()
            },
            direct_deposit: None,
        },
        expected: ExpectedResult {
            acknowledgment: AcknowledgmentStatus::Accepted,
            taxable_income: dec!(45800),
            total_tax: dec!(1032),
            refund: dec!(6968),
            amount_owed: dec!(0),
        },
    }
}

fn self_employment() -> Scenario {
    Scenario {
        id: "ATS-003",
        name: "Self-Employment Income",
        description: "Single filer with Schedule C business income",
        tax_return: TaxReturn {
            tax_year: TAX_YEAR,
            filing_status: FilingStatus::Single,
            taxpayer: person("SAM", "FREELANCE", "400000006"),
            spouse: None,
            address: address("789 CONTRACTOR LANE", "INDIANAPOLIS", "IN", "46204"),
            dependents: vec![],
            income: Income {
                businesses: vec![ScheduleC {
                    business_name: "FREELANCE SERVICES".to_string(),
                    activity_code: "541990".to_string(),
                    ein: None,
                    accounting_method: AccountingMethod::Cash,
                    gross_receipts: dec!(100000),
                    returns_and_allowances: Decimal::ZERO,
                    cost_of_goods_sold: Decimal::ZERO,
                    expenses: ScheduleCExpenses {
                        advertising: dec!(2000),
                        office_expense: dec!(5000),
                        supplies: dec!(3000),
                        utilities: dec!(2000),
                        other: dec!(8000),
                        ..ScheduleCExpenses::default()
                    },
                }],
                ..Income::default()
            },
            adjustments: Adjustments::default(),
            deduction: DeductionElection::Standard,
            estimated_payments: Decimal::ZERO,
            signature: signed(),
            direct_deposit: None,
        },
        expected: ExpectedResult {
            acknowledgment: AcknowledgmentStatus::Accepted,
            taxable_income: dec!(43748),
            total_tax: dec!(16322),
            refund: dec!(0),
            amount_owed: dec!(16322),
        },
    }
}

fn eitc_eligible() -> Scenario {
    Scenario {
        id: "ATS-004",
        name: "EITC Eligible",
        description: "Head of household with EITC eligibility",
        tax_return: TaxReturn {
            tax_year: TAX_YEAR,
            filing_status: FilingStatus::HeadOfHousehold,
            taxpayer: person("MARIA", "WORKER", "400000007"),
            spouse: None,
            address: address("321 MAIN STREET", "INDIANAPOLIS", "IN", "46205"),
            dependents: vec![Dependent {
                first_name: "JUNIOR".to_string(),
                last_name: "WORKER".to_string(),
                ssn: "400000008".to_string(),
                relationship: "son".to_string(),
                birth_date: date(2016, 9, 10),
                ctc_eligible: true,
                odc_eligible: false,
            }],
            income: Income {
                w2s: vec![w2(W2Input {
                    employer_ein: "112233445",
                    employer_name: "LOCAL STORE LLC",
                    employer_address: address("100 RETAIL WAY", "INDIANAPOLIS", "IN", "46206"),
                    wages: dec!(25000),
                    federal_withholding: dec!(1500),
                    social_security_tax: dec!(1550),
                    medicare_tax: dec!(362.50),
                })],
                ..Income::default()
            },
            adjustments: Adjustments::default(),
            deduction: DeductionElection::Standard,
            estimated_payments: Decimal::ZERO,
            signature: signed(),
            direct_deposit: None,
        },
        expected: ExpectedResult {
            acknowledgment: AcknowledgmentStatus::Accepted,
            taxable_income: dec!(3100),
            total_tax: dec!(0),
            refund: dec!(7039),
            amount_owed: dec!(0),
        },
    }
}
