//! Shared fixtures for unit tests: a complete 2024 parameter set and a
//! minimal valid return that individual tests mutate as needed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{
    AccountingMethod, Address, Adjustments, DeductionElection, Dependent, FilingStatus, Income,
    Person, ScheduleC, ScheduleCExpenses, SignatureBlock, TaxReturn, W2,
};
use crate::params::{
    ActcParameters, AdditionalMedicareParameters, AmtParameters, CtcParameters, EitcParameters,
    EitcRow, NiitParameters, PerStatus, QbiParameters, SeTaxParameters, TaxBracket, TaxParameters,
};

fn bracket(min: Decimal, max: Option<Decimal>, base: Decimal, rate: Decimal) -> TaxBracket {
    TaxBracket {
        min_income: min,
        max_income: max,
        base_tax: base,
        rate,
    }
}

fn brackets_single() -> Vec<TaxBracket> {
    vec![
        bracket(dec!(0), Some(dec!(11600)), dec!(0), dec!(0.10)),
        bracket(dec!(11600), Some(dec!(47150)), dec!(1160), dec!(0.12)),
        bracket(dec!(47150), Some(dec!(100525)), dec!(5426), dec!(0.22)),
        bracket(dec!(100525), Some(dec!(191950)), dec!(17168.50), dec!(0.24)),
        bracket(dec!(191950), Some(dec!(243725)), dec!(39110.50), dec!(0.32)),
        bracket(dec!(243725), Some(dec!(609350)), dec!(55678.50), dec!(0.35)),
        bracket(dec!(609350), None, dec!(183647.25), dec!(0.37)),
    ]
}

fn brackets_joint() -> Vec<TaxBracket> {
    vec![
        bracket(dec!(0), Some(dec!(23200)), dec!(0), dec!(0.10)),
        bracket(dec!(23200), Some(dec!(94300)), dec!(2320), dec!(0.12)),
        bracket(dec!(94300), Some(dec!(201050)), dec!(10852), dec!(0.22)),
        bracket(dec!(201050), Some(dec!(383900)), dec!(34337), dec!(0.24)),
        bracket(dec!(383900), Some(dec!(487450)), dec!(78221), dec!(0.32)),
        bracket(dec!(487450), Some(dec!(731200)), dec!(111357), dec!(0.35)),
        bracket(dec!(731200), None, dec!(196669.50), dec!(0.37)),
    ]
}

fn brackets_separate() -> Vec<TaxBracket> {
    vec![
        bracket(dec!(0), Some(dec!(11600)), dec!(0), dec!(0.10)),
        bracket(dec!(11600), Some(dec!(47150)), dec!(1160), dec!(0.12)),
        bracket(dec!(47150), Some(dec!(100525)), dec!(5426), dec!(0.22)),
        bracket(dec!(100525), Some(dec!(191950)), dec!(17168.50), dec!(0.24)),
        bracket(dec!(191950), Some(dec!(243725)), dec!(39110.50), dec!(0.32)),
        bracket(dec!(243725), Some(dec!(365600)), dec!(55678.50), dec!(0.35)),
        bracket(dec!(365600), None, dec!(98334.75), dec!(0.37)),
    ]
}

fn brackets_head_of_household() -> Vec<TaxBracket> {
    vec![
        bracket(dec!(0), Some(dec!(16550)), dec!(0), dec!(0.10)),
        bracket(dec!(16550), Some(dec!(63100)), dec!(1655), dec!(0.12)),
        bracket(dec!(63100), Some(dec!(100500)), dec!(7241), dec!(0.22)),
        bracket(dec!(100500), Some(dec!(191950)), dec!(15469), dec!(0.24)),
        bracket(dec!(191950), Some(dec!(243700)), dec!(37417), dec!(0.32)),
        bracket(dec!(243700), Some(dec!(609350)), dec!(53977), dec!(0.35)),
        bracket(dec!(609350), None, dec!(181954.50), dec!(0.37)),
    ]
}

/// The complete published 2024 parameter set.
pub fn parameters_2024() -> TaxParameters {
    TaxParameters {
        tax_year: 2024,
        brackets: PerStatus {
            single: brackets_single(),
            married_filing_jointly: brackets_joint(),
            married_filing_separately: brackets_separate(),
            head_of_household: brackets_head_of_household(),
            qualifying_surviving_spouse: brackets_joint(),
        },
        standard_deduction: PerStatus {
            single: dec!(14600),
            married_filing_jointly: dec!(29200),
            married_filing_separately: dec!(14600),
            head_of_household: dec!(21900),
            qualifying_surviving_spouse: dec!(29200),
        },
        eitc: EitcParameters {
            rows: [
                EitcRow {
                    max_credit: dec!(632),
                    phase_in_rate: dec!(0.0765),
                    phase_out_start: dec!(9800),
                    phase_out_rate: dec!(0.0765),
                    income_limit: dec!(18591),
                },
                EitcRow {
                    max_credit: dec!(4213),
                    phase_in_rate: dec!(0.34),
                    phase_out_start: dec!(22720),
                    phase_out_rate: dec!(0.1598),
                    income_limit: dec!(49084),
                },
                EitcRow {
                    max_credit: dec!(6960),
                    phase_in_rate: dec!(0.40),
                    phase_out_start: dec!(22720),
                    phase_out_rate: dec!(0.2106),
                    income_limit: dec!(55768),
                },
                EitcRow {
                    max_credit: dec!(7830),
                    phase_in_rate: dec!(0.45),
                    phase_out_start: dec!(22720),
                    phase_out_rate: dec!(0.2106),
                    income_limit: dec!(59899),
                },
            ],
            joint_adjustment: dec!(7430),
            investment_income_limit: dec!(11600),
        },
        ctc: CtcParameters {
            credit_per_child: dec!(2000),
            credit_per_other_dependent: dec!(500),
            phase_out_threshold: PerStatus {
                single: dec!(200000),
                married_filing_jointly: dec!(400000),
                married_filing_separately: dec!(200000),
                head_of_household: dec!(200000),
                qualifying_surviving_spouse: dec!(200000),
            },
            phase_out_step: dec!(1000),
            phase_out_rate: dec!(50),
        },
        actc: ActcParameters {
            earned_income_floor: dec!(2500),
            refundable_rate: dec!(0.15),
            max_refundable_per_child: dec!(1700),
        },
        amt: AmtParameters {
            exemption: PerStatus {
                single: dec!(85700),
                married_filing_jointly: dec!(133300),
                married_filing_separately: dec!(66650),
                head_of_household: dec!(85700),
                qualifying_surviving_spouse: dec!(133300),
            },
            phase_out_start: PerStatus {
                single: dec!(609350),
                married_filing_jointly: dec!(1218700),
                married_filing_separately: dec!(609350),
                head_of_household: dec!(609350),
                qualifying_surviving_spouse: dec!(1218700),
            },
            phase_out_rate: dec!(0.25),
            low_rate: dec!(0.26),
            high_rate: dec!(0.28),
            high_rate_threshold: dec!(232600),
        },
        niit: NiitParameters {
            rate: dec!(0.038),
            magi_threshold: PerStatus {
                single: dec!(200000),
                married_filing_jointly: dec!(250000),
                married_filing_separately: dec!(125000),
                head_of_household: dec!(200000),
                qualifying_surviving_spouse: dec!(250000),
            },
        },
        additional_medicare: AdditionalMedicareParameters {
            rate: dec!(0.009),
            wage_threshold: PerStatus {
                single: dec!(200000),
                married_filing_jointly: dec!(250000),
                married_filing_separately: dec!(125000),
                head_of_household: dec!(200000),
                qualifying_surviving_spouse: dec!(200000),
            },
        },
        qbi: QbiParameters {
            rate: dec!(0.20),
            phase_out_start: PerStatus {
                single: dec!(191950),
                married_filing_jointly: dec!(383900),
                married_filing_separately: dec!(191950),
                head_of_household: dec!(191950),
                qualifying_surviving_spouse: dec!(383900),
            },
            phase_out_end: PerStatus {
                single: dec!(241950),
                married_filing_jointly: dec!(483900),
                married_filing_separately: dec!(241950),
                head_of_household: dec!(241950),
                qualifying_surviving_spouse: dec!(483900),
            },
        },
        se_tax: SeTaxParameters {
            ss_wage_max: dec!(168600),
            ss_tax_rate: dec!(0.124),
            medicare_tax_rate: dec!(0.029),
            net_earnings_factor: dec!(0.9235),
            deduction_factor: dec!(0.50),
            min_se_threshold: dec!(400),
        },
        salt_cap: dec!(10000),
        educator_expense_cap: dec!(300),
        student_loan_interest_cap: dec!(2500),
    }
}

pub fn test_address() -> Address {
    Address {
        line1: "123 MAIN ST".to_string(),
        apartment: None,
        city: "INDIANAPOLIS".to_string(),
        state: "IN".to_string(),
        zip: "46201".to_string(),
    }
}

pub fn test_w2(wages: Decimal, withholding: Decimal) -> W2 {
    W2 {
        employer_ein: "351234567".to_string(),
        employer_name: "TEST EMPLOYER INC".to_string(),
        employer_address: Address {
            line1: "456 BUSINESS BLVD".to_string(),
            apartment: None,
            city: "INDIANAPOLIS".to_string(),
            state: "IN".to_string(),
            zip: "46204".to_string(),
        },
        wages,
        federal_withholding: withholding,
        social_security_wages: wages,
        social_security_tax: (wages * dec!(0.062)).round_dp(2),
        medicare_wages: wages,
        medicare_tax: (wages * dec!(0.0145)).round_dp(2),
        retirement_plan: false,
        state_tax_groups: vec![],
    }
}

pub fn test_dependent(first_name: &str, ssn: &str, ctc_eligible: bool) -> Dependent {
    Dependent {
        first_name: first_name.to_string(),
        last_name: "TESTCASE".to_string(),
        ssn: ssn.to_string(),
        relationship: "son".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2015, 5, 1).unwrap(),
        ctc_eligible,
        odc_eligible: !ctc_eligible,
    }
}

pub fn test_business(gross_receipts: Decimal) -> ScheduleC {
    ScheduleC {
        business_name: "FREELANCE SERVICES".to_string(),
        activity_code: "541990".to_string(),
        ein: None,
        accounting_method: AccountingMethod::Cash,
        gross_receipts,
        returns_and_allowances: dec!(0),
        cost_of_goods_sold: dec!(0),
        expenses: ScheduleCExpenses::default(),
    }
}

/// A single filer with one $50,000 W-2 and $5,000 withheld. Tests adjust
/// fields from here instead of building returns from scratch.
pub fn single_filer_return() -> TaxReturn {
    TaxReturn {
        tax_year: 2024,
        filing_status: FilingStatus::Single,
        taxpayer: Person {
            first_name: "JOHN".to_string(),
            last_name: "TESTCASE".to_string(),
            ssn: "400000001".to_string(),
        },
        spouse: None,
        address: test_address(),
        dependents: vec![],
        income: Income {
            w2s: vec![test_w2(dec!(50000), dec!(5000))],
            ..Income::default()
        },
        adjustments: Adjustments::default(),
        deduction: DeductionElection::Standard,
        estimated_payments: dec!(0),
        signature: SignatureBlock {
            primary_pin: "12345".to_string(),
            primary_signature_date: NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
            spouse_pin: None,
            spouse_signature_date: None,
            prior_year_agi: Some(dec!(48000)),
        },
        direct_deposit: None,
    }
}

/// Married filing jointly, two CTC-eligible children, $75,000 wages.
pub fn joint_return_two_children() -> TaxReturn {
    let mut tax_return = single_filer_return();
    tax_return.filing_status = FilingStatus::MarriedFilingJointly;
    tax_return.taxpayer.first_name = "JANE".to_string();
    tax_return.spouse = Some(Person {
        first_name: "BOB".to_string(),
        last_name: "TESTCASE".to_string(),
        ssn: "400000003".to_string(),
    });
    tax_return.dependents = vec![
        test_dependent("CHILD ONE", "400000004", true),
        test_dependent("CHILD TWO", "400000005", true),
    ];
    tax_return.income.w2s = vec![test_w2(dec!(75000), dec!(8000))];
    tax_return.signature.spouse_pin = Some("54321".to_string());
    tax_return.signature.spouse_signature_date = Some(tax_return.signature.primary_signature_date);
    tax_return
}
