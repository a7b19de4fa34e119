use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filing_status::FilingStatus;

/// One complete federal return as assembled by the intake workflow.
///
/// Treated as a read-only value object for the duration of one
/// compute/encode/transmit cycle; nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxReturn {
    pub tax_year: i32,
    pub filing_status: FilingStatus,
    pub taxpayer: Person,
    pub spouse: Option<Person>,
    pub address: Address,
    pub dependents: Vec<Dependent>,
    pub income: Income,
    pub adjustments: Adjustments,
    pub deduction: DeductionElection,
    pub estimated_payments: Decimal,
    pub signature: SignatureBlock,
    pub direct_deposit: Option<DirectDeposit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    /// Nine digits, no separators.
    pub ssn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub first_name: String,
    pub last_name: String,
    pub ssn: String,
    pub relationship: String,
    pub birth_date: NaiveDate,
    pub ctc_eligible: bool,
    pub odc_eligible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub w2s: Vec<W2>,
    pub taxable_interest: Decimal,
    pub ordinary_dividends: Decimal,
    pub qualified_dividends: Decimal,
    pub capital_gains: Decimal,
    pub businesses: Vec<ScheduleC>,
    pub other_income: Decimal,
}

impl Income {
    pub fn total_wages(&self) -> Decimal {
        self.w2s.iter().map(|w| w.wages).sum()
    }

    pub fn total_withholding(&self) -> Decimal {
        self.w2s.iter().map(|w| w.federal_withholding).sum()
    }

    pub fn total_social_security_wages(&self) -> Decimal {
        self.w2s.iter().map(|w| w.social_security_wages).sum()
    }

    /// Combined Schedule C net profit or loss across all businesses.
    pub fn business_net_profit(&self) -> Decimal {
        self.businesses.iter().map(|b| b.net_profit()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct W2 {
    pub employer_ein: String,
    pub employer_name: String,
    pub employer_address: Address,
    pub wages: Decimal,
    pub federal_withholding: Decimal,
    pub social_security_wages: Decimal,
    pub social_security_tax: Decimal,
    pub medicare_wages: Decimal,
    pub medicare_tax: Decimal,
    pub retirement_plan: bool,
    pub state_tax_groups: Vec<StateTaxGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxGroup {
    pub state: String,
    pub employer_state_id: String,
    pub state_wages: Decimal,
    pub state_withholding: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleC {
    pub business_name: String,
    /// Six-digit principal business activity code.
    pub activity_code: String,
    pub ein: Option<String>,
    pub accounting_method: AccountingMethod,
    pub gross_receipts: Decimal,
    pub returns_and_allowances: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub expenses: ScheduleCExpenses,
}

impl ScheduleC {
    pub fn gross_income(&self) -> Decimal {
        self.gross_receipts - self.returns_and_allowances
    }

    pub fn gross_profit(&self) -> Decimal {
        self.gross_income() - self.cost_of_goods_sold
    }

    pub fn net_profit(&self) -> Decimal {
        self.gross_profit() - self.expenses.total()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountingMethod {
    Cash,
    Accrual,
}

impl AccountingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Accrual => "ACCRUAL",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCExpenses {
    pub advertising: Decimal,
    pub car_and_truck: Decimal,
    pub commissions_and_fees: Decimal,
    pub contract_labor: Decimal,
    pub depreciation: Decimal,
    pub insurance: Decimal,
    pub mortgage_interest: Decimal,
    pub other_interest: Decimal,
    pub legal_and_professional: Decimal,
    pub office_expense: Decimal,
    pub rent_machinery: Decimal,
    pub rent_other: Decimal,
    pub repairs: Decimal,
    pub supplies: Decimal,
    pub taxes_and_licenses: Decimal,
    pub travel: Decimal,
    pub meals: Decimal,
    pub utilities: Decimal,
    pub wages: Decimal,
    pub other: Decimal,
}

impl ScheduleCExpenses {
    pub fn total(&self) -> Decimal {
        self.advertising
            + self.car_and_truck
            + self.commissions_and_fees
            + self.contract_labor
            + self.depreciation
            + self.insurance
            + self.mortgage_interest
            + self.other_interest
            + self.legal_and_professional
            + self.office_expense
            + self.rent_machinery
            + self.rent_other
            + self.repairs
            + self.supplies
            + self.taxes_and_licenses
            + self.travel
            + self.meals
            + self.utilities
            + self.wages
            + self.other
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    pub educator_expenses: Decimal,
    pub hsa_deduction: Decimal,
    pub self_employed_health_insurance: Decimal,
    pub ira_deduction: Decimal,
    pub student_loan_interest: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeductionElection {
    Standard,
    Itemized(ItemizedDetail),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedDetail {
    pub medical_expenses: Decimal,
    pub state_local_income_taxes: Decimal,
    pub real_estate_taxes: Decimal,
    pub personal_property_taxes: Decimal,
    pub mortgage_interest: Decimal,
    pub mortgage_insurance_premiums: Decimal,
    pub charitable_cash: Decimal,
    pub charitable_noncash: Decimal,
    pub casualty_losses: Decimal,
    pub other: Decimal,
}

impl ItemizedDetail {
    /// State and local tax component before the statutory cap.
    pub fn salt_total(&self) -> Decimal {
        self.state_local_income_taxes + self.real_estate_taxes + self.personal_property_taxes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBlock {
    /// Five-digit self-select PIN.
    pub primary_pin: String,
    pub primary_signature_date: NaiveDate,
    pub spouse_pin: Option<String>,
    pub spouse_signature_date: Option<NaiveDate>,
    /// Pass-through for the regulator's identity check; not verified here.
    pub prior_year_agi: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDeposit {
    pub routing_number: String,
    pub account_number: String,
    pub account_type: BankAccountType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankAccountType {
    Checking,
    Savings,
}

impl BankAccountType {
    /// Code used in the `BankAccountTypeCd` element.
    pub fn mef_code(&self) -> u8 {
        match self {
            Self::Checking => 1,
            Self::Savings => 2,
        }
    }
}
