//! CSV loading for the per-year tax parameter files.
//!
//! Each tax year ships as a directory of five CSV files:
//!
//! - `brackets.csv`: rate schedules keyed by IRS schedule code (X, Y-1,
//!   Y-2, Z)
//! - `standard_deductions.csv`: one amount per schedule code
//! - `eitc.csv`: one row per qualifying-child count (0 through 3)
//! - `status_thresholds.csv`: per-filing-status thresholds keyed by status
//!   code (S, MFJ, MFS, HOH, QSS)
//! - `year_config.csv`: scalar key/value pairs
//!
//! [`load_tax_parameters`] reads all five, assembles a
//! [`TaxParameters`] set, and runs the bracket-coverage validation before
//! returning it.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use efile_core::model::FilingStatus;
use efile_core::params::{
    ActcParameters, AdditionalMedicareParameters, AmtParameters, CtcParameters, EitcParameters,
    EitcRow, NiitParameters, ParameterError, PerStatus, QbiParameters, SeTaxParameters, TaxBracket,
    TaxParameters,
};

/// Errors that can occur when loading parameter files.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("cannot read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in {file}: {message}")]
    CsvParse { file: String, message: String },

    #[error("invalid schedule code: {0}")]
    InvalidSchedule(String),

    #[error("invalid filing status code: {0}")]
    InvalidStatusCode(String),

    #[error("{file} has a row for tax year {found}, expected {expected}")]
    WrongYear {
        file: String,
        expected: i32,
        found: i32,
    },

    #[error("{file} is missing a row for filing status {status}")]
    MissingStatus { file: String, status: &'static str },

    #[error("eitc.csv qualifying_children must be 0 through 3, got {0}")]
    InvalidEitcChildren(u32),

    #[error("eitc.csv is missing the row for {0} qualifying children")]
    MissingEitcRow(u32),

    #[error("year_config.csv is missing key {0:?}")]
    MissingConfigKey(&'static str),

    #[error(transparent)]
    Invalid(#[from] ParameterError),
}

/// One row of `brackets.csv`.
///
/// The CSV uses IRS schedule designations:
/// - `schedule`: the IRS schedule code (X, Y-1, Y-2, Z)
/// - `max_income`: empty for the unbounded top band
/// - `rate`: the marginal rate as a decimal (e.g. 0.10 for 10%)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

/// One row of `standard_deductions.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeductionRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub amount: Decimal,
}

/// One row of `eitc.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EitcRecord {
    pub tax_year: i32,
    pub qualifying_children: u32,
    pub max_credit: Decimal,
    pub phase_in_rate: Decimal,
    pub phase_out_start: Decimal,
    pub phase_out_rate: Decimal,
    pub income_limit: Decimal,
}

/// One row of `status_thresholds.csv`, keyed by filing status code.
///
/// Thresholds get their own file because the schedule grouping does not
/// hold for them: a surviving spouse shares the joint rate schedule but
/// keeps the single-filer additional-Medicare and CTC thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThresholdRecord {
    pub tax_year: i32,
    pub status: String,
    pub additional_medicare_wages: Decimal,
    pub niit_magi: Decimal,
    pub amt_exemption: Decimal,
    pub amt_phase_out_start: Decimal,
    pub qbi_phase_out_start: Decimal,
    pub qbi_phase_out_end: Decimal,
    pub ctc_phase_out_threshold: Decimal,
}

/// One row of `year_config.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigRecord {
    pub tax_year: i32,
    pub key: String,
    pub value: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Maps IRS schedule codes to filing statuses.
///
/// - Schedule X → Single
/// - Schedule Y-1 → Married Filing Jointly and Qualifying Surviving Spouse
/// - Schedule Y-2 → Married Filing Separately
/// - Schedule Z → Head of Household
fn schedule_statuses(schedule: &str) -> Result<&'static [FilingStatus], LoaderError> {
    match schedule {
        "X" => Ok(&[FilingStatus::Single]),
        "Y-1" => Ok(&[
            FilingStatus::MarriedFilingJointly,
            FilingStatus::QualifyingSurvivingSpouse,
        ]),
        "Y-2" => Ok(&[FilingStatus::MarriedFilingSeparately]),
        "Z" => Ok(&[FilingStatus::HeadOfHousehold]),
        _ => Err(LoaderError::InvalidSchedule(schedule.to_string())),
    }
}

fn status_from_code(code: &str) -> Result<FilingStatus, LoaderError> {
    FilingStatus::parse(code).ok_or_else(|| LoaderError::InvalidStatusCode(code.to_string()))
}

fn parse_records<T, R>(reader: R, file: &str) -> Result<Vec<T>, LoaderError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: T = result.map_err(|err| LoaderError::CsvParse {
            file: file.to_string(),
            message: err.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parse bracket records from a CSV reader.
pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, LoaderError> {
    parse_records(reader, "brackets.csv")
}

/// Parse standard deduction records from a CSV reader.
pub fn parse_deductions<R: Read>(reader: R) -> Result<Vec<DeductionRecord>, LoaderError> {
    parse_records(reader, "standard_deductions.csv")
}

/// Parse EITC table records from a CSV reader.
pub fn parse_eitc<R: Read>(reader: R) -> Result<Vec<EitcRecord>, LoaderError> {
    parse_records(reader, "eitc.csv")
}

/// Parse per-status threshold records from a CSV reader.
pub fn parse_thresholds<R: Read>(reader: R) -> Result<Vec<ThresholdRecord>, LoaderError> {
    parse_records(reader, "status_thresholds.csv")
}

/// Parse year scalar records from a CSV reader.
pub fn parse_config<R: Read>(reader: R) -> Result<Vec<ConfigRecord>, LoaderError> {
    parse_records(reader, "year_config.csv")
}

fn check_year(file: &str, expected: i32, found: i32) -> Result<(), LoaderError> {
    if found != expected {
        return Err(LoaderError::WrongYear {
            file: file.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn build_per_status<T: Clone>(
    file: &str,
    entries: &[(FilingStatus, T)],
) -> Result<PerStatus<T>, LoaderError> {
    let pick = |status: FilingStatus| {
        entries
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| LoaderError::MissingStatus {
                file: file.to_string(),
                status: status.as_str(),
            })
    };
    Ok(PerStatus {
        single: pick(FilingStatus::Single)?,
        married_filing_jointly: pick(FilingStatus::MarriedFilingJointly)?,
        married_filing_separately: pick(FilingStatus::MarriedFilingSeparately)?,
        head_of_household: pick(FilingStatus::HeadOfHousehold)?,
        qualifying_surviving_spouse: pick(FilingStatus::QualifyingSurvivingSpouse)?,
    })
}

fn brackets_per_status(
    records: &[BracketRecord],
    tax_year: i32,
) -> Result<PerStatus<Vec<TaxBracket>>, LoaderError> {
    let mut schedules: Vec<(FilingStatus, Vec<TaxBracket>)> = Vec::new();
    for record in records {
        check_year("brackets.csv", tax_year, record.tax_year)?;
        for &status in schedule_statuses(&record.schedule)? {
            let bracket = TaxBracket {
                min_income: record.min_income,
                max_income: record.max_income,
                base_tax: record.base_tax,
                rate: record.rate,
            };
            match schedules.iter_mut().find(|(s, _)| *s == status) {
                Some((_, list)) => list.push(bracket),
                None => schedules.push((status, vec![bracket])),
            }
        }
    }
    build_per_status("brackets.csv", &schedules)
}

fn deductions_per_status(
    records: &[DeductionRecord],
    tax_year: i32,
) -> Result<PerStatus<Decimal>, LoaderError> {
    let mut amounts: Vec<(FilingStatus, Decimal)> = Vec::new();
    for record in records {
        check_year("standard_deductions.csv", tax_year, record.tax_year)?;
        for &status in schedule_statuses(&record.schedule)? {
            amounts.push((status, record.amount));
        }
    }
    build_per_status("standard_deductions.csv", &amounts)
}

fn eitc_rows(records: &[EitcRecord], tax_year: i32) -> Result<[EitcRow; 4], LoaderError> {
    let mut rows: [Option<EitcRow>; 4] = [None, None, None, None];
    for record in records {
        check_year("eitc.csv", tax_year, record.tax_year)?;
        if record.qualifying_children > 3 {
            return Err(LoaderError::InvalidEitcChildren(record.qualifying_children));
        }
        rows[record.qualifying_children as usize] = Some(EitcRow {
            max_credit: record.max_credit,
            phase_in_rate: record.phase_in_rate,
            phase_out_start: record.phase_out_start,
            phase_out_rate: record.phase_out_rate,
            income_limit: record.income_limit,
        });
    }

    let [zero, one, two, three] = rows;
    Ok([
        zero.ok_or(LoaderError::MissingEitcRow(0))?,
        one.ok_or(LoaderError::MissingEitcRow(1))?,
        two.ok_or(LoaderError::MissingEitcRow(2))?,
        three.ok_or(LoaderError::MissingEitcRow(3))?,
    ])
}

fn config_map(records: &[ConfigRecord], tax_year: i32) -> Result<HashMap<String, Decimal>, LoaderError> {
    let mut map = HashMap::new();
    for record in records {
        check_year("year_config.csv", tax_year, record.tax_year)?;
        map.insert(record.key.clone(), record.value);
    }
    Ok(map)
}

fn config(map: &HashMap<String, Decimal>, key: &'static str) -> Result<Decimal, LoaderError> {
    map.get(key).copied().ok_or(LoaderError::MissingConfigKey(key))
}

fn open(dir: &Path, file: &str) -> Result<File, LoaderError> {
    let path = dir.join(file);
    File::open(&path).map_err(|source| LoaderError::Io {
        file: path.display().to_string(),
        source,
    })
}

/// Load, assemble, and validate the parameter set for one tax year.
///
/// `dir` is the year directory itself (e.g. `params/2024`); every record in
/// every file must carry the expected tax year.
pub fn load_tax_parameters(dir: impl AsRef<Path>, tax_year: i32) -> Result<TaxParameters, LoaderError> {
    let dir = dir.as_ref();

    let brackets = parse_brackets(open(dir, "brackets.csv")?)?;
    let deductions = parse_deductions(open(dir, "standard_deductions.csv")?)?;
    let eitc = parse_eitc(open(dir, "eitc.csv")?)?;
    let thresholds = parse_thresholds(open(dir, "status_thresholds.csv")?)?;
    let scalars = parse_config(open(dir, "year_config.csv")?)?;

    let mut threshold_entries: Vec<(FilingStatus, ThresholdRecord)> = Vec::new();
    for record in &thresholds {
        check_year("status_thresholds.csv", tax_year, record.tax_year)?;
        threshold_entries.push((status_from_code(&record.status)?, record.clone()));
    }
    let threshold_field = |field: fn(&ThresholdRecord) -> Decimal| {
        let entries: Vec<(FilingStatus, Decimal)> = threshold_entries
            .iter()
            .map(|(status, record)| (*status, field(record)))
            .collect();
        build_per_status("status_thresholds.csv", &entries)
    };

    let scalars = config_map(&scalars, tax_year)?;

    let params = TaxParameters {
        tax_year,
        brackets: brackets_per_status(&brackets, tax_year)?,
        standard_deduction: deductions_per_status(&deductions, tax_year)?,
        eitc: EitcParameters {
            rows: eitc_rows(&eitc, tax_year)?,
            joint_adjustment: config(&scalars, "eitc_joint_adjustment")?,
            investment_income_limit: config(&scalars, "eitc_investment_income_limit")?,
        },
        ctc: CtcParameters {
            credit_per_child: config(&scalars, "ctc_credit_per_child")?,
            credit_per_other_dependent: config(&scalars, "ctc_credit_per_other_dependent")?,
            phase_out_threshold: threshold_field(|r| r.ctc_phase_out_threshold)?,
            phase_out_step: config(&scalars, "ctc_phase_out_step")?,
            phase_out_rate: config(&scalars, "ctc_phase_out_rate")?,
        },
        actc: ActcParameters {
            earned_income_floor: config(&scalars, "actc_earned_income_floor")?,
            refundable_rate: config(&scalars, "actc_refundable_rate")?,
            max_refundable_per_child: config(&scalars, "actc_max_refundable_per_child")?,
        },
        amt: AmtParameters {
            exemption: threshold_field(|r| r.amt_exemption)?,
            phase_out_start: threshold_field(|r| r.amt_phase_out_start)?,
            phase_out_rate: config(&scalars, "amt_phase_out_rate")?,
            low_rate: config(&scalars, "amt_low_rate")?,
            high_rate: config(&scalars, "amt_high_rate")?,
            high_rate_threshold: config(&scalars, "amt_high_rate_threshold")?,
        },
        niit: NiitParameters {
            rate: config(&scalars, "niit_rate")?,
            magi_threshold: threshold_field(|r| r.niit_magi)?,
        },
        additional_medicare: AdditionalMedicareParameters {
            rate: config(&scalars, "additional_medicare_rate")?,
            wage_threshold: threshold_field(|r| r.additional_medicare_wages)?,
        },
        qbi: QbiParameters {
            rate: config(&scalars, "qbi_rate")?,
            phase_out_start: threshold_field(|r| r.qbi_phase_out_start)?,
            phase_out_end: threshold_field(|r| r.qbi_phase_out_end)?,
        },
        se_tax: SeTaxParameters {
            ss_wage_max: config(&scalars, "se_ss_wage_max")?,
            ss_tax_rate: config(&scalars, "se_ss_tax_rate")?,
            medicare_tax_rate: config(&scalars, "se_medicare_tax_rate")?,
            net_earnings_factor: config(&scalars, "se_net_earnings_factor")?,
            deduction_factor: config(&scalars, "se_deduction_factor")?,
            min_se_threshold: config(&scalars, "se_min_threshold")?,
        },
        salt_cap: config(&scalars, "salt_cap")?,
        educator_expense_cap: config(&scalars, "educator_expense_cap")?,
        student_loan_interest_cap: config(&scalars, "student_loan_interest_cap")?,
    };

    params.validate()?;
    Ok(params)
}
