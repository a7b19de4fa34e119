mod acknowledgment;
mod computed_result;
mod filing_status;
mod submission;
mod tax_return;
mod validation;

pub use acknowledgment::{AckError, Acknowledgment, AcknowledgmentStatus, ErrorCategory};
pub use computed_result::{AmtDetail, ComputedResult};
pub use filing_status::FilingStatus;
pub use submission::{Submission, SubmissionStatus, SubmissionType};
pub use tax_return::{
    AccountingMethod, Address, Adjustments, BankAccountType, DeductionElection, Dependent,
    DirectDeposit, Income, ItemizedDetail, Person, ScheduleC, ScheduleCExpenses, SignatureBlock,
    StateTaxGroup, TaxReturn, W2,
};
pub use validation::{ValidationIssue, ValidationOutcome};
