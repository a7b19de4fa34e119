//! Submission lifecycle: the transition table and the acknowledgment
//! ledger.

use std::collections::HashMap;

use efile_core::model::{Acknowledgment, AcknowledgmentStatus, Submission, SubmissionStatus};
use thiserror::Error;

/// Total transmission attempts a rejected return may consume.
pub const MAX_RESUBMISSIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("submission {submission_id} cannot move {from:?} -> {to:?}")]
    InvalidTransition {
        submission_id: String,
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("submission {0} has exhausted its transmission attempts")]
    AttemptsExhausted(String),

    #[error("acknowledgment for {acknowledgment_id} cannot be applied to submission {submission_id}")]
    AcknowledgmentMismatch {
        submission_id: String,
        acknowledgment_id: String,
    },
}

fn is_valid_transition(from: SubmissionStatus, to: SubmissionStatus) -> bool {
    use SubmissionStatus::*;
    matches!(
        (from, to),
        (Pending, Transmitting)
            | (Transmitting, Transmitted)
            | (Transmitting, Error)
            | (Transmitted, Accepted)
            | (Transmitted, Rejected)
            | (Rejected, Transmitting)
            | (Error, Transmitting)
    )
}

/// Advances submissions through their lifecycle and keeps the
/// acknowledgments the gateway has handed back.
///
/// Re-transmission after a transport error is always allowed; the
/// resubmission cap gates only rejected returns.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    acknowledgments: HashMap<String, Acknowledgment>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a submission to `to`, enforcing the transition table. Entering
    /// `Transmitting` consumes one attempt.
    pub fn try_transition(
        submission: &mut Submission,
        to: SubmissionStatus,
    ) -> Result<(), TrackerError> {
        let from = submission.status;
        if !is_valid_transition(from, to) {
            return Err(TrackerError::InvalidTransition {
                submission_id: submission.submission_id.clone(),
                from,
                to,
            });
        }
        if from == SubmissionStatus::Rejected
            && to == SubmissionStatus::Transmitting
            && submission.attempts >= MAX_RESUBMISSIONS
        {
            return Err(TrackerError::AttemptsExhausted(
                submission.submission_id.clone(),
            ));
        }

        if to == SubmissionStatus::Transmitting {
            submission.attempts += 1;
        }
        submission.status = to;
        Ok(())
    }

    pub fn can_resubmit(submission: &Submission) -> bool {
        submission.status == SubmissionStatus::Rejected
            && submission.attempts < MAX_RESUBMISSIONS
    }

    /// Applies a fetched acknowledgment: accepted and rejected verdicts
    /// advance the state machine and are recorded; a still-pending
    /// acknowledgment changes nothing.
    pub fn apply_acknowledgment(
        &mut self,
        submission: &mut Submission,
        acknowledgment: &Acknowledgment,
    ) -> Result<(), TrackerError> {
        if acknowledgment.submission_id != submission.submission_id {
            return Err(TrackerError::AcknowledgmentMismatch {
                submission_id: submission.submission_id.clone(),
                acknowledgment_id: acknowledgment.submission_id.clone(),
            });
        }

        match acknowledgment.status {
            AcknowledgmentStatus::Accepted => {
                Self::try_transition(submission, SubmissionStatus::Accepted)?;
            }
            AcknowledgmentStatus::Rejected => {
                Self::try_transition(submission, SubmissionStatus::Rejected)?;
            }
            AcknowledgmentStatus::Pending => return Ok(()),
        }

        self.acknowledgments
            .insert(acknowledgment.submission_id.clone(), acknowledgment.clone());
        Ok(())
    }

    /// The recorded verdict for a submission, if one has arrived. Carries
    /// the DCN for accepted returns and the error list for rejected ones.
    pub fn acknowledgment_for(&self, submission_id: &str) -> Option<&Acknowledgment> {
        self.acknowledgments.get(submission_id)
    }
}
