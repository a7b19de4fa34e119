//! An in-process gateway for acceptance runs without IRS connectivity.
//!
//! Verdicts are deterministic: receipt ids and DCNs are derived from the
//! submission id, so re-running a scenario produces identical evidence.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use efile_core::model::{
    AckError, Acknowledgment, AcknowledgmentStatus, Submission, SubmissionStatus,
};
use sha2::{Digest, Sha256};

use crate::error::TransportError;
use crate::gateway::{MefGateway, TransmitOutcome};

/// Accepts every submission unless constructed with `rejecting`, in which
/// case every acknowledgment carries the given errors.
#[derive(Debug, Default)]
pub struct SimulatedGateway {
    transmitted: Mutex<HashSet<String>>,
    reject_with: Option<Vec<AckError>>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that rejects every submission with the given error list.
    pub fn rejecting(errors: Vec<AckError>) -> Self {
        SimulatedGateway {
            transmitted: Mutex::new(HashSet::new()),
            reject_with: Some(errors),
        }
    }

    fn has_seen(&self, submission_id: &str) -> bool {
        self.transmitted.lock().unwrap().contains(submission_id)
    }
}

/// First `count` digits derived from a hash of the submission id.
fn digits_from_id(submission_id: &str, count: usize) -> String {
    Sha256::digest(submission_id.as_bytes())
        .iter()
        .map(|byte| char::from(b'0' + byte % 10))
        .take(count)
        .collect()
}

#[async_trait]
impl MefGateway for SimulatedGateway {
    async fn transmit(
        &self,
        submission: &Submission,
    ) -> Result<TransmitOutcome, TransportError> {
        self.transmitted
            .lock()
            .unwrap()
            .insert(submission.submission_id.clone());
        tracing::info!(
            submission_id = %submission.submission_id,
            "simulated gateway took custody of submission"
        );

        Ok(TransmitOutcome {
            submission_id: submission.submission_id.clone(),
            receipt_id: Some(format!("SIM{}", digits_from_id(&submission.submission_id, 12))),
            transmitted_at: Utc::now(),
        })
    }

    async fn get_acknowledgment(
        &self,
        submission_id: &str,
    ) -> Result<Acknowledgment, TransportError> {
        if !self.has_seen(submission_id) {
            return Ok(Acknowledgment {
                submission_id: submission_id.to_string(),
                status: AcknowledgmentStatus::Pending,
                dcn: None,
                errors: vec![],
                received_at: Utc::now(),
            });
        }

        let acknowledgment = match &self.reject_with {
            None => Acknowledgment {
                submission_id: submission_id.to_string(),
                status: AcknowledgmentStatus::Accepted,
                dcn: Some(digits_from_id(submission_id, 14)),
                errors: vec![],
                received_at: Utc::now(),
            },
            Some(errors) => Acknowledgment {
                submission_id: submission_id.to_string(),
                status: AcknowledgmentStatus::Rejected,
                dcn: None,
                errors: errors.clone(),
                received_at: Utc::now(),
            },
        };
        Ok(acknowledgment)
    }

    async fn get_status(&self, submission_id: &str) -> Result<SubmissionStatus, TransportError> {
        if !self.has_seen(submission_id) {
            return Ok(SubmissionStatus::Pending);
        }
        Ok(match self.reject_with {
            None => SubmissionStatus::Accepted,
            Some(_) => SubmissionStatus::Rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use efile_core::model::ErrorCategory;
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission() -> Submission {
        Submission::new(
            "35845920250460a1b2c3".to_string(),
            2024,
            "<Return/>".to_string(),
        )
    }

    #[tokio::test]
    async fn acknowledgment_is_deterministic_per_submission_id() {
        let gateway = SimulatedGateway::new();
        let submission = submission();

        let outcome = gateway.transmit(&submission).await.unwrap();
        assert!(outcome.receipt_id.unwrap().starts_with("SIM"));

        let first = gateway
            .get_acknowledgment(&submission.submission_id)
            .await
            .unwrap();
        let second = gateway
            .get_acknowledgment(&submission.submission_id)
            .await
            .unwrap();

        assert_eq!(first.status, AcknowledgmentStatus::Accepted);
        assert_eq!(first.dcn, second.dcn);
        let dcn = first.dcn.unwrap();
        assert_eq!(dcn.len(), 14);
        assert!(dcn.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn unseen_submissions_read_as_pending() {
        let gateway = SimulatedGateway::new();

        let ack = gateway.get_acknowledgment("unknown-id").await.unwrap();
        assert_eq!(ack.status, AcknowledgmentStatus::Pending);
        assert_eq!(
            gateway.get_status("unknown-id").await.unwrap(),
            SubmissionStatus::Pending
        );
    }

    #[tokio::test]
    async fn rejecting_gateway_hands_back_the_configured_errors() {
        let errors = vec![AckError {
            code: "IND-181-01".to_string(),
            category: ErrorCategory::Reject,
            message: "Identity protection PIN missing".to_string(),
            field: None,
        }];
        let gateway = SimulatedGateway::rejecting(errors);
        let submission = submission();

        gateway.transmit(&submission).await.unwrap();
        let ack = gateway
            .get_acknowledgment(&submission.submission_id)
            .await
            .unwrap();

        assert_eq!(ack.status, AcknowledgmentStatus::Rejected);
        assert_eq!(ack.dcn, None);
        assert_eq!(ack.errors[0].code, "IND-181-01");
        assert_eq!(
            gateway.get_status(&submission.submission_id).await.unwrap(),
            SubmissionStatus::Rejected
        );
    }
}
