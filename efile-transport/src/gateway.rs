//! The seam between the submission pipeline and the wire.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use efile_core::model::{Acknowledgment, Submission, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Result of a successful hand-off to the gateway. A receipt id confirms
/// the transmission was recorded; the filing decision itself arrives later
/// through `get_acknowledgment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmitOutcome {
    pub submission_id: String,
    pub receipt_id: Option<String>,
    pub transmitted_at: DateTime<Utc>,
}

/// Implemented by the SOAP client and by the simulated gateway, so the
/// pipeline and the acceptance harness can drive either interchangeably.
#[async_trait]
pub trait MefGateway: Send + Sync {
    /// Sends one encoded submission. `Ok` means the gateway took custody of
    /// it, not that the return was accepted.
    async fn transmit(&self, submission: &Submission)
        -> Result<TransmitOutcome, TransportError>;

    /// Fetches the acknowledgment for a previously transmitted submission.
    async fn get_acknowledgment(
        &self,
        submission_id: &str,
    ) -> Result<Acknowledgment, TransportError>;

    /// Asks the gateway where a submission currently stands.
    async fn get_status(&self, submission_id: &str)
        -> Result<SubmissionStatus, TransportError>;
}
