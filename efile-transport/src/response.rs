//! Interpretation of gateway SOAP replies.
//!
//! The reply vocabulary is small and flat, so the interesting elements are
//! pulled with regexes rather than a full XML parse, the same approach the
//! structural checks take on the outbound side.

use std::sync::LazyLock;

use chrono::Utc;
use efile_core::model::{
    AckError, Acknowledgment, AcknowledgmentStatus, ErrorCategory, SubmissionStatus,
};
use regex::Regex;

use crate::error::TransportError;
use crate::gateway::TransmitOutcome;

static RECEIPT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<mef:ReceiptId>([^<]+)</mef:ReceiptId>").unwrap());
static STATUS_TXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<mef:StatusTxt>([^<]+)</mef:StatusTxt>").unwrap());
static SOAP_FAULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<soap:Fault>.*?<faultstring>([^<]+)</faultstring>").unwrap()
});
static ACCEPTANCE_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<mef:AcceptanceStatusTxt>([^<]+)</mef:AcceptanceStatusTxt>").unwrap()
});
static DCN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<mef:DCN>([^<]+)</mef:DCN>").unwrap());
static ACK_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)<mef:Error>.*?<mef:ErrorCd>([^<]+)</mef:ErrorCd>",
        r".*?<mef:ErrorCategoryTxt>([^<]+)</mef:ErrorCategoryTxt>",
        r".*?<mef:ErrorMessageTxt>([^<]+)</mef:ErrorMessageTxt>.*?</mef:Error>"
    ))
    .unwrap()
});

fn fault_text(body: &str) -> Option<String> {
    SOAP_FAULT
        .captures(body)
        .map(|captures| captures[1].trim().to_string())
}

/// Reads the `TransmitReturn` reply. A SOAP fault or an explicit
/// rejected/error status text is a refusal; anything else means the gateway
/// has taken custody of the submission.
pub fn parse_transmit_response(
    body: &str,
    submission_id: &str,
) -> Result<TransmitOutcome, TransportError> {
    if let Some(fault) = fault_text(body) {
        return Err(TransportError::Fault(fault));
    }

    if let Some(captures) = STATUS_TXT.captures(body) {
        let status = captures[1].trim().to_lowercase();
        if status == "rejected" || status == "error" {
            return Err(TransportError::TransmitRefused(status));
        }
    }

    Ok(TransmitOutcome {
        submission_id: submission_id.to_string(),
        receipt_id: RECEIPT_ID
            .captures(body)
            .map(|captures| captures[1].trim().to_string()),
        transmitted_at: Utc::now(),
    })
}

/// Reads the `GetAcknowledgement` reply into an [`Acknowledgment`].
///
/// Error blocks are collected in document order; a reply without an
/// `AcceptanceStatusTxt` element is malformed rather than implicitly
/// rejected.
pub fn parse_acknowledgment_response(
    body: &str,
    submission_id: &str,
) -> Result<Acknowledgment, TransportError> {
    if let Some(fault) = fault_text(body) {
        return Err(TransportError::Fault(fault));
    }

    let Some(captures) = ACCEPTANCE_STATUS.captures(body) else {
        return Err(TransportError::MalformedResponse(
            "acknowledgment reply has no AcceptanceStatusTxt".to_string(),
        ));
    };
    let status = match captures[1].trim().to_lowercase().as_str() {
        "accepted" => AcknowledgmentStatus::Accepted,
        "rejected" => AcknowledgmentStatus::Rejected,
        _ => AcknowledgmentStatus::Pending,
    };

    let errors = ACK_ERROR
        .captures_iter(body)
        .map(|captures| AckError {
            code: captures[1].trim().to_string(),
            category: ErrorCategory::parse(captures[2].trim()),
            message: captures[3].trim().to_string(),
            field: None,
        })
        .collect();

    Ok(Acknowledgment {
        submission_id: submission_id.to_string(),
        status,
        dcn: DCN
            .captures(body)
            .map(|captures| captures[1].trim().to_string()),
        errors,
        received_at: Utc::now(),
    })
}

/// Reads the `GetSubmissionStatus` reply. Status text the gateway has not
/// defined reads as still pending.
pub fn parse_status_response(body: &str) -> Result<SubmissionStatus, TransportError> {
    if let Some(fault) = fault_text(body) {
        return Err(TransportError::Fault(fault));
    }

    let status = match STATUS_TXT.captures(body) {
        Some(captures) => match captures[1].trim().to_lowercase().as_str() {
            "accepted" => SubmissionStatus::Accepted,
            "rejected" => SubmissionStatus::Rejected,
            "error" => SubmissionStatus::Error,
            _ => SubmissionStatus::Pending,
        },
        None => SubmissionStatus::Pending,
    };
    Ok(status)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SUBMISSION_ID: &str = "35845920250460a1b2c3";

    fn transmit_reply(inner: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"><soap:Body><mef:TransmitResponse>{inner}</mef:TransmitResponse></soap:Body></soap:Envelope>"
        )
    }

    #[test]
    fn transmit_reply_with_receipt_is_an_outcome() {
        let body = transmit_reply(
            "<mef:StatusTxt>Received</mef:StatusTxt><mef:ReceiptId>RCPT-0042</mef:ReceiptId>",
        );
        let outcome = parse_transmit_response(&body, SUBMISSION_ID).unwrap();
        assert_eq!(outcome.submission_id, SUBMISSION_ID);
        assert_eq!(outcome.receipt_id, Some("RCPT-0042".to_string()));
    }

    #[test]
    fn transmit_reply_without_receipt_still_succeeds() {
        let body = transmit_reply("<mef:StatusTxt>Received</mef:StatusTxt>");
        let outcome = parse_transmit_response(&body, SUBMISSION_ID).unwrap();
        assert_eq!(outcome.receipt_id, None);
    }

    #[test]
    fn rejected_status_text_is_a_refusal() {
        let body = transmit_reply("<mef:StatusTxt>Rejected</mef:StatusTxt>");
        let err = parse_transmit_response(&body, SUBMISSION_ID).unwrap_err();
        assert!(matches!(err, TransportError::TransmitRefused(status) if status == "rejected"));
    }

    #[test]
    fn soap_fault_wins_over_everything_else() {
        let body = "<soap:Envelope><soap:Body><soap:Fault><faultcode>soap:Server</faultcode><faultstring>Internal processing error</faultstring></soap:Fault></soap:Body></soap:Envelope>";
        let err = parse_transmit_response(body, SUBMISSION_ID).unwrap_err();
        assert!(matches!(err, TransportError::Fault(text) if text == "Internal processing error"));
    }

    #[test]
    fn accepted_acknowledgment_carries_the_dcn() {
        let body = format!(
            "<mef:GetAcknowledgementResponse><mef:AcceptanceStatusTxt>Accepted</mef:AcceptanceStatusTxt><mef:DCN>00123456789012</mef:DCN><mef:SubmissionId>{SUBMISSION_ID}</mef:SubmissionId></mef:GetAcknowledgementResponse>"
        );
        let ack = parse_acknowledgment_response(&body, SUBMISSION_ID).unwrap();
        assert_eq!(ack.status, AcknowledgmentStatus::Accepted);
        assert_eq!(ack.dcn, Some("00123456789012".to_string()));
        assert_eq!(ack.errors, vec![]);
    }

    #[test]
    fn rejected_acknowledgment_collects_error_blocks_in_order() {
        let body = "<mef:GetAcknowledgementResponse>\
             <mef:AcceptanceStatusTxt>Rejected</mef:AcceptanceStatusTxt>\
             <mef:ErrorList>\
               <mef:Error>\
                 <mef:ErrorCd>IND-031-04</mef:ErrorCd>\
                 <mef:ErrorCategoryTxt>Reject</mef:ErrorCategoryTxt>\
                 <mef:ErrorMessageTxt>Prior year AGI does not match</mef:ErrorMessageTxt>\
               </mef:Error>\
               <mef:Error>\
                 <mef:ErrorCd>R0000-504-02</mef:ErrorCd>\
                 <mef:ErrorCategoryTxt>Alert</mef:ErrorCategoryTxt>\
                 <mef:ErrorMessageTxt>Dependent name control mismatch</mef:ErrorMessageTxt>\
               </mef:Error>\
             </mef:ErrorList>\
           </mef:GetAcknowledgementResponse>";
        let ack = parse_acknowledgment_response(body, SUBMISSION_ID).unwrap();

        assert_eq!(ack.status, AcknowledgmentStatus::Rejected);
        assert_eq!(ack.dcn, None);
        assert_eq!(ack.errors.len(), 2);
        assert_eq!(ack.errors[0].code, "IND-031-04");
        assert_eq!(ack.errors[0].category, ErrorCategory::Reject);
        assert_eq!(ack.errors[0].message, "Prior year AGI does not match");
        assert_eq!(ack.errors[1].code, "R0000-504-02");
        assert_eq!(ack.errors[1].category, ErrorCategory::Alert);
    }

    #[test]
    fn acknowledgment_without_status_text_is_malformed() {
        let body = "<mef:GetAcknowledgementResponse></mef:GetAcknowledgementResponse>";
        let err = parse_acknowledgment_response(body, SUBMISSION_ID).unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse(_)));
    }

    #[test]
    fn in_process_acknowledgment_reads_as_pending() {
        let body = "<mef:AcceptanceStatusTxt>In Process</mef:AcceptanceStatusTxt>";
        let ack = parse_acknowledgment_response(body, SUBMISSION_ID).unwrap();
        assert_eq!(ack.status, AcknowledgmentStatus::Pending);
    }

    #[test]
    fn status_text_maps_onto_the_submission_states() {
        for (text, expected) in [
            ("Accepted", SubmissionStatus::Accepted),
            ("Rejected", SubmissionStatus::Rejected),
            ("Error", SubmissionStatus::Error),
            ("Processing", SubmissionStatus::Pending),
        ] {
            let body = format!("<mef:StatusTxt>{text}</mef:StatusTxt>");
            assert_eq!(parse_status_response(&body).unwrap(), expected);
        }
        assert_eq!(
            parse_status_response("<mef:GetSubmissionStatusResponse/>").unwrap(),
            SubmissionStatus::Pending
        );
    }
}
