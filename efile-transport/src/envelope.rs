//! SOAP envelope construction for the three A2A calls.
//!
//! Envelope shape, namespaces, and the `MeFHeader` block follow the MeF
//! state-and-trading-partner toolkit conventions. The return document rides
//! as a base64 binary attachment referenced by `ContentLocation`.

use chrono::{DateTime, SecondsFormat, Utc};
use efile_core::model::Submission;

use crate::config::TransportConfig;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const TRANSMITTER_SERVICE_NS: &str = "http://www.irs.gov/a2a/mef/MeFTransmitterService.xsd";
const ACKNOWLEDGEMENT_SERVICE_NS: &str = "http://www.irs.gov/a2a/mef/MeFAcknowledgementService.xsd";
const STATUS_SERVICE_NS: &str = "http://www.irs.gov/a2a/mef/MeFStatusService.xsd";

/// `SOAPAction` header values. The gateway spells acknowledgement the
/// British way; these strings must match it byte for byte.
pub const SOAP_ACTION_TRANSMIT: &str = "TransmitReturn";
pub const SOAP_ACTION_ACKNOWLEDGMENT: &str = "GetAcknowledgement";
pub const SOAP_ACTION_STATUS: &str = "GetSubmissionStatus";

fn iso_millis(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn mef_header(config: &TransportConfig, timestamp: DateTime<Utc>) -> String {
    format!(
        r#"    <mef:MeFHeader>
      <mef:EFIN>{efin}</mef:EFIN>
      <mef:SoftwareId>{software_id}</mef:SoftwareId>
      <mef:SessionIndicator>Y</mef:SessionIndicator>
      <mef:TestIndicator>{indicator}</mef:TestIndicator>
      <mef:Timestamp>{timestamp}</mef:Timestamp>
    </mef:MeFHeader>
"#,
        efin = xml_escape(&config.efin),
        software_id = xml_escape(&config.software_id),
        indicator = config.environment.test_indicator(),
        timestamp = iso_millis(timestamp),
    )
}

/// Builds the `TransmitReturn` envelope carrying one submission.
pub fn transmit_envelope(
    config: &TransportConfig,
    submission: &Submission,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="{soap_ns}" xmlns:mef="{service_ns}">
  <soap:Header>
{header}  </soap:Header>
  <soap:Body>
    <mef:TransmitRequest>
      <mef:TransmissionHeader>
        <mef:TransmissionId>{submission_id}</mef:TransmissionId>
        <mef:Timestamp>{timestamp}</mef:Timestamp>
        <mef:TransmissionCount>1</mef:TransmissionCount>
      </mef:TransmissionHeader>
      <mef:ReturnDataList>
        <mef:ReturnData>
          <mef:SubmissionId>{submission_id}</mef:SubmissionId>
          <mef:TaxYear>{tax_year}</mef:TaxYear>
          <mef:ReturnType>1040</mef:ReturnType>
          <mef:ContentLocation>attachment</mef:ContentLocation>
        </mef:ReturnData>
      </mef:ReturnDataList>
      <mef:BinaryAttachmentList>
        <mef:BinaryAttachment>
          <mef:ContentId>attachment</mef:ContentId>
          <mef:ContentType>application/xml</mef:ContentType>
          <mef:BinaryContent>{content}</mef:BinaryContent>
        </mef:BinaryAttachment>
      </mef:BinaryAttachmentList>
    </mef:TransmitRequest>
  </soap:Body>
</soap:Envelope>"#,
        soap_ns = SOAP_ENVELOPE_NS,
        service_ns = TRANSMITTER_SERVICE_NS,
        header = mef_header(config, timestamp),
        submission_id = submission.submission_id,
        tax_year = submission.tax_year,
        timestamp = iso_millis(timestamp),
        content = base64_encode(submission.xml_payload.as_bytes()),
    )
}

/// Builds the `GetAcknowledgement` envelope for one submission id.
pub fn acknowledgment_envelope(
    config: &TransportConfig,
    submission_id: &str,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="{soap_ns}" xmlns:mef="{service_ns}">
  <soap:Header>
{header}  </soap:Header>
  <soap:Body>
    <mef:GetAcknowledgementRequest>
      <mef:SubmissionId>{submission_id}</mef:SubmissionId>
    </mef:GetAcknowledgementRequest>
  </soap:Body>
</soap:Envelope>"#,
        soap_ns = SOAP_ENVELOPE_NS,
        service_ns = ACKNOWLEDGEMENT_SERVICE_NS,
        header = mef_header(config, timestamp),
        submission_id = xml_escape(submission_id),
    )
}

/// Builds the `GetSubmissionStatus` envelope for one submission id.
pub fn status_envelope(
    config: &TransportConfig,
    submission_id: &str,
    timestamp: DateTime<Utc>,
) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="{soap_ns}" xmlns:mef="{service_ns}">
  <soap:Header>
{header}  </soap:Header>
  <soap:Body>
    <mef:GetSubmissionStatusRequest>
      <mef:SubmissionId>{submission_id}</mef:SubmissionId>
    </mef:GetSubmissionStatusRequest>
  </soap:Body>
</soap:Envelope>"#,
        soap_ns = SOAP_ENVELOPE_NS,
        service_ns = STATUS_SERVICE_NS,
        header = mef_header(config, timestamp),
        submission_id = xml_escape(submission_id),
    )
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Standard base64 with `=` padding.
pub fn base64_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = u32::from(chunk.get(1).copied().unwrap_or(0));
        let b2 = u32::from(chunk.get(2).copied().unwrap_or(0));
        let triple = (b0 << 16) | (b1 << 8) | b2;

        out.push(BASE64_ALPHABET[(triple >> 18) as usize & 0x3f] as char);
        out.push(BASE64_ALPHABET[(triple >> 12) as usize & 0x3f] as char);
        if chunk.len() > 1 {
            out.push(BASE64_ALPHABET[(triple >> 6) as usize & 0x3f] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(BASE64_ALPHABET[triple as usize & 0x3f] as char);
        } else {
            out.push('=');
        }
    }
    out
}
