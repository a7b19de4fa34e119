//! The live SOAP client for the A2A gateway.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use efile_core::model::{Acknowledgment, Submission, SubmissionStatus};
use reqwest::{Certificate, Identity};

use crate::config::{ClientCertificate, TransportConfig};
use crate::endpoints::{self, ServiceEndpoints};
use crate::envelope;
use crate::error::TransportError;
use crate::gateway::{MefGateway, TransmitOutcome};
use crate::response;
use crate::retry::with_retries;

/// HTTPS client for the gateway. Certificate material is read once at
/// construction and every call carries the mutual-TLS identity from then
/// on. A CA path in the config adds a trusted root; verification itself is
/// never relaxed.
///
/// Dropping a call's future before polling it sends nothing. Once a
/// request is in flight the outcome of an abandoned call is unknown;
/// `get_status` is the way to reconcile.
#[derive(Debug)]
pub struct MefClient {
    http: reqwest::Client,
    config: TransportConfig,
    endpoints: ServiceEndpoints,
}

impl MefClient {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout);

        if let Some(certificates) = &config.certificates {
            builder = builder.identity(load_identity(certificates)?);
            if let Some(ca_path) = &certificates.ca_path {
                let pem = read_pem(ca_path)?;
                let root = Certificate::from_pem(&pem)
                    .map_err(|e| TransportError::Identity(e.to_string()))?;
                builder = builder.add_root_certificate(root);
            }
        }

        let http = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        let endpoints = endpoints::for_environment(config.environment);

        Ok(MefClient {
            http,
            config,
            endpoints,
        })
    }

    async fn post(
        &self,
        endpoint: &str,
        action: &str,
        body: String,
    ) -> Result<String, TransportError> {
        let response = self
            .http
            .post(endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .body(body)
            .send()
            .await
            .map_err(|e| classify_send_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| classify_send_error(endpoint, e))
    }
}

#[async_trait]
impl MefGateway for MefClient {
    async fn transmit(
        &self,
        submission: &Submission,
    ) -> Result<TransmitOutcome, TransportError> {
        let endpoint = self.endpoints.transmit;
        tracing::info!(
            submission_id = %submission.submission_id,
            environment = self.config.environment.as_str(),
            "transmitting return"
        );

        let body = with_retries(endpoint, || {
            let envelope = envelope::transmit_envelope(&self.config, submission, Utc::now());
            self.post(endpoint, envelope::SOAP_ACTION_TRANSMIT, envelope)
        })
        .await?;

        let outcome = response::parse_transmit_response(&body, &submission.submission_id)?;
        tracing::info!(
            submission_id = %outcome.submission_id,
            receipt_id = outcome.receipt_id.as_deref().unwrap_or("none"),
            "gateway took custody of submission"
        );
        Ok(outcome)
    }

    async fn get_acknowledgment(
        &self,
        submission_id: &str,
    ) -> Result<Acknowledgment, TransportError> {
        let endpoint = self.endpoints.acknowledgment;
        tracing::debug!(submission_id, "fetching acknowledgment");

        let body = with_retries(endpoint, || {
            let envelope = envelope::acknowledgment_envelope(&self.config, submission_id, Utc::now());
            self.post(endpoint, envelope::SOAP_ACTION_ACKNOWLEDGMENT, envelope)
        })
        .await?;

        response::parse_acknowledgment_response(&body, submission_id)
    }

    async fn get_status(&self, submission_id: &str) -> Result<SubmissionStatus, TransportError> {
        let endpoint = self.endpoints.status;
        tracing::debug!(submission_id, "fetching submission status");

        let body = with_retries(endpoint, || {
            let envelope = envelope::status_envelope(&self.config, submission_id, Utc::now());
            self.post(endpoint, envelope::SOAP_ACTION_STATUS, envelope)
        })
        .await?;

        response::parse_status_response(&body)
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TransportError> {
    fs::read(path).map_err(|source| TransportError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Concatenates certificate and key PEM blocks into one identity buffer.
fn load_identity(certificates: &ClientCertificate) -> Result<Identity, TransportError> {
    let mut pem = read_pem(&certificates.cert_path)?;
    pem.push(b'\n');
    pem.extend_from_slice(&read_pem(&certificates.key_path)?);
    Identity::from_pem(&pem).map_err(|e| TransportError::Identity(e.to_string()))
}

fn classify_send_error(endpoint: &str, err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        TransportError::Unreachable {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}
