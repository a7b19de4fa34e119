//! A2A service URLs for the two MeF gateways.

use crate::config::Environment;

/// The three services a transmitter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub transmit: &'static str,
    pub acknowledgment: &'static str,
    pub status: &'static str,
}

const PRODUCTION: ServiceEndpoints = ServiceEndpoints {
    transmit: "https://la.www4.irs.gov/a2a/mef/transmitter/TransmitterService",
    acknowledgment: "https://la.www4.irs.gov/a2a/mef/transmitter/AcknowledgementService",
    status: "https://la.www4.irs.gov/a2a/mef/transmitter/StatusService",
};

const TEST: ServiceEndpoints = ServiceEndpoints {
    transmit: "https://la.www4.irs.gov/a2a/mef/test/transmitter/TransmitterService",
    acknowledgment: "https://la.www4.irs.gov/a2a/mef/test/transmitter/AcknowledgementService",
    status: "https://la.www4.irs.gov/a2a/mef/test/transmitter/StatusService",
};

pub fn for_environment(environment: Environment) -> ServiceEndpoints {
    match environment {
        Environment::Test => TEST,
        Environment::Production => PRODUCTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_lives_under_the_test_path() {
        let endpoints = for_environment(Environment::Test);
        for url in [endpoints.transmit, endpoints.acknowledgment, endpoints.status] {
            assert!(url.starts_with("https://la.www4.irs.gov/a2a/mef/test/transmitter/"));
        }
    }

    #[test]
    fn production_gateway_has_no_test_segment() {
        let endpoints = for_environment(Environment::Production);
        for url in [endpoints.transmit, endpoints.acknowledgment, endpoints.status] {
            assert!(url.starts_with("https://la.www4.irs.gov/a2a/mef/transmitter/"));
            assert!(!url.contains("/test/"));
        }
    }
}
