//! Transmitter configuration drawn from the process environment.
//!
//! The test and production gateways use disjoint variable sets for
//! certificate material (`IRS_TEST_*` vs `IRS_PROD_*`); a config built for
//! one environment never reads the other's paths.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("IRS_ENVIRONMENT must be \"test\" or \"production\", got \"{0}\"")]
    InvalidEnvironment(String),

    #[error("IRS_EFIN must be exactly six digits, got \"{0}\"")]
    InvalidEfin(String),

    #[error("IRS_TIMEOUT_SECS must be a positive integer, got \"{0}\"")]
    InvalidTimeout(String),

    #[error("{present} is set but {missing} is not")]
    IncompleteCertificatePair {
        present: &'static str,
        missing: &'static str,
    },
}

/// Which MeF gateway the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Test,
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "test" => Some(Environment::Test),
            "production" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }

    /// Value carried in the `TestIndicator` element of every MeF header.
    pub fn test_indicator(&self) -> &'static str {
        match self {
            Environment::Test => "T",
            Environment::Production => "P",
        }
    }

    fn cert_var(&self) -> &'static str {
        match self {
            Environment::Test => "IRS_TEST_CERT_PATH",
            Environment::Production => "IRS_PROD_CERT_PATH",
        }
    }

    fn key_var(&self) -> &'static str {
        match self {
            Environment::Test => "IRS_TEST_KEY_PATH",
            Environment::Production => "IRS_PROD_KEY_PATH",
        }
    }

    fn ca_var(&self) -> &'static str {
        match self {
            Environment::Test => "IRS_TEST_CA_PATH",
            Environment::Production => "IRS_PROD_CA_PATH",
        }
    }
}

/// Paths to the transmitter's mutual-TLS material. Certificate and key are
/// unencrypted PEM; the CA bundle is optional and, when present, is added
/// to the client's root store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub ca_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub environment: Environment,
    pub efin: String,
    pub software_id: String,
    pub timeout: Duration,
    pub certificates: Option<ClientCertificate>,
}

impl TransportConfig {
    /// Reads the `IRS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. `IRS_EFIN` and
    /// `IRS_SOFTWARE_ID` are required; everything else has a default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("IRS_ENVIRONMENT") {
            Some(value) => {
                Environment::parse(&value).ok_or(ConfigError::InvalidEnvironment(value))?
            }
            None => Environment::Test,
        };

        let efin = lookup("IRS_EFIN").ok_or(ConfigError::MissingVar("IRS_EFIN"))?;
        if efin.len() != 6 || !efin.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEfin(efin));
        }

        let software_id = lookup("IRS_SOFTWARE_ID")
            .ok_or(ConfigError::MissingVar("IRS_SOFTWARE_ID"))?;

        let timeout = match lookup("IRS_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let certificates = Self::certificates(environment, &lookup)?;

        Ok(TransportConfig {
            environment,
            efin,
            software_id,
            timeout,
            certificates,
        })
    }

    fn certificates(
        environment: Environment,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Option<ClientCertificate>, ConfigError> {
        let cert_var = environment.cert_var();
        let key_var = environment.key_var();
        let cert = lookup(cert_var);
        let key = lookup(key_var);

        match (cert, key) {
            (Some(cert), Some(key)) => Ok(Some(ClientCertificate {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
                ca_path: lookup(environment.ca_var()).map(PathBuf::from),
            })),
            (Some(_), None) => Err(ConfigError::IncompleteCertificatePair {
                present: cert_var,
                missing: key_var,
            }),
            (None, Some(_)) => Err(ConfigError::IncompleteCertificatePair {
                present: key_var,
                missing: cert_var,
            }),
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn minimal_config_defaults_to_test_and_sixty_seconds() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_EFIN", "358459"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.efin, "358459");
        assert_eq!(config.software_id, "EFRS2024");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.certificates, None);
    }

    #[test]
    fn production_config_reads_only_the_prod_certificate_set() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_ENVIRONMENT", "production"),
            ("IRS_EFIN", "358459"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
            ("IRS_PROD_CERT_PATH", "/etc/mef/prod-cert.pem"),
            ("IRS_PROD_KEY_PATH", "/etc/mef/prod-key.pem"),
            // Stale test-side paths must not leak into a production config.
            ("IRS_TEST_CERT_PATH", "/etc/mef/test-cert.pem"),
            ("IRS_TEST_KEY_PATH", "/etc/mef/test-key.pem"),
            ("IRS_TEST_CA_PATH", "/etc/mef/test-ca.pem"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        let certs = config.certificates.unwrap();
        assert_eq!(certs.cert_path, PathBuf::from("/etc/mef/prod-cert.pem"));
        assert_eq!(certs.key_path, PathBuf::from("/etc/mef/prod-key.pem"));
        assert_eq!(certs.ca_path, None);
    }

    #[test]
    fn test_certificate_trio_is_picked_up() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_EFIN", "358459"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
            ("IRS_TEST_CERT_PATH", "certs/test-cert.pem"),
            ("IRS_TEST_KEY_PATH", "certs/test-key.pem"),
            ("IRS_TEST_CA_PATH", "certs/test-ca.pem"),
        ]))
        .unwrap();

        let certs = config.certificates.unwrap();
        assert_eq!(certs.ca_path, Some(PathBuf::from("certs/test-ca.pem")));
    }

    #[test]
    fn missing_efin_is_reported_by_name() {
        let err = TransportConfig::from_lookup(lookup_from(&[("IRS_SOFTWARE_ID", "EFRS2024")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("IRS_EFIN"));
    }

    #[test]
    fn malformed_efin_is_rejected() {
        let err = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_EFIN", "35845"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidEfin("35845".to_string()));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_ENVIRONMENT", "staging"),
            ("IRS_EFIN", "358459"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidEnvironment("staging".to_string()));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_EFIN", "358459"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
            ("IRS_TIMEOUT_SECS", "platinum"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("platinum".to_string()));
    }

    #[test]
    fn certificate_without_key_is_an_error() {
        let err = TransportConfig::from_lookup(lookup_from(&[
            ("IRS_EFIN", "358459"),
            ("IRS_SOFTWARE_ID", "EFRS2024"),
            ("IRS_TEST_CERT_PATH", "certs/test-cert.pem"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::IncompleteCertificatePair {
                present: "IRS_TEST_CERT_PATH",
                missing: "IRS_TEST_KEY_PATH",
            }
        );
    }
}
