//! Signing credentials.
//!
//! The secret access key is held in a [`SecretString`] so it stays out of
//! logs and error messages. It is only exposed when deriving the signing key.

pub use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::error::SigningError;

/// Credential and scope used to sign PA-API requests.
///
/// Built once by the configuration loader and passed into the signer; the
/// signer never reads the environment itself.
#[derive(Clone)]
pub struct SigningCredential {
    pub access_key_id: String,
    pub secret_key: SecretString,
    pub region: String,
    pub service: String,
    pub host: String,
}

impl SigningCredential {
    /// Service name PA-API expects in the credential scope.
    pub const PAAPI_SERVICE: &'static str = "ProductAdvertisingAPI";

    pub fn new(
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: SecretString::from(secret_key.into()),
            region: region.into(),
            service: Self::PAAPI_SERVICE.to_string(),
            host: host.into(),
        }
    }

    /// Override the service name in the scope.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Fail fast when any field is blank. Reports every missing field at once.
    pub fn ensure_complete(&self) -> Result<(), SigningError> {
        let mut missing = Vec::new();
        if self.access_key_id.trim().is_empty() {
            missing.push("access_key_id");
        }
        if self.secret_key.expose_secret().trim().is_empty() {
            missing.push("secret_key");
        }
        if self.region.trim().is_empty() {
            missing.push("region");
        }
        if self.service.trim().is_empty() {
            missing.push("service");
        }
        if self.host.trim().is_empty() {
            missing.push("host");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SigningError::MissingCredential(missing.join(", ")))
        }
    }
}

impl fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredential")
            .field("access_key_id", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("host", &self.host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let cred = SigningCredential::new("AKIDEXAMPLE", "wJalrXUtnFEMI-super-secret", "eu-west-1", "webservices.amazon.co.uk");
        let debug = format!("{:?}", cred.secret_key);
        assert!(!debug.contains("wJalr"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_debug_hides_keys() {
        let cred = SigningCredential::new("AKIDEXAMPLE", "secret-key", "eu-west-1", "webservices.amazon.co.uk");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("eu-west-1"));
    }

    #[test]
    fn test_complete_credential_passes() {
        let cred = SigningCredential::new("AKID", "secret", "eu-west-1", "webservices.amazon.co.uk");
        assert!(cred.ensure_complete().is_ok());
        assert_eq!(cred.service, "ProductAdvertisingAPI");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let cred = SigningCredential::new("", "  ", "eu-west-1", "webservices.amazon.co.uk");
        let err = cred.ensure_complete().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("access_key_id"));
        assert!(message.contains("secret_key"));
        assert!(!message.contains("region"));
    }
}
