//! AWS Signature Version 4 request signing.
//!
//! PA-API v5 authenticates every call with SigV4. The algorithm is a fixed
//! pipeline of pure functions:
//!
//! 1. canonical headers + signed header list
//! 2. canonical request
//! 3. string to sign
//! 4. signing key (four-stage HMAC chain)
//! 5. signature and `Authorization` header value
//!
//! Each step is exposed so it can be tested on its own.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::credentials::{ExposeSecret, SigningCredential};
use crate::error::SigningError;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm identifier used in the string to sign and the header value.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

const KEY_PREFIX: &str = "AWS4";
const SCOPE_TERMINATOR: &str = "aws4_request";

/// Timestamp a single request is signed at.
///
/// Second precision, UTC. Built fresh for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext {
    timestamp: DateTime<Utc>,
}

impl SigningContext {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Fix the signing time. Sub-second precision is dropped.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(0),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// ISO 8601 basic format, e.g. `20251026T152035Z`.
    pub fn amz_date(&self) -> String {
        self.timestamp.format("%Y%m%dT%H%M%SZ").to_string()
    }

    /// Day component of the scope, e.g. `20251026`.
    pub fn date_stamp(&self) -> String {
        self.timestamp.format("%Y%m%d").to_string()
    }
}

/// The parts of an HTTP request covered by the signature.
///
/// Header names are stored lowercased in an ordered map, so the canonical
/// header block and the signed header list always share one ordering.
/// Setting the same header twice (in any case) keeps the last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    method: String,
    path: String,
    query: String,
    headers: BTreeMap<String, String>,
    payload: Vec<u8>,
}

impl SignableRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: String::new(),
            headers: BTreeMap::new(),
            payload: Vec::new(),
        }
    }

    /// Set the query string. Must already be percent-encoded; it is signed verbatim.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the exact bytes that will be transmitted.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume the request, returning its headers and payload for transmission.
    pub fn into_parts(self) -> (BTreeMap<String, String>, Vec<u8>) {
        (self.headers, self.payload)
    }
}

/// Output of [`sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Value for the `Authorization` header.
    pub authorization: String,
    /// Lowercased header names covered by the signature, in canonical order.
    pub signed_headers: Vec<String>,
}

/// Canonical header block and semicolon-joined signed header list.
pub fn canonical_headers(headers: &BTreeMap<String, String>) -> (String, String) {
    let mut block = String::new();
    for (name, value) in headers {
        block.push_str(name);
        block.push(':');
        block.push_str(value.trim());
        block.push('\n');
    }
    let signed = headers.keys().map(String::as_str).collect::<Vec<_>>().join(";");
    (block, signed)
}

pub fn canonical_request(request: &SignableRequest) -> String {
    let (headers, signed) = canonical_headers(&request.headers);
    [
        request.method.to_ascii_uppercase().as_str(),
        request.path.as_str(),
        request.query.as_str(),
        headers.as_str(),
        signed.as_str(),
        sha256_hex(&request.payload).as_str(),
    ]
    .join("\n")
}

/// `date/region/service/aws4_request`
pub fn credential_scope(credential: &SigningCredential, context: &SigningContext) -> String {
    format!(
        "{}/{}/{}/{}",
        context.date_stamp(),
        credential.region,
        credential.service,
        SCOPE_TERMINATOR
    )
}

pub fn string_to_sign(context: &SigningContext, scope: &str, canonical_request: &str) -> String {
    [
        ALGORITHM,
        context.amz_date().as_str(),
        scope,
        sha256_hex(canonical_request.as_bytes()).as_str(),
    ]
    .join("\n")
}

/// Derive the signing key: `HMAC("AWS4"+secret, date) → region → service → "aws4_request"`.
pub fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("{}{}", KEY_PREFIX, secret).as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, SCOPE_TERMINATOR.as_bytes())
}

/// Sign a request.
///
/// Fails with [`SigningError::MissingCredential`] when any credential field is
/// blank.
pub fn sign(
    credential: &SigningCredential,
    context: &SigningContext,
    request: &SignableRequest,
) -> Result<SignedRequest, SigningError> {
    credential.ensure_complete()?;

    let canonical = canonical_request(request);
    let scope = credential_scope(credential, context);
    let to_sign = string_to_sign(context, &scope, &canonical);

    let key = signing_key(
        credential.secret_key.expose_secret(),
        &context.date_stamp(),
        &credential.region,
        &credential.service,
    );
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes()));

    let signed_headers: Vec<String> = request.headers.keys().cloned().collect();
    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM,
        credential.access_key_id,
        scope,
        signed_headers.join(";"),
        signature
    );

    tracing::trace!(
        scope = %scope,
        signed_headers = %signed_headers.join(";"),
        "Signed request"
    );

    Ok(SignedRequest {
        authorization,
        signed_headers,
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn example_credential() -> SigningCredential {
        SigningCredential::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "us-east-1",
            "example.amazonaws.com",
        )
        .with_service("service")
    }

    fn example_context() -> SigningContext {
        SigningContext::at(Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap())
    }

    fn vanilla_request() -> SignableRequest {
        SignableRequest::new("GET", "/")
            .with_header("Host", "example.amazonaws.com")
            .with_header("X-Amz-Date", "20150830T123600Z")
    }

    fn paapi_request(payload: &str) -> SignableRequest {
        SignableRequest::new("POST", "/paapi5/searchitems")
            .with_header("content-encoding", "amz-1.0")
            .with_header("content-type", "application/json; charset=UTF-8")
            .with_header("host", "webservices.amazon.co.uk")
            .with_header("x-amz-date", "20251026T152035Z")
            .with_payload(payload.as_bytes().to_vec())
    }

    #[test]
    fn test_context_formats() {
        let ctx = SigningContext::at(
            Utc.with_ymd_and_hms(2025, 10, 26, 15, 20, 35).unwrap()
                + chrono::Duration::milliseconds(731),
        );
        assert_eq!(ctx.amz_date(), "20251026T152035Z");
        assert_eq!(ctx.date_stamp(), "20251026");
    }

    #[test]
    fn test_empty_payload_hash() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_vanilla_canonical_request() {
        let canonical = canonical_request(&vanilla_request());
        assert_eq!(
            canonical,
            "GET\n/\n\nhost:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_vanilla_signature() {
        let signed = sign(&example_credential(), &example_context(), &vanilla_request()).unwrap();
        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
        assert_eq!(signed.signed_headers, vec!["host", "x-amz-date"]);
    }

    #[test]
    fn test_signing_key_chain() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let cred = example_credential();
        let ctx = example_context();
        let request = paapi_request(r#"{"Keywords":"golf"}"#);

        let first = sign(&cred, &ctx, &request).unwrap();
        let second = sign(&cred, &ctx, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_payload_change_changes_signature() {
        let cred = example_credential();
        let ctx = example_context();

        let a = sign(&cred, &ctx, &paapi_request(r#"{"Keywords":"golf"}"#)).unwrap();
        let b = sign(&cred, &ctx, &paapi_request(r#"{"Keywords":"gold"}"#)).unwrap();
        assert_ne!(a.authorization, b.authorization);
        assert_eq!(a.signed_headers, b.signed_headers);
    }

    #[test]
    fn test_header_order_independent() {
        let forward = SignableRequest::new("post", "/paapi5/searchitems")
            .with_header("Content-Type", "application/json; charset=UTF-8")
            .with_header("Host", "webservices.amazon.co.uk")
            .with_header("X-Amz-Date", "20251026T152035Z");
        let reversed = SignableRequest::new("POST", "/paapi5/searchitems")
            .with_header("x-amz-date", "20251026T152035Z")
            .with_header("host", "  webservices.amazon.co.uk ")
            .with_header("content-type", "application/json; charset=UTF-8");

        assert_eq!(canonical_headers(forward.headers()), canonical_headers(reversed.headers()));
        assert_eq!(canonical_request(&forward), canonical_request(&reversed));

        let (block, signed) = canonical_headers(forward.headers());
        assert_eq!(signed, "content-type;host;x-amz-date");
        assert!(block.starts_with("content-type:"));
    }

    #[test]
    fn test_query_signed_verbatim() {
        let request = vanilla_request().with_query("Param1=value%201&Param2=b");
        let canonical = canonical_request(&request);
        assert_eq!(canonical.lines().nth(2), Some("Param1=value%201&Param2=b"));
    }

    #[test]
    fn test_missing_credential_fails_fast() {
        let cred = SigningCredential::new("", "", "eu-west-1", "webservices.amazon.co.uk");
        let result = sign(&cred, &example_context(), &vanilla_request());
        assert!(matches!(result, Err(SigningError::MissingCredential(_))));
    }

    #[test]
    fn test_string_to_sign_layout() {
        let cred = example_credential();
        let ctx = example_context();
        let scope = credential_scope(&cred, &ctx);
        assert_eq!(scope, "20150830/us-east-1/service/aws4_request");

        let to_sign = string_to_sign(&ctx, &scope, "canonical");
        let lines: Vec<_> = to_sign.lines().collect();
        assert_eq!(lines[0], ALGORITHM);
        assert_eq!(lines[1], "20150830T123600Z");
        assert_eq!(lines[2], scope);
        assert_eq!(lines[3], sha256_hex(b"canonical"));
    }
}
