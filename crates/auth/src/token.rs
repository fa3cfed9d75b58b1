//! Credential codec.
//!
//! A credential is a compact `header.claims.signature` string issued by the
//! login endpoint. Only the claims segment is read here.
//!
//! Signature and expiry are NOT verified: the client trusts whatever the
//! credential-exchange backend returned. Decoding is purely structural, and any
//! malformed input comes back as a [`DecodeError`] rather than a panic.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::string_or_number;
use crate::{AccountType, DEFAULT_DISPLAY_NAME, Identity, Permission};

/// Claims carried in the middle segment of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub email: String,

    pub role: i64,

    #[serde(alias = "accountType")]
    pub account_type: AccountType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    /// Issued-at, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiry, seconds since the epoch. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed credential: expected at least 2 dot-separated segments")]
    MissingClaimsSegment,

    #[error("malformed credential: claims segment is empty")]
    EmptyClaimsSegment,

    #[error("claims segment is not valid base64url: {0}")]
    Base64(String),

    #[error("claims segment is not a valid claims object: {0}")]
    Json(String),

    #[error("claims carry an unknown account type: {0}")]
    InvalidAccountType(String),
}

impl CredentialClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the `exp` claim lies in the past relative to `now`.
    ///
    /// Nothing in the login or resume path rejects expired credentials; this
    /// only feeds diagnostics.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| now >= exp)
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string()),
            email: self.email,
            account_type: self.account_type,
            role: self.role,
            permissions: self.permissions,
        }
    }
}

/// Decode the claims segment of a credential.
pub fn decode_claims(credential: &str) -> Result<CredentialClaims, DecodeError> {
    decode_claims_segment(credential).inspect_err(|e| {
        tracing::debug!(error = %e, "credential decode failed");
    })
}

fn decode_claims_segment(credential: &str) -> Result<CredentialClaims, DecodeError> {
    let mut segments = credential.trim().split('.');
    let _header = segments.next();
    let claims = segments.next().ok_or(DecodeError::MissingClaimsSegment)?;

    // Some issuers pad the segment; base64url in credentials normally does not.
    let claims = claims.trim_end_matches('=');
    if claims.is_empty() {
        return Err(DecodeError::EmptyClaimsSegment);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(claims)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;

    // Checked up front so an out-of-range numeral isn't reported as a JSON shape error.
    if let Some(raw) = value.get("account_type").or_else(|| value.get("accountType")) {
        if AccountType::deserialize(raw).is_err() {
            return Err(DecodeError::InvalidAccountType(raw.to_string()));
        }
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Decode a credential straight into the identity it describes.
pub fn decode_identity(credential: &str) -> Result<Identity, DecodeError> {
    decode_claims(credential).map(CredentialClaims::into_identity)
}

/// Build an unsigned credential (`alg: none`, empty signature) for `claims`.
///
/// Used by the mock credential exchange; real credentials come from the
/// backend.
pub fn encode_unsigned(claims: &CredentialClaims) -> String {
    const HEADER: &str = r#"{"alg":"none","typ":"JWT"}"#;

    // Serializing a plain struct of strings and integers cannot fail.
    let payload = serde_json::to_vec(claims).unwrap_or_default();

    format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    )
}
