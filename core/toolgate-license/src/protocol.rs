//! Wire format of the license validation endpoint.
//!
//! Request (`POST /api/validate-license`):
//! `{"licenseKey": "...", "hardwareHash": "<64 hex chars>"}`
//!
//! Response:
//! `{"valid": bool, "apiCallsLeft": int?, "daysRemaining": int?, "message": string?}`

use crate::device::HardwareFingerprint;
use crate::entitlement::{Entitlement, LicenseKey};
use crate::error::{DEFAULT_REJECTION_MESSAGE, LicenseError, ValidationOutcome};
use serde::{Deserialize, Serialize};

/// Message attached to a granted entitlement when the backend sends none.
const DEFAULT_VALID_MESSAGE: &str = "License valid";

/// Body sent to the validation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// Key exactly as the user entered it.
    pub license_key: LicenseKey,
    /// Fingerprint of the requesting machine.
    pub hardware_hash: HardwareFingerprint,
}

/// Body returned by the validation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Whether the key is accepted. Missing or `null` counts as `false`.
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub api_calls_left: Option<u64>,
    #[serde(default)]
    pub days_remaining: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Turns a raw HTTP reply into a validation outcome.
///
/// A body that does not parse is malformed whatever the status. A parsed
/// body grants an entitlement only if the status is 2xx and `valid` is true;
/// anything else is a rejection carrying the backend's message.
pub fn interpret_response(
    status: u16,
    body: &str,
    hardware_hash: &HardwareFingerprint,
) -> ValidationOutcome {
    let response: ValidationResponse = serde_json::from_str(body)
        .map_err(|e| LicenseError::MalformedResponse(e.to_string()))?;

    let status_ok = (200..300).contains(&status);
    if !status_ok || !response.valid.unwrap_or(false) {
        return Err(LicenseError::Rejected {
            status,
            message: response
                .message
                .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
        });
    }

    Ok(Entitlement {
        api_calls_left: response.api_calls_left.unwrap_or(0),
        days_remaining: response.days_remaining,
        message: response
            .message
            .unwrap_or_else(|| DEFAULT_VALID_MESSAGE.to_string()),
        hardware_hash: hardware_hash.clone(),
        validated_at: chrono::Utc::now(),
    })
}
