//! License keys and the entitlement granted for them.

use crate::device::HardwareFingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A license key as entered by the user.
///
/// Keys are opaque to the client: nothing is trimmed or checked, the string
/// goes to the backend exactly as given.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Wraps a raw key string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw key string.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Returns the key with everything after the first four characters hidden.
    #[must_use]
    pub fn masked(&self) -> String {
        let visible: String = self.0.chars().take(4).collect();
        format!("{visible}…")
    }
}

// Keys are secrets; keep them out of debug output.
impl fmt::Debug for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LicenseKey").field(&self.masked()).finish()
    }
}

impl From<&str> for LicenseKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for LicenseKey {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// What a successful validation granted this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    /// Gated calls still allowed. Tracked locally after activation.
    pub api_calls_left: u64,
    /// Days until the license expires, if it expires. Informational only.
    pub days_remaining: Option<i64>,
    /// Status message for display.
    pub message: String,
    /// Fingerprint the license was validated against.
    pub hardware_hash: HardwareFingerprint,
    /// When the backend confirmed the key.
    pub validated_at: DateTime<Utc>,
}

impl Entitlement {
    /// Returns true while at least one gated call remains.
    #[must_use]
    pub fn has_calls_left(&self) -> bool {
        self.api_calls_left > 0
    }
}
