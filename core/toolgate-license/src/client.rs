//! License client: activation against the backend and local quota gating.

use crate::config::ClientConfig;
use crate::device::HardwareFingerprint;
use crate::entitlement::{Entitlement, LicenseKey};
use crate::error::{LicenseError, LicenseResult, ValidationOutcome};
use crate::protocol::{ValidationRequest, interpret_response};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Whether this process currently holds a license.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LicenseState {
    /// No successful activation yet, or the last one failed.
    #[default]
    Unlicensed,
    /// The last activation succeeded.
    Licensed(Entitlement),
}

impl LicenseState {
    /// Returns the entitlement if licensed.
    #[must_use]
    pub fn entitlement(&self) -> Option<&Entitlement> {
        match self {
            Self::Licensed(entitlement) => Some(entitlement),
            Self::Unlicensed => None,
        }
    }
}

/// Validates license keys and tracks the resulting entitlement.
///
/// One client owns one entitlement. Activation takes `&mut self`, so
/// sharing a client between tasks requires the caller to wrap it in a lock.
pub struct LicenseClient {
    config: ClientConfig,
    http: Client,
    state: LicenseState,
}

impl LicenseClient {
    /// Creates an unlicensed client for the given backend.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> LicenseResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LicenseError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            state: LicenseState::Unlicensed,
        })
    }

    /// Creates a client for the local development backend.
    ///
    /// # Errors
    ///
    /// See [`LicenseClient::new`].
    pub fn local() -> LicenseResult<Self> {
        Self::new(ClientConfig::default())
    }

    /// Validates `key` for this machine and replaces the current state with the result.
    ///
    /// Exactly one request is made. On any failure the client is left
    /// unlicensed, even if a previous activation had succeeded.
    pub async fn activate(&mut self, key: impl Into<LicenseKey>) -> ValidationOutcome {
        let key = key.into();
        self.state = LicenseState::Unlicensed;

        let hardware_hash = HardwareFingerprint::generate();
        match self.validate(&key, &hardware_hash).await {
            Ok(entitlement) => {
                info!(
                    "License {} activated: {} API calls left, {} days remaining",
                    key.masked(),
                    entitlement.api_calls_left,
                    entitlement
                        .days_remaining
                        .map_or_else(|| "unlimited".to_string(), |d| d.to_string())
                );
                self.state = LicenseState::Licensed(entitlement.clone());
                Ok(entitlement)
            }
            Err(e) => {
                warn!("License {} activation failed [{}]: {}", key.masked(), e.code(), e);
                Err(e)
            }
        }
    }

    /// Sends one validation request and interprets the reply.
    async fn validate(
        &self,
        key: &LicenseKey,
        hardware_hash: &HardwareFingerprint,
    ) -> ValidationOutcome {
        let url = self.config.validation_url();
        debug!(
            "Validating license {} at {} (device {})",
            key.masked(),
            url,
            hardware_hash.short(8)
        );

        let request = ValidationRequest {
            license_key: key.clone(),
            hardware_hash: hardware_hash.clone(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        interpret_response(status, &body, hardware_hash)
    }

    /// Returns true if activated and at least one API call remains.
    ///
    /// Purely local; call before every gated operation.
    #[must_use]
    pub fn authorize(&self) -> bool {
        self.state
            .entitlement()
            .is_some_and(Entitlement::has_calls_left)
    }

    /// Records one completed gated operation.
    ///
    /// Does nothing when unlicensed; never goes below zero.
    pub fn consume(&mut self) {
        if let LicenseState::Licensed(entitlement) = &mut self.state {
            entitlement.api_calls_left = entitlement.api_calls_left.saturating_sub(1);
            debug!("API call consumed, {} left", entitlement.api_calls_left);
        }
    }

    /// Returns the current license state.
    #[must_use]
    pub fn state(&self) -> &LicenseState {
        &self.state
    }

    /// Returns the current entitlement if licensed.
    #[must_use]
    pub fn entitlement(&self) -> Option<&Entitlement> {
        self.state.entitlement()
    }

    /// Returns true if the last activation succeeded.
    #[must_use]
    pub fn is_licensed(&self) -> bool {
        matches!(self.state, LicenseState::Licensed(_))
    }

    /// Returns the locally tracked call quota, if licensed.
    #[must_use]
    pub fn api_calls_left(&self) -> Option<u64> {
        self.entitlement().map(|e| e.api_calls_left)
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
