//! License activation and usage gating for Toolgate.
//!
//! This crate handles:
//! - Hardware fingerprinting for device binding
//! - License validation against the Toolgate backend
//! - Local entitlement tracking (remaining API calls, expiry hint)
//!
//! # Usage
//!
//! 1. Call [`LicenseClient::activate`] once with the user's key.
//! 2. Call [`LicenseClient::authorize`] before every gated operation.
//! 3. Call [`LicenseClient::consume`] after each gated operation completes.
//!
//! # Design Principles
//!
//! - **One request per activation**: no retries, a fixed timeout bound
//! - **Local bookkeeping**: after activation the call quota is tracked
//!   in memory only and never re-synced with the backend
//! - **Nothing persisted**: state lives for the lifetime of the client

mod client;
mod config;
mod device;
mod entitlement;
mod error;
mod protocol;

pub use client::{LicenseClient, LicenseState};
pub use config::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, VALIDATE_PATH};
pub use device::{DeviceAttributes, HardwareFingerprint};
pub use entitlement::{Entitlement, LicenseKey};
pub use error::{ErrorCode, LicenseError, LicenseResult, ValidationOutcome};
pub use protocol::{ValidationRequest, ValidationResponse, interpret_response};
