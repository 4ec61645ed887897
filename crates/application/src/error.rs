//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the location session and geocoding gateway
///
/// Provider-originated errors are passed through to callers wrapped in this
/// taxonomy and are never retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The user or system denied location access
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    /// The provider cannot produce a fix (signal lost, hardware disabled)
    #[error("Location provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Forward or reverse geocoding failed
    #[error("Geocoding failed: {0}")]
    GeocodeFailed(String),

    /// A value was queried before one was ever set
    #[error("No {0} available")]
    NotAvailable(&'static str),

    /// Domain-level error (e.g. invalid coordinates)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LocationError {
    /// Check if retrying the same request might succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::GeocodeFailed(_))
    }
}
