//! Unified error types for the mapsense engine.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! event loop's error handling uniform. All variants are `Copy` so they can
//! be cheaply passed through the failure reporter without allocation.
//! Failures are non-fatal by design: handlers report and continue, they
//! never tear the engine down.

use core::fmt;

use crate::app::ports::{BackendError, HostError, TransportError};

// ---------------------------------------------------------------------------
// Top-level engine error
// ---------------------------------------------------------------------------

/// Every fallible operation in the engine funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A host platform call (repository or view service) failed.
    Host(HostError),
    /// A pub/sub transport operation failed.
    Transport(TransportError),
    /// A backend HTTP query failed.
    Backend(BackendError),
    /// Persisted POI custom data could not be parsed.
    CustomData(CustomDataError),
    /// An alert-state toggle could not be applied.
    Toggle(ToggleError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host(e) => write!(f, "host: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Backend(e) => write!(f, "backend: {e}"),
            Self::CustomData(e) => write!(f, "custom data: {e}"),
            Self::Toggle(e) => write!(f, "toggle: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Custom data errors
// ---------------------------------------------------------------------------

/// Failure modes of the persisted custom-data blob.
///
/// Malformed data is a per-POI condition: the affected POI is skipped and
/// reported, the operation that found it carries on with the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomDataError {
    /// The blob is not valid JSON or does not match the record shape.
    Malformed,
}

impl fmt::Display for CustomDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed blob"),
        }
    }
}

impl From<CustomDataError> for Error {
    fn from(e: CustomDataError) -> Self {
        Self::CustomData(e)
    }
}

// ---------------------------------------------------------------------------
// Alert-state toggle errors
// ---------------------------------------------------------------------------

/// The state-type index resolves host type objects asynchronously at
/// startup; toggling before it is built is an explicit error, not a
/// dereference of an absent entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleError {
    /// The index has not been built from the host's type list yet.
    NotReady,
    /// The POI's group has no resolved type for the requested state.
    UnknownGroup,
}

impl fmt::Display for ToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "state-type index not built yet"),
            Self::UnknownGroup => write!(f, "no state types resolved for group"),
        }
    }
}

impl From<ToggleError> for Error {
    fn from(e: ToggleError) -> Self {
        Self::Toggle(e)
    }
}

// ---------------------------------------------------------------------------
// Port error conversions
// ---------------------------------------------------------------------------

impl From<HostError> for Error {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<BackendError> for Error {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Engine-wide `Result` alias. The error parameter defaults to [`Error`]
/// but stays overridable for port-level results.
pub type Result<T, E = Error> = core::result::Result<T, E>;
