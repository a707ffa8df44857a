//! Log-based failure reporter adapter.
//!
//! Implements [`FailureReporter`] by writing every reported failure to the
//! `log` facade. A host-integrated build could swap in an adapter that
//! raises toasts or counts metrics instead; the engine core does not care.

use log::error;

use crate::app::ports::FailureReporter;
use crate::error::Error;

/// Adapter that logs every reported failure.
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureReporter for LogReporter {
    fn failure(&mut self, context: &str, err: &Error) {
        error!("FAIL | {context}: {err}");
    }
}
