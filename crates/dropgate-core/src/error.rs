//! Error types for Dropgate.
//!
//! This module provides the unified error type for fallible Dropgate
//! operations, plus the consistency violations the orchestrator logs
//! instead of surfacing.

use std::io;

use thiserror::Error;

use crate::session::SessionState;

/// A specialized `Result` type for Dropgate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Dropgate.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A session was asked to move along an edge the state machine forbids
    #[error("invalid transition for transfer '{transfer_id}': {from} -> {to}")]
    InvalidTransition {
        /// Transfer the session belongs to
        transfer_id: String,
        /// State the session was in
        from: SessionState,
        /// State that was requested
        to: SessionState,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A background task panicked or was cancelled
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Internal inconsistencies between this core and its collaborators.
///
/// These are never shown to the user and never abort processing; the
/// orchestrator logs them at `warn` and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyViolation {
    /// The transport reported a cancellation for an inbound transfer
    #[error("transport reported cancellation for inbound transfer '{transfer_id}'")]
    CanceledOnInbound {
        /// Affected transfer
        transfer_id: String,
    },

    /// A finish event arrived for an id that was never offered
    #[error("finish event for unknown transfer '{transfer_id}'")]
    FinishForUnknownId {
        /// Transfer named by the event
        transfer_id: String,
    },

    /// An offer arrived for an id that is still active
    #[error("duplicate offer for active transfer '{transfer_id}'")]
    DuplicateOffer {
        /// Transfer named by the offer
        transfer_id: String,
    },
}

impl ConsistencyViolation {
    /// Transfer this violation concerns.
    #[must_use]
    pub fn transfer_id(&self) -> &str {
        match self {
            Self::CanceledOnInbound { transfer_id }
            | Self::FinishForUnknownId { transfer_id }
            | Self::DuplicateOffer { transfer_id } => transfer_id,
        }
    }

    /// Log this violation.
    pub fn report(&self) {
        tracing::warn!(transfer_id = self.transfer_id(), "consistency violation: {self}");
    }
}
