//! User-facing wording for transport errors.

use crate::error::ConsistencyViolation;
use crate::transport::TransferError;

/// Body used when the transport describes a failure with an empty string.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Result of translating a transport error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Show this message to the user
    Message(String),
    /// Do not show anything; the error indicates an internal inconsistency
    Suppressed(ConsistencyViolation),
}

/// Translate a transport error for `transfer_id` into a user-facing message.
///
/// Never fails: unrecognized errors fall back to the transport's own
/// description.
#[must_use]
pub fn translate(transfer_id: &str, error: &TransferError) -> Translation {
    let message = match error {
        TransferError::Io => "I/O Error",
        TransferError::Protocol(_) | TransferError::RequiredFieldMissing => "Communication error",
        TransferError::Crypto => "Encryption error",
        TransferError::Canceled(_) => {
            return Translation::Suppressed(ConsistencyViolation::CanceledOnInbound {
                transfer_id: transfer_id.to_string(),
            });
        }
        TransferError::Other(description) if description.trim().is_empty() => {
            UNKNOWN_ERROR_MESSAGE
        }
        TransferError::Other(description) => return Translation::Message(description.clone()),
    };
    Translation::Message(message.to_string())
}
