//! The transport seam.
//!
//! The transport owns discovery, the handshake and the bytes on the wire.
//! This core only sees offers and completions from it and answers with a
//! consent decision per transfer.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors a transport can finish an inbound transfer with.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TransferError {
    /// Reading or writing failed
    #[error("input/output error")]
    Io,

    /// The peer violated the protocol
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A mandatory protocol field was absent
    #[error("required field missing")]
    RequiredFieldMissing,

    /// Key exchange or decryption failed
    #[error("encryption error")]
    Crypto,

    /// The transfer was cancelled
    #[error("transfer canceled: {0}")]
    Canceled(String),

    /// Any other failure, described by the transport
    #[error("{0}")]
    Other(String),
}

/// Receives consent decisions from the orchestrator.
///
/// Implementations must not block: queue the decision and return.
pub trait ConsentTransport: Send + Sync {
    /// Tell the transport whether the user (or policy) accepts the transfer.
    fn submit_consent(&self, transfer_id: &str, accept: bool);
}

/// A consent decision as delivered over a [`ChannelTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentDecision {
    /// Transfer the decision applies to
    pub transfer_id: String,
    /// Whether the transfer may proceed
    pub accept: bool,
}

/// [`ConsentTransport`] that forwards decisions to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<ConsentDecision>,
}

impl ChannelTransport {
    /// Create a transport and the receiver its decisions arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ConsentDecision>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ConsentTransport for ChannelTransport {
    fn submit_consent(&self, transfer_id: &str, accept: bool) {
        let decision = ConsentDecision {
            transfer_id: transfer_id.to_string(),
            accept,
        };
        if self.tx.send(decision).is_err() {
            tracing::warn!(transfer_id, "consent receiver dropped, decision lost");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_transport_forwards() {
        let (transport, mut rx) = ChannelTransport::new();
        transport.submit_consent("t1", true);
        transport.submit_consent("t2", false);

        assert_eq!(
            rx.try_recv().unwrap(),
            ConsentDecision {
                transfer_id: "t1".to_string(),
                accept: true
            }
        );
        assert!(!rx.try_recv().unwrap().accept);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_transport_survives_dropped_receiver() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        transport.submit_consent("t1", true);
    }

    #[test]
    fn test_transfer_error_json() {
        let err: TransferError = serde_json::from_str(r#"{"kind":"io"}"#).unwrap();
        assert_eq!(err, TransferError::Io);

        let err: TransferError =
            serde_json::from_str(r#"{"kind":"protocol","detail":"bad frame"}"#).unwrap();
        assert_eq!(err, TransferError::Protocol("bad frame".to_string()));
    }
}
