//! Transfer sessions and the data they carry.
//!
//! A [`TransferSession`] is created when the transport offers a transfer and
//! lives in the [`ConsentRegistry`](crate::registry::ConsentRegistry) until
//! the offer is terminally resolved.
//!
//! ## State Machine
//!
//! | From | Allowed targets |
//! |------|-----------------|
//! | `Offered` | `AutoAccepted`, `PendingUserChoice` |
//! | `PendingUserChoice` | `Accepted`, `Declined`, `Completed`, `Failed` |
//! | `AutoAccepted` | `Completed`, `Failed` |
//! | `Accepted` | `Completed`, `Failed` |
//!
//! `Declined`, `Completed` and `Failed` are final.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity of the peer offering a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDeviceInfo {
    /// Device identifier as reported by the transport
    pub id: String,
    /// Display name
    pub name: String,
}

impl RemoteDeviceInfo {
    /// Create a new device record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A file announced in a transfer offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

/// What a peer wants to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferMetadata {
    /// Unique transfer identifier
    pub id: String,
    /// Verification code shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_code: Option<String>,
    /// Description for text payloads (links, snippets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_description: Option<String>,
    /// Files in offer order
    #[serde(default)]
    pub files: Vec<FileInfo>,
}

impl TransferMetadata {
    /// Create metadata for a file transfer.
    #[must_use]
    pub fn new(id: impl Into<String>, files: Vec<FileInfo>) -> Self {
        Self {
            id: id.into(),
            pin_code: None,
            text_description: None,
            files,
        }
    }

    /// Set the pin code.
    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin_code = Some(pin.into());
        self
    }

    /// Set a text description.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_description = Some(text.into());
        self
    }

    /// Short human summary of the payload.
    ///
    /// The text description wins; otherwise a single file is named and
    /// anything else is counted.
    #[must_use]
    pub fn describe(&self) -> String {
        if let Some(text) = &self.text_description {
            return text.clone();
        }
        match self.files.as_slice() {
            [only] => only.name.clone(),
            files => format!("{} files", files.len()),
        }
    }

    /// Total announced size in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Offer received, policy not yet applied
    Offered,
    /// Accepted by policy without asking
    AutoAccepted,
    /// Waiting for the user
    PendingUserChoice,
    /// Accepted by the user
    Accepted,
    /// Declined or dismissed by the user
    Declined,
    /// Transport finished without error
    Completed,
    /// Transport finished with an error
    Failed,
}

impl SessionState {
    /// Whether `self -> next` is an edge of the state machine.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Offered, Self::AutoAccepted | Self::PendingUserChoice)
                | (
                    Self::PendingUserChoice,
                    Self::Accepted | Self::Declined | Self::Completed | Self::Failed
                )
                | (Self::AutoAccepted | Self::Accepted, Self::Completed | Self::Failed)
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offered => write!(f, "offered"),
            Self::AutoAccepted => write!(f, "auto_accepted"),
            Self::PendingUserChoice => write!(f, "pending_user_choice"),
            Self::Accepted => write!(f, "accepted"),
            Self::Declined => write!(f, "declined"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One in-flight transfer offer.
#[derive(Debug, Clone)]
pub struct TransferSession {
    device: RemoteDeviceInfo,
    metadata: TransferMetadata,
    state: SessionState,
    created_at: DateTime<Utc>,
}

impl TransferSession {
    /// Create a session in the `Offered` state.
    #[must_use]
    pub fn new(metadata: TransferMetadata, device: RemoteDeviceInfo) -> Self {
        Self {
            device,
            metadata,
            state: SessionState::Offered,
            created_at: Utc::now(),
        }
    }

    /// Transfer identifier.
    #[must_use]
    pub fn transfer_id(&self) -> &str {
        &self.metadata.id
    }

    /// The offering peer.
    #[must_use]
    pub fn device(&self) -> &RemoteDeviceInfo {
        &self.device
    }

    /// What is being offered.
    #[must_use]
    pub fn metadata(&self) -> &TransferMetadata {
        &self.metadata
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// When the offer arrived.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Move to `next`, rejecting edges outside the state machine.
    pub fn transition(&mut self, next: SessionState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                transfer_id: self.metadata.id.clone(),
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(
            transfer_id = %self.metadata.id,
            "session {} -> {}",
            self.state,
            next
        );
        self.state = next;
        Ok(())
    }
}
