//! Event plumbing between collaborators and the orchestrator.
//!
//! Transport callbacks and user responses arrive on different execution
//! contexts. [`EventPumps`] gives each source its own tokio task draining
//! its own channel into a shared [`Orchestrator`], so a slow source never
//! holds up the other.
//!
//! Events are serde-serializable so they can be scripted as JSON Lines:
//!
//! ```text
//! {"event":"offer","transfer":{"id":"t1","pin_code":"1234","files":[{"name":"a.jpg","size":10}]},"device":{"id":"d1","name":"Pixel"}}
//! {"event":"response","transfer_id":"t1","action":"accept"}
//! {"event":"finished","transfer_id":"t1"}
//! {"event":"finished","transfer_id":"t2","error":{"kind":"io"}}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::notification::NotificationCenter;
use crate::orchestrator::{Orchestrator, UserAction};
use crate::session::{RemoteDeviceInfo, SessionState, TransferMetadata};
use crate::transport::{ConsentTransport, TransferError};

/// Capacity of the channels created by [`EventPumps::channels`].
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Something that happened to an incoming transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The transport offers a transfer
    Offer {
        /// What is offered
        transfer: TransferMetadata,
        /// Who offers it
        device: RemoteDeviceInfo,
    },
    /// The transport finished a transfer
    Finished {
        /// Transfer that ended
        transfer_id: String,
        /// Failure, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<TransferError>,
    },
    /// The user answered a prompt
    Response {
        /// Transfer the answer is for
        transfer_id: String,
        /// The answer
        action: UserAction,
    },
}

impl Event {
    /// Transfer this event concerns.
    #[must_use]
    pub fn transfer_id(&self) -> &str {
        match self {
            Self::Offer { transfer, .. } => &transfer.id,
            Self::Finished { transfer_id, .. } | Self::Response { transfer_id, .. } => {
                transfer_id
            }
        }
    }

    /// Whether this event originates from the user rather than the transport.
    #[must_use]
    pub const fn is_user_event(&self) -> bool {
        matches!(self, Self::Response { .. })
    }

    /// Feed this event to the orchestrator.
    pub fn apply<T, N>(self, orchestrator: &Orchestrator<T, N>) -> Option<SessionState>
    where
        T: ConsentTransport,
        N: NotificationCenter,
    {
        match self {
            Self::Offer { transfer, device } => orchestrator.offer(transfer, device),
            Self::Finished { transfer_id, error } => {
                orchestrator.transfer_finished(&transfer_id, error)
            }
            Self::Response {
                transfer_id,
                action,
            } => orchestrator.user_response(&transfer_id, action),
        }
    }
}

/// Parse a JSON Lines event script.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_script(input: &str) -> Result<Vec<Event>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| Error::Serialization(format!("line {}: {e}", index + 1)))
        })
        .collect()
}

/// Senders feeding a pair of [`EventPumps`].
#[derive(Debug, Clone)]
pub struct EventSenders {
    /// Transport events (offers, completions)
    pub transport: mpsc::Sender<Event>,
    /// User responses
    pub user: mpsc::Sender<Event>,
}

/// Receivers drained by [`EventPumps`].
#[derive(Debug)]
pub struct EventReceivers {
    transport: mpsc::Receiver<Event>,
    user: mpsc::Receiver<Event>,
}

/// Tasks forwarding each event source into the orchestrator.
#[derive(Debug)]
pub struct EventPumps {
    transport: JoinHandle<usize>,
    user: JoinHandle<usize>,
}

impl EventPumps {
    /// Create the two bounded event channels.
    #[must_use]
    pub fn channels() -> (EventSenders, EventReceivers) {
        let (transport_tx, transport_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (user_tx, user_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (
            EventSenders {
                transport: transport_tx,
                user: user_tx,
            },
            EventReceivers {
                transport: transport_rx,
                user: user_rx,
            },
        )
    }

    /// Spawn one task per event source.
    ///
    /// Each task runs until its senders are dropped.
    pub fn spawn<T, N>(orchestrator: Arc<Orchestrator<T, N>>, receivers: EventReceivers) -> Self
    where
        T: ConsentTransport + 'static,
        N: NotificationCenter + 'static,
    {
        let transport = tokio::spawn(pump(
            Arc::clone(&orchestrator),
            receivers.transport,
            "transport",
        ));
        let user = tokio::spawn(pump(orchestrator, receivers.user, "user"));
        Self { transport, user }
    }

    /// Wait for both sources to close.
    ///
    /// Returns how many events each pump processed, transport first.
    pub async fn join(self) -> Result<(usize, usize)> {
        let (transport, user) = tokio::join!(self.transport, self.user);
        let transport = transport.map_err(|e| Error::TaskFailed(e.to_string()))?;
        let user = user.map_err(|e| Error::TaskFailed(e.to_string()))?;
        Ok((transport, user))
    }
}

async fn pump<T, N>(
    orchestrator: Arc<Orchestrator<T, N>>,
    mut rx: mpsc::Receiver<Event>,
    source: &'static str,
) -> usize
where
    T: ConsentTransport,
    N: NotificationCenter,
{
    let mut processed = 0;
    while let Some(event) = rx.recv().await {
        tracing::trace!(source, transfer_id = event.transfer_id(), "dispatching event");
        event.apply(&orchestrator);
        processed += 1;
    }
    tracing::debug!(source, processed, "event source closed");
    processed
}
