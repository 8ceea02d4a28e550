//! The consent state machine.
//!
//! [`Orchestrator`] reconciles two independent event sources for every
//! incoming transfer: the transport (offers and completions) and the user
//! (answers to prompts). It guarantees that each transfer receives at most
//! one consent signal and that each session is resolved exactly once, no
//! matter how those events interleave.
//!
//! ## Transitions
//!
//! | Event | From | To | Effects |
//! |-------|------|----|---------|
//! | offer, auto-accept on | - | `AutoAccepted` | consent `true`, info notice |
//! | offer, auto-accept off | - | `PendingUserChoice` | actionable prompt |
//! | accept | `PendingUserChoice` | `Accepted` | consent `true` |
//! | decline / dismiss | `PendingUserChoice` | `Declined` | consent `false`, session removed, prompt withdrawn |
//! | finished ok | any live | `Completed` | session removed, prompt withdrawn |
//! | finished with error | any live | `Failed` | session removed, error notice, prompt withdrawn |
//!
//! Collaborators are always called after the registry has released the
//! affected entry. An offer re-checks the registry after posting its
//! notification, so a prompt is never left behind for a transfer that was
//! resolved in the meantime.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AutoAcceptSwitch;
use crate::error::ConsistencyViolation;
use crate::notification::{
    pin_subtitle, prompt_body, receiving_body, NotificationCenter, NotificationPresenter,
    APP_TITLE,
};
use crate::policy::{self, ConsentPolicy};
use crate::registry::ConsentRegistry;
use crate::session::{RemoteDeviceInfo, SessionState, TransferMetadata, TransferSession};
use crate::transport::{ConsentTransport, TransferError};
use crate::translate::{translate, Translation};

/// A user's answer to a transfer prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// Accept the transfer
    Accept,
    /// Decline the transfer
    Decline,
    /// Anything else the platform reports (dismissal, expiry)
    Other,
}

impl UserAction {
    /// Map a platform action identifier.
    ///
    /// Only `ACCEPT` accepts; every other identifier, including dismissals,
    /// is treated as a refusal.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "ACCEPT" => Self::Accept,
            "DECLINE" => Self::Decline,
            _ => Self::Other,
        }
    }
}

/// Drives incoming transfers from offer to resolution.
#[derive(Debug)]
pub struct Orchestrator<T, N> {
    registry: Arc<ConsentRegistry>,
    transport: T,
    presenter: NotificationPresenter<N>,
    auto_accept: AutoAcceptSwitch,
}

impl<T, N> Orchestrator<T, N>
where
    T: ConsentTransport,
    N: NotificationCenter,
{
    /// Create an orchestrator with a fresh registry.
    ///
    /// Notification permission is requested here, once.
    pub fn new(
        transport: T,
        presenter: NotificationPresenter<N>,
        auto_accept: AutoAcceptSwitch,
    ) -> Self {
        Self::with_registry(
            transport,
            presenter,
            auto_accept,
            Arc::new(ConsentRegistry::new()),
        )
    }

    /// Create an orchestrator on top of an existing registry.
    pub fn with_registry(
        transport: T,
        presenter: NotificationPresenter<N>,
        auto_accept: AutoAcceptSwitch,
        registry: Arc<ConsentRegistry>,
    ) -> Self {
        presenter.request_permission();
        Self {
            registry,
            transport,
            presenter,
            auto_accept,
        }
    }

    /// Handle a transfer offered by the transport.
    ///
    /// Returns the state the new session entered, or `None` if the offer
    /// was ignored because its id is already active.
    pub fn offer(
        &self,
        transfer: TransferMetadata,
        device: RemoteDeviceInfo,
    ) -> Option<SessionState> {
        let transfer_id = transfer.id.clone();
        let summary = transfer.describe();
        let subtitle = transfer.pin_code.as_deref().map(pin_subtitle);
        let device_name = device.name.clone();

        let policy = policy::decide(self.auto_accept.is_enabled());
        let state = match policy {
            ConsentPolicy::AutoAccept => SessionState::AutoAccepted,
            ConsentPolicy::RequireUserChoice => SessionState::PendingUserChoice,
        };

        let mut session = TransferSession::new(transfer, device);
        if let Err(e) = session.transition(state) {
            tracing::error!("{e}");
            return None;
        }
        if !self.registry.insert_new(session) {
            ConsistencyViolation::DuplicateOffer { transfer_id }.report();
            return None;
        }

        tracing::info!(
            transfer_id = %transfer_id,
            device = %device_name,
            "incoming transfer of {summary} ({state})"
        );

        match policy {
            ConsentPolicy::AutoAccept => {
                self.transport.submit_consent(&transfer_id, true);
                self.presenter.present(
                    &transfer_id,
                    APP_TITLE,
                    subtitle,
                    receiving_body(&summary, &device_name),
                    false,
                );
            }
            ConsentPolicy::RequireUserChoice => {
                self.presenter.present(
                    &transfer_id,
                    APP_TITLE,
                    subtitle,
                    prompt_body(&device_name, &summary),
                    true,
                );
            }
        }

        // A decline or finish may have resolved the session while the
        // notification was being posted; its withdrawal then ran first.
        if self.registry.get(&transfer_id).is_none() {
            tracing::debug!(transfer_id = %transfer_id, "transfer resolved during offer");
            self.presenter.remove_transfer_notification(&transfer_id);
        }

        Some(state)
    }

    /// Handle the user's answer to a prompt.
    ///
    /// Only sessions waiting for the user react; anything else is ignored
    /// and `None` is returned.
    pub fn user_response(&self, transfer_id: &str, action: UserAction) -> Option<SessionState> {
        match action {
            UserAction::Accept => {
                if self
                    .registry
                    .transition(
                        transfer_id,
                        SessionState::PendingUserChoice,
                        SessionState::Accepted,
                    )
                    .is_none()
                {
                    tracing::debug!(transfer_id, "ignoring accept for non-pending transfer");
                    return None;
                }
                tracing::info!(transfer_id, "transfer accepted");
                self.transport.submit_consent(transfer_id, true);
                Some(SessionState::Accepted)
            }
            UserAction::Decline | UserAction::Other => {
                let Some(mut session) = self
                    .registry
                    .remove_if_state(transfer_id, SessionState::PendingUserChoice)
                else {
                    tracing::debug!(transfer_id, ?action, "ignoring refusal for non-pending transfer");
                    return None;
                };
                if let Err(e) = session.transition(SessionState::Declined) {
                    tracing::error!("{e}");
                }
                tracing::info!(transfer_id, ?action, "transfer declined");
                self.transport.submit_consent(transfer_id, false);
                self.presenter.remove_transfer_notification(transfer_id);
                Some(SessionState::Declined)
            }
        }
    }

    /// Handle the transport reporting that a transfer ended.
    ///
    /// Idempotent: a second call for the same id, or a call after a decline,
    /// does nothing and returns `None`.
    pub fn transfer_finished(
        &self,
        transfer_id: &str,
        error: Option<TransferError>,
    ) -> Option<SessionState> {
        let Some(mut session) = self.registry.remove_if_present(transfer_id) else {
            if self.registry.was_recently_resolved(transfer_id) {
                tracing::debug!(transfer_id, "ignoring finish for resolved transfer");
            } else {
                ConsistencyViolation::FinishForUnknownId {
                    transfer_id: transfer_id.to_string(),
                }
                .report();
            }
            return None;
        };

        let outcome = if error.is_some() {
            SessionState::Failed
        } else {
            SessionState::Completed
        };
        if let Err(e) = session.transition(outcome) {
            tracing::error!("{e}");
        }

        if let Some(error) = error {
            tracing::warn!(transfer_id, device = %session.device().name, "transfer failed: {error}");
            match translate(transfer_id, &error) {
                Translation::Message(message) => {
                    self.presenter
                        .present_error(transfer_id, &session.device().name, message);
                }
                Translation::Suppressed(violation) => violation.report(),
            }
        } else {
            tracing::info!(transfer_id, "transfer completed");
        }

        self.presenter.remove_transfer_notification(transfer_id);
        Some(outcome)
    }

    /// Withdraw every delivered notification.
    ///
    /// Active sessions are left in place for the transport to finish.
    pub fn shutdown(&self) {
        tracing::debug!(active = self.registry.len(), "shutting down");
        self.presenter.remove_all_delivered();
    }

    /// Snapshot of an active session.
    #[must_use]
    pub fn session(&self, transfer_id: &str) -> Option<TransferSession> {
        self.registry.get(transfer_id)
    }

    /// Number of active sessions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    /// The session registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConsentRegistry> {
        &self.registry
    }

    /// The live auto-accept setting.
    #[must_use]
    pub fn auto_accept(&self) -> &AutoAcceptSwitch {
        &self.auto_accept
    }

    /// The notification presenter.
    #[must_use]
    pub fn presenter(&self) -> &NotificationPresenter<N> {
        &self.presenter
    }

    /// The consent transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
