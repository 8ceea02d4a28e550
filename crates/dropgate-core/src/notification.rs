//! User-visible notifications.
//!
//! [`NotificationPresenter`] turns transfer events into notification
//! requests for a platform [`NotificationCenter`]. Identifiers are derived
//! from the transfer id so that a prompt can later be withdrawn:
//!
//! | Kind | Identifier |
//! |------|------------|
//! | Prompt / info | `transfer_<id>` |
//! | Error notice | `transferError_<id>` |
//!
//! The two prefixes never overlap, so withdrawing a prompt never removes an
//! error notice for the same transfer.

use std::sync::atomic::{AtomicBool, Ordering};

/// Prefix of prompt and informational notification identifiers.
pub const TRANSFER_ID_PREFIX: &str = "transfer_";

/// Prefix of error notification identifiers.
pub const ERROR_ID_PREFIX: &str = "transferError_";

/// Title of prompts and informational notices.
pub const APP_TITLE: &str = "Dropgate";

/// Identifier of the prompt or info notice for `transfer_id`.
#[must_use]
pub fn transfer_notification_id(transfer_id: &str) -> String {
    format!("{TRANSFER_ID_PREFIX}{transfer_id}")
}

/// Identifier of the error notice for `transfer_id`.
#[must_use]
pub fn error_notification_id(transfer_id: &str) -> String {
    format!("{ERROR_ID_PREFIX}{transfer_id}")
}

/// Subtitle showing the verification pin.
#[must_use]
pub fn pin_subtitle(pin: &str) -> String {
    format!("PIN: {pin}")
}

/// Body of an actionable prompt.
#[must_use]
pub fn prompt_body(device_name: &str, summary: &str) -> String {
    format!("{device_name} is sending you {summary}")
}

/// Body of the notice shown for auto-accepted transfers.
#[must_use]
pub fn receiving_body(summary: &str, device_name: &str) -> String {
    format!("Receiving {summary} from {device_name}")
}

/// Title of an error notice.
#[must_use]
pub fn error_title(device_name: &str) -> String {
    format!("Failed to receive files from {device_name}")
}

/// Response affordance attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Accept the transfer
    Accept,
    /// Decline the transfer
    Decline,
}

impl NotificationAction {
    /// Platform action identifier.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Decline => "DECLINE",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Accept => "Accept",
            Self::Decline => "Decline",
        }
    }
}

/// Notification category, which determines the available actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    /// Prompt with Accept and Decline
    IncomingTransfer,
    /// Informational notice, no actions
    Info,
    /// Error notice, no actions
    Error,
}

impl NotificationCategory {
    /// Actions offered by notifications in this category.
    #[must_use]
    pub const fn actions(self) -> &'static [NotificationAction] {
        match self {
            Self::IncomingTransfer => &[NotificationAction::Accept, NotificationAction::Decline],
            Self::Info | Self::Error => &[],
        }
    }

    /// Platform category identifier.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::IncomingTransfer => "INCOMING_TRANSFERS",
            Self::Info => "INFO",
            Self::Error => "ERRORS",
        }
    }
}

/// A notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier used for later removal
    pub identifier: String,
    /// Transfer this notification is about
    pub transfer_id: String,
    /// Title line
    pub title: String,
    /// Optional subtitle (the pin code)
    pub subtitle: Option<String>,
    /// Body text
    pub body: String,
    /// Category
    pub category: NotificationCategory,
    /// Play the default sound
    pub sound: bool,
}

impl Notification {
    /// Whether the user can answer this notification.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !self.category.actions().is_empty()
    }
}

/// Outcome of the notification permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Notifications will be shown
    Granted,
    /// Notifications are blocked by the user or platform
    Denied,
}

/// The platform notification service.
///
/// All methods are fire-and-forget: implementations queue the request and
/// return without waiting for it to become visible.
pub trait NotificationCenter: Send + Sync {
    /// Ask the platform for permission to show notifications.
    fn request_authorization(&self) -> PermissionStatus;

    /// Post a notification, replacing any with the same identifier.
    fn add(&self, notification: Notification);

    /// Withdraw delivered notifications. Unknown identifiers are ignored.
    fn remove_delivered(&self, identifiers: &[String]);

    /// Withdraw every delivered notification.
    fn remove_all_delivered(&self);
}

/// Presents transfer prompts and error notices.
#[derive(Debug)]
pub struct NotificationPresenter<N> {
    center: N,
    sound: bool,
    degraded: AtomicBool,
}

impl<N: NotificationCenter> NotificationPresenter<N> {
    /// Create a presenter on top of a platform center.
    pub fn new(center: N) -> Self {
        Self {
            center,
            sound: true,
            degraded: AtomicBool::new(false),
        }
    }

    /// Enable or disable notification sounds.
    #[must_use]
    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }

    /// The underlying platform center.
    pub fn center(&self) -> &N {
        &self.center
    }

    /// Request notification permission.
    ///
    /// A denial is logged and remembered; posting continues regardless and
    /// the platform drops what it cannot show.
    pub fn request_permission(&self) -> PermissionStatus {
        let status = self.center.request_authorization();
        if status == PermissionStatus::Denied {
            self.degraded.store(true, Ordering::Relaxed);
            tracing::warn!(
                "notification permission denied; incoming transfer prompts will not be visible"
            );
        }
        status
    }

    /// Whether permission was denied.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Post the prompt or info notice for a transfer.
    pub fn present(
        &self,
        transfer_id: &str,
        title: &str,
        subtitle: Option<String>,
        body: String,
        actionable: bool,
    ) {
        let category = if actionable {
            NotificationCategory::IncomingTransfer
        } else {
            NotificationCategory::Info
        };
        self.center.add(Notification {
            identifier: transfer_notification_id(transfer_id),
            transfer_id: transfer_id.to_string(),
            title: title.to_string(),
            subtitle,
            body,
            category,
            sound: self.sound,
        });
    }

    /// Post an error notice naming the remote device.
    pub fn present_error(&self, transfer_id: &str, device_name: &str, message: String) {
        self.center.add(Notification {
            identifier: error_notification_id(transfer_id),
            transfer_id: transfer_id.to_string(),
            title: error_title(device_name),
            subtitle: None,
            body: message,
            category: NotificationCategory::Error,
            sound: self.sound,
        });
    }

    /// Withdraw notifications by identifier.
    pub fn remove_delivered(&self, identifiers: &[String]) {
        self.center.remove_delivered(identifiers);
    }

    /// Withdraw the prompt or info notice for a transfer.
    pub fn remove_transfer_notification(&self, transfer_id: &str) {
        self.remove_delivered(&[transfer_notification_id(transfer_id)]);
    }

    /// Withdraw everything this application has delivered.
    pub fn remove_all_delivered(&self) {
        self.center.remove_all_delivered();
    }
}

/// [`NotificationCenter`] that writes notifications to the log.
///
/// Useful for headless hosts where no desktop notification service exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationCenter;

impl NotificationCenter for TracingNotificationCenter {
    fn request_authorization(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn add(&self, notification: Notification) {
        tracing::info!(
            id = %notification.identifier,
            category = notification.category.identifier(),
            "{}: {}",
            notification.title,
            notification.body
        );
    }

    fn remove_delivered(&self, identifiers: &[String]) {
        tracing::debug!(?identifiers, "removing delivered notifications");
    }

    fn remove_all_delivered(&self) {
        tracing::debug!("removing all delivered notifications");
    }
}
