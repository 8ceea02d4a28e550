//! Common test utilities for `Dropgate` integration tests.
//!
//! This module provides recording doubles for the transport and the
//! notification platform, plus offer fixtures.

#![allow(dead_code)]

use std::sync::Mutex;

use dropgate_core::config::AutoAcceptSwitch;
use dropgate_core::notification::{
    Notification, NotificationCenter, NotificationPresenter, PermissionStatus,
};
use dropgate_core::{ConsentTransport, FileInfo, Orchestrator, RemoteDeviceInfo, TransferMetadata};

/// Transport double that records every consent signal.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    consents: Mutex<Vec<(String, bool)>>,
}

impl RecordingTransport {
    /// All signals in the order they were issued.
    pub fn consents(&self) -> Vec<(String, bool)> {
        self.consents.lock().unwrap().clone()
    }

    /// Signals issued for one transfer.
    pub fn consents_for(&self, transfer_id: &str) -> Vec<bool> {
        self.consents
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == transfer_id)
            .map(|(_, accept)| *accept)
            .collect()
    }
}

impl ConsentTransport for RecordingTransport {
    fn submit_consent(&self, transfer_id: &str, accept: bool) {
        self.consents
            .lock()
            .unwrap()
            .push((transfer_id.to_string(), accept));
    }
}

/// An operation observed by [`RecordingCenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CenterOp {
    /// A notification was posted
    Added(Notification),
    /// Notifications were withdrawn by id
    Removed(Vec<String>),
    /// Everything was withdrawn
    RemovedAll,
}

/// Notification platform double.
#[derive(Debug, Default)]
pub struct RecordingCenter {
    ops: Mutex<Vec<CenterOp>>,
    deny: bool,
}

impl RecordingCenter {
    /// A center whose permission request is refused.
    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    /// Every operation, in order.
    pub fn ops(&self) -> Vec<CenterOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Notifications posted so far.
    pub fn added(&self) -> Vec<Notification> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CenterOp::Added(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Identifiers withdrawn so far.
    pub fn removed(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CenterOp::Removed(ids) => Some(ids),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl NotificationCenter for RecordingCenter {
    fn request_authorization(&self) -> PermissionStatus {
        if self.deny {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }

    fn add(&self, notification: Notification) {
        self.ops.lock().unwrap().push(CenterOp::Added(notification));
    }

    fn remove_delivered(&self, identifiers: &[String]) {
        self.ops
            .lock()
            .unwrap()
            .push(CenterOp::Removed(identifiers.to_vec()));
    }

    fn remove_all_delivered(&self) {
        self.ops.lock().unwrap().push(CenterOp::RemovedAll);
    }
}

/// Orchestrator type used throughout the integration tests.
pub type TestOrchestrator = Orchestrator<RecordingTransport, RecordingCenter>;

/// Build an orchestrator around fresh doubles.
pub fn orchestrator(auto_accept: bool) -> TestOrchestrator {
    orchestrator_with_switch(AutoAcceptSwitch::new(auto_accept))
}

/// Build an orchestrator reading the given switch.
pub fn orchestrator_with_switch(switch: AutoAcceptSwitch) -> TestOrchestrator {
    Orchestrator::new(
        RecordingTransport::default(),
        NotificationPresenter::new(RecordingCenter::default()),
        switch,
    )
}

/// The sending device used by fixtures.
pub fn pixel() -> RemoteDeviceInfo {
    RemoteDeviceInfo::new("a1b2", "Pixel 8")
}

/// An offer of a single named file.
pub fn single_file(transfer_id: &str, name: &str) -> TransferMetadata {
    TransferMetadata::new(
        transfer_id,
        vec![FileInfo {
            name: name.to_string(),
            size: 2_048_000,
        }],
    )
}

/// An offer of `count` files.
pub fn many_files(transfer_id: &str, count: usize) -> TransferMetadata {
    TransferMetadata::new(
        transfer_id,
        (0..count)
            .map(|i| FileInfo {
                name: format!("IMG_{i:04}.jpg"),
                size: 1024,
            })
            .collect(),
    )
}
