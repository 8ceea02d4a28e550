//! Tests for the consent state machine.
//!
//! These tests drive the orchestrator through recording doubles and check
//! the consent signals and notifications it produces.

mod common;

use common::{many_files, orchestrator, orchestrator_with_switch, pixel, single_file, CenterOp};

use dropgate_core::config::AutoAcceptSwitch;
use dropgate_core::notification::{NotificationCategory, NotificationPresenter};
use dropgate_core::{Orchestrator, SessionState, TransferError, UserAction};

/// Manual consent: prompt, accept, then a clean finish.
#[test]
fn test_manual_accept_then_complete() {
    let o = orchestrator(false);
    let transfer = single_file("t1", "photo.jpg").with_pin("482913");

    assert_eq!(
        o.offer(transfer, pixel()),
        Some(SessionState::PendingUserChoice)
    );
    assert!(o.transport().consents().is_empty());

    let added = o.presenter().center().added();
    assert_eq!(added.len(), 1);
    let prompt = &added[0];
    assert_eq!(prompt.identifier, "transfer_t1");
    assert_eq!(prompt.subtitle.as_deref(), Some("PIN: 482913"));
    assert_eq!(prompt.body, "Pixel 8 is sending you photo.jpg");
    assert_eq!(prompt.category, NotificationCategory::IncomingTransfer);
    assert!(prompt.is_actionable());

    assert_eq!(
        o.user_response("t1", UserAction::Accept),
        Some(SessionState::Accepted)
    );
    assert_eq!(o.transport().consents_for("t1"), vec![true]);
    assert!(o.presenter().center().removed().is_empty());

    assert_eq!(
        o.transfer_finished("t1", None),
        Some(SessionState::Completed)
    );
    assert_eq!(o.presenter().center().removed(), vec!["transfer_t1"]);
    assert_eq!(o.presenter().center().added().len(), 1);
    assert!(o.session("t1").is_none());
    assert_eq!(o.active_count(), 0);
}

/// Auto-accept: immediate consent and an informational notice, then an I/O error.
#[test]
fn test_auto_accept_then_io_error() {
    let o = orchestrator(true);

    assert_eq!(
        o.offer(many_files("t2", 3), pixel()),
        Some(SessionState::AutoAccepted)
    );
    assert_eq!(o.transport().consents(), vec![("t2".to_string(), true)]);

    let added = o.presenter().center().added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].category, NotificationCategory::Info);
    assert!(!added[0].is_actionable());
    assert_eq!(added[0].body, "Receiving 3 files from Pixel 8");

    assert_eq!(
        o.transfer_finished("t2", Some(TransferError::Io)),
        Some(SessionState::Failed)
    );

    let ops = o.presenter().center().ops();
    let CenterOp::Added(error) = &ops[1] else {
        panic!("expected an error notice, got {ops:?}");
    };
    assert_eq!(error.identifier, "transferError_t2");
    assert_eq!(error.title, "Failed to receive files from Pixel 8");
    assert_eq!(error.body, "I/O Error");
    assert_eq!(error.category, NotificationCategory::Error);
    assert_eq!(ops[2], CenterOp::Removed(vec!["transfer_t2".to_string()]));

    assert!(o.registry().is_empty());
    assert_eq!(o.transport().consents().len(), 1);
}

/// Decline withdraws the prompt and removes the session.
#[test]
fn test_decline() {
    let o = orchestrator(false);
    o.offer(single_file("t3", "doc.pdf"), pixel());

    assert_eq!(
        o.user_response("t3", UserAction::Decline),
        Some(SessionState::Declined)
    );
    assert_eq!(o.transport().consents_for("t3"), vec![false]);
    assert!(o.session("t3").is_none());
    assert_eq!(o.presenter().center().removed(), vec!["transfer_t3"]);
}

/// Dismissing a prompt behaves exactly like declining it.
#[test]
fn test_dismiss_equals_decline() {
    let declined = orchestrator(false);
    let dismissed = orchestrator(false);
    declined.offer(single_file("t", "a.txt"), pixel());
    dismissed.offer(single_file("t", "a.txt"), pixel());

    let a = declined.user_response("t", UserAction::Decline);
    let b = dismissed.user_response("t", UserAction::from_identifier("DISMISS"));

    assert_eq!(a, b);
    assert_eq!(
        declined.transport().consents(),
        dismissed.transport().consents()
    );
    assert_eq!(
        declined.presenter().center().ops(),
        dismissed.presenter().center().ops()
    );
    assert!(declined.registry().is_empty());
    assert!(dismissed.registry().is_empty());
}

/// A finish after a decline changes nothing.
#[test]
fn test_finish_after_decline_is_absorbed() {
    let o = orchestrator(false);
    o.offer(single_file("t4", "a.txt"), pixel());
    o.user_response("t4", UserAction::Decline);
    let ops_before = o.presenter().center().ops();

    assert_eq!(
        o.transfer_finished("t4", Some(TransferError::Protocol("reset".to_string()))),
        None
    );
    assert_eq!(o.presenter().center().ops(), ops_before);
    assert_eq!(o.transport().consents_for("t4"), vec![false]);
}

/// Duplicate finish callbacks produce nothing the second time.
#[test]
fn test_transfer_finished_is_idempotent() {
    let o = orchestrator(true);
    o.offer(single_file("t5", "a.txt"), pixel());

    assert_eq!(
        o.transfer_finished("t5", Some(TransferError::Crypto)),
        Some(SessionState::Failed)
    );
    let ops_before = o.presenter().center().ops();

    assert_eq!(o.transfer_finished("t5", Some(TransferError::Crypto)), None);
    assert_eq!(o.transfer_finished("t5", None), None);
    assert_eq!(o.presenter().center().ops(), ops_before);
}

/// A response after the transport already finished is ignored.
#[test]
fn test_response_after_finish_is_ignored() {
    let o = orchestrator(false);
    o.offer(single_file("t6", "a.txt"), pixel());
    o.transfer_finished("t6", None);

    assert_eq!(o.user_response("t6", UserAction::Accept), None);
    assert_eq!(o.user_response("t6", UserAction::Decline), None);
    assert!(o.transport().consents().is_empty());
}

/// Errors on one transfer never touch another.
#[test]
fn test_errors_are_scoped_to_their_transfer() {
    let o = orchestrator(false);
    o.offer(single_file("a", "a.txt"), pixel());
    o.offer(single_file("b", "b.txt"), pixel());
    o.user_response("a", UserAction::Accept);

    o.transfer_finished("a", Some(TransferError::Io));

    let b = o.session("b").unwrap();
    assert_eq!(b.state(), SessionState::PendingUserChoice);
    assert_eq!(o.active_count(), 1);
    assert!(!o.presenter().center().removed().contains(&"transfer_b".to_string()));
}

/// Unrecognized transport errors surface the transport's description.
#[test]
fn test_unknown_error_uses_transport_description() {
    let o = orchestrator(true);
    o.offer(single_file("t7", "a.txt"), pixel());
    o.transfer_finished("t7", Some(TransferError::Other("Disk quota exceeded".to_string())));

    let added = o.presenter().center().added();
    assert_eq!(added.last().unwrap().body, "Disk quota exceeded");
}

/// A cancellation is logged, not shown.
#[test]
fn test_canceled_is_not_shown() {
    let o = orchestrator(false);
    o.offer(single_file("t8", "a.txt"), pixel());
    o.user_response("t8", UserAction::Accept);

    assert_eq!(
        o.transfer_finished("t8", Some(TransferError::Canceled("sender".to_string()))),
        Some(SessionState::Failed)
    );
    assert_eq!(o.presenter().center().added().len(), 1);
    assert_eq!(o.presenter().center().removed(), vec!["transfer_t8"]);
    assert!(o.registry().is_empty());
}

/// Text payloads are described by their text.
#[test]
fn test_text_offer_without_pin() {
    let o = orchestrator(false);
    let transfer = single_file("t9", "ignored").with_text("https://example.org");
    o.offer(transfer, pixel());

    let prompt = &o.presenter().center().added()[0];
    assert!(prompt.subtitle.is_none());
    assert_eq!(prompt.body, "Pixel 8 is sending you https://example.org");
}

/// Changing the setting affects only offers made afterwards.
#[test]
fn test_policy_is_read_per_offer() {
    let switch = AutoAcceptSwitch::new(false);
    let o = orchestrator_with_switch(switch.clone());

    o.offer(single_file("before", "a.txt"), pixel());
    switch.set(true);
    o.offer(single_file("after", "b.txt"), pixel());

    assert_eq!(
        o.session("before").unwrap().state(),
        SessionState::PendingUserChoice
    );
    assert_eq!(
        o.session("after").unwrap().state(),
        SessionState::AutoAccepted
    );
    assert_eq!(o.transport().consents(), vec![("after".to_string(), true)]);

    switch.set(false);
    assert_eq!(
        o.user_response("before", UserAction::Accept),
        Some(SessionState::Accepted)
    );
}

/// A denied notification permission does not stop prompts from being posted.
#[test]
fn test_permission_denied_still_posts() {
    let o = Orchestrator::new(
        common::RecordingTransport::default(),
        NotificationPresenter::new(common::RecordingCenter::denying()),
        AutoAcceptSwitch::new(false),
    );
    assert!(o.presenter().is_degraded());

    o.offer(single_file("t10", "a.txt"), pixel());
    assert_eq!(o.presenter().center().added().len(), 1);
}

/// Shutdown withdraws everything but keeps sessions for the transport.
#[test]
fn test_shutdown() {
    let o = orchestrator(false);
    o.offer(single_file("t11", "a.txt"), pixel());
    o.shutdown();

    assert_eq!(
        o.presenter().center().ops().last(),
        Some(&CenterOp::RemovedAll)
    );
    assert_eq!(o.active_count(), 1);
}
