//! Replay command implementation.
//!
//! Feeds a scripted sequence of transport and user events through the
//! orchestrator, printing notifications as they would appear and the
//! consent decisions the transport would receive.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::io::AsyncReadExt;

use dropgate_core::config::AutoAcceptSwitch;
use dropgate_core::events::{parse_script, Event, EventPumps};
use dropgate_core::notification::NotificationPresenter;
use dropgate_core::transport::{ChannelTransport, ConsentDecision};
use dropgate_core::Orchestrator;

use super::ReplayArgs;
use crate::ui::{format_size, TerminalNotificationCenter};

/// Run the replay command.
pub async fn run(args: ReplayArgs) -> Result<()> {
    let config = super::load_config();
    let input = read_script(&args.script).await?;
    let events = parse_script(&input)?;

    let switch = AutoAcceptSwitch::from_config(&config);
    if let Some(enabled) = args.auto_accept {
        switch.set(enabled);
    }

    let show_notifications = !args.quiet && !args.json;
    let (transport, mut decisions) = ChannelTransport::new();
    let presenter = NotificationPresenter::new(TerminalNotificationCenter::new(!show_notifications))
        .with_sound(config.notifications.sound);
    let orchestrator = Arc::new(Orchestrator::new(transport, presenter, switch.clone()));

    let offered_bytes: u64 = events
        .iter()
        .filter_map(|e| match e {
            Event::Offer { transfer, .. } => Some(transfer.total_size()),
            _ => None,
        })
        .sum();
    let event_count = events.len();

    if show_notifications {
        println!();
        println!("Dropgate v{}", dropgate_core::VERSION);
        println!("{}", "-".repeat(37));
        println!();
        println!("  Device:      {}", config.general.device_name);
        println!(
            "  Auto-accept: {}",
            if switch.is_enabled() { "on" } else { "off" }
        );
        println!("  Events:      {}", event_count);
        println!();
    }

    if args.concurrent {
        let (senders, receivers) = EventPumps::channels();
        let pumps = EventPumps::spawn(Arc::clone(&orchestrator), receivers);
        for event in events {
            let tx = if event.is_user_event() {
                &senders.user
            } else {
                &senders.transport
            };
            tx.send(event)
                .await
                .map_err(|_| anyhow!("event pump stopped early"))?;
        }
        drop(senders);
        pumps.join().await?;
    } else {
        for event in events {
            event.apply(&orchestrator);
        }
    }

    let pending: Vec<String> = orchestrator.registry().ids();
    orchestrator.shutdown();

    let mut consents: Vec<ConsentDecision> = Vec::new();
    while let Ok(decision) = decisions.try_recv() {
        consents.push(decision);
    }

    if args.json {
        let output = serde_json::json!({
            "events": event_count,
            "offered_bytes": offered_bytes,
            "consents": consents,
            "unresolved": pending,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  Replayed {} events ({} offered)", event_count, format_size(offered_bytes));
    for decision in &consents {
        println!(
            "  {} {}",
            if decision.accept { "accepted" } else { "declined" },
            decision.transfer_id
        );
    }
    if !pending.is_empty() {
        println!("  Still active: {}", pending.join(", "));
    }
    println!();

    Ok(())
}

async fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("failed to read script from stdin")?;
        return Ok(input);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read script {}", path.display()))
}
