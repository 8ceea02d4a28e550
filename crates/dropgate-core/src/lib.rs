//! # Dropgate Core Library
//!
//! `dropgate-core` decides what happens to files and text that nearby
//! devices try to send to this machine. The transport that discovers peers
//! and moves the bytes lives elsewhere; this crate sits between it and the
//! user.
//!
//! ## Features
//!
//! - **Consent prompts**: Accept/Decline notifications with the peer's pin code
//! - **Auto-accept**: Optional policy that skips the prompt for new offers
//! - **Exactly-once resolution**: Races between user answers and transport
//!   completions resolve deterministically
//! - **Friendly errors**: Transport failures become short user-facing notices
//!
//! ## Modules
//!
//! - [`config`] - Configuration management and the live auto-accept switch
//! - [`events`] - Scriptable events and per-source event pumps
//! - [`notification`] - Notification presenter and platform seam
//! - [`orchestrator`] - The consent state machine
//! - [`policy`] - Auto-accept decision
//! - [`registry`] - Active session registry
//! - [`session`] - Transfer sessions and metadata
//! - [`translate`] - Transport error wording
//! - [`transport`] - Transport seam and error taxonomy
//!
//! ## Example
//!
//! ```rust,ignore
//! use dropgate_core::config::{AutoAcceptSwitch, Config};
//! use dropgate_core::notification::{NotificationPresenter, TracingNotificationCenter};
//! use dropgate_core::orchestrator::Orchestrator;
//! use dropgate_core::transport::ChannelTransport;
//!
//! let config = Config::load()?;
//! let (transport, mut decisions) = ChannelTransport::new();
//! let orchestrator = Orchestrator::new(
//!     transport,
//!     NotificationPresenter::new(TracingNotificationCenter),
//!     AutoAcceptSwitch::from_config(&config),
//! );
//! orchestrator.offer(metadata, device);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod events;
pub mod notification;
pub mod orchestrator;
pub mod policy;
pub mod registry;
pub mod session;
pub mod translate;
pub mod transport;

pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, UserAction};
pub use session::{FileInfo, RemoteDeviceInfo, SessionState, TransferMetadata, TransferSession};
pub use transport::{ConsentTransport, TransferError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
