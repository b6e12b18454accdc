//! # pingme core library
//!
//! Core logic for pingme, a periodic "still awake?" check-in tool. The CLI
//! binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Check-in loop**: a blocking state machine ([`CheckinLoop`]) that
//!   sleeps an interval, emits an audible/visual ping, waits a bounded time
//!   for a console reply, and counts misses toward a threshold
//! - **Seams**: console input ([`ReplySource`]), audio ([`SoundPlayer`]),
//!   and notifications ([`Notifier`]) are traits, so the loop is testable
//!   without a terminal, a sound card, or a notification daemon
//! - **Config**: TOML at `~/.config/pingme/config.toml`, overridable per
//!   invocation by CLI flags
//!
//! Audio and notification delivery are best-effort throughout: failures are
//! logged via the `log` facade and never end a session.

pub mod checkin;
pub mod config;
pub mod cue;
pub mod error;
pub mod events;
pub mod notify;
pub mod reply;

pub use checkin::{CheckinLoop, CheckinState, EndReason};
pub use config::{Config, NotificationConfig, UnrecognizedPolicy};
pub use cue::{Cue, RodioPlayer, SoundPlayer};
pub use error::{AudioError, ConfigError, CoreError, NotifyError, Result};
pub use events::Event;
pub use notify::{DesktopNotifier, Notifier};
pub use reply::{classify_reply, Reply, ReplyOutcome, ReplySource, StdinReplySource};
