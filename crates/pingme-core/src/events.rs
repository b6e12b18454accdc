use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkin::EndReason;
use crate::reply::Reply;

/// Every state change in the check-in loop produces an Event.
/// The engine never prints; the CLI renders events as status lines or JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CheckinStarted {
        interval_secs: u64,
        max_misses: u32,
        at: DateTime<Utc>,
    },
    /// The audible/visual prompt for one cycle was emitted.
    PingEmitted {
        cycle: u32,
        message: String,
        at: DateTime<Utc>,
    },
    /// The loop is now waiting on console input.
    AwaitingReply {
        timeout_secs: u64,
        at: DateTime<Utc>,
    },
    ReplyReceived {
        /// Normalized (trimmed, lowercased) reply text.
        reply: String,
        classified: Reply,
        at: DateTime<Utc>,
    },
    /// No reply arrived within the per-cycle timeout.
    ReplyTimedOut {
        at: DateTime<Utc>,
    },
    MissRecorded {
        missed_pings: u32,
        max_misses: u32,
        at: DateTime<Utc>,
    },
    /// A positive reply reset the miss counter.
    CounterReset {
        at: DateTime<Utc>,
    },
    CheckinEnded {
        reason: EndReason,
        cycles: u32,
        at: DateTime<Utc>,
    },
}
