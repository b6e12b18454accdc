//! Reply classification and collection.
//!
//! Console input is read on one long-lived thread that feeds an mpsc
//! channel; the loop side waits on the channel with a timeout. The channel
//! is the single handoff point, so no per-cycle input thread is spawned and
//! none is abandoned when a cycle times out. A line that arrives after its
//! cycle gave up waiting is stale: it is drained and discarded at the start
//! of the next collection instead of answering a prompt it never saw.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Classification of a normalized reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply {
    Positive,
    Negative,
    Unrecognized,
}

/// Outcome of one reply collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A line of input arrived within the timeout (raw, not yet normalized).
    Received(String),
    /// No input arrived within the timeout.
    TimedOut,
}

/// Lowercase and trim a raw console reply.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Classify a raw console reply.
///
/// Case-insensitive, surrounding whitespace ignored: `" Y "` is positive.
pub fn classify_reply(raw: &str) -> Reply {
    match normalize(raw).as_str() {
        "yes" | "y" | "1" => Reply::Positive,
        "no" | "n" | "0" => Reply::Negative,
        _ => Reply::Unrecognized,
    }
}

/// Source of console replies, one per check-in cycle.
pub trait ReplySource {
    /// Wait up to `timeout` for the next reply.
    ///
    /// Never blocks the caller beyond `timeout`.
    fn collect(&mut self, timeout: Duration) -> ReplyOutcome;
}

/// Drain stale lines, then wait up to `timeout` for a fresh one.
///
/// A closed channel (stdin EOF) yields `TimedOut` immediately: there is no
/// reply coming and nothing to wait for.
fn recv_bounded(rx: &Receiver<String>, timeout: Duration) -> ReplyOutcome {
    loop {
        match rx.try_recv() {
            Ok(stale) => log::debug!("discarding stale input: {stale:?}"),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }
    match rx.recv_timeout(timeout) {
        Ok(line) => ReplyOutcome::Received(line),
        Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => ReplyOutcome::TimedOut,
    }
}

/// Reads stdin lines on a single background thread for the process lifetime.
pub struct StdinReplySource {
    rx: Receiver<String>,
}

impl StdinReplySource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("pingme-stdin".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
            });
        if let Err(e) = spawned {
            // Receiver sees a closed channel and every collect times out.
            log::warn!("failed to spawn stdin reader thread: {e}");
        }
        Self { rx }
    }
}

impl Default for StdinReplySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplySource for StdinReplySource {
    fn collect(&mut self, timeout: Duration) -> ReplyOutcome {
        recv_bounded(&self.rx, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Instant;

    #[test]
    fn classify_positive_forms() {
        assert_eq!(classify_reply("yes"), Reply::Positive);
        assert_eq!(classify_reply("y"), Reply::Positive);
        assert_eq!(classify_reply("1"), Reply::Positive);
    }

    #[test]
    fn classify_negative_forms() {
        assert_eq!(classify_reply("no"), Reply::Negative);
        assert_eq!(classify_reply("n"), Reply::Negative);
        assert_eq!(classify_reply("0"), Reply::Negative);
    }

    #[test]
    fn classify_trims_and_lowercases() {
        assert_eq!(classify_reply(" Y "), Reply::Positive);
        assert_eq!(classify_reply("\tYES\n"), Reply::Positive);
        assert_eq!(classify_reply("  No"), Reply::Negative);
    }

    #[test]
    fn classify_anything_else_is_unrecognized() {
        assert_eq!(classify_reply("maybe"), Reply::Unrecognized);
        assert_eq!(classify_reply(""), Reply::Unrecognized);
        assert_eq!(classify_reply("yess"), Reply::Unrecognized);
        assert_eq!(classify_reply("y e s"), Reply::Unrecognized);
    }

    #[test]
    fn recv_bounded_times_out_within_bound() {
        let (tx, rx) = mpsc::channel::<String>();
        let start = Instant::now();
        let outcome = recv_bounded(&rx, Duration::from_millis(50));
        assert_eq!(outcome, ReplyOutcome::TimedOut);
        assert!(start.elapsed() < Duration::from_secs(5));
        drop(tx);
    }

    #[test]
    fn recv_bounded_returns_immediately_on_closed_channel() {
        let (tx, rx) = mpsc::channel::<String>();
        drop(tx);
        let outcome = recv_bounded(&rx, Duration::from_secs(30));
        assert_eq!(outcome, ReplyOutcome::TimedOut);
    }

    #[test]
    fn recv_bounded_receives_fresh_line() {
        let (tx, rx) = mpsc::channel::<String>();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            let _ = tx.send("fresh".to_string());
        });
        let outcome = recv_bounded(&rx, Duration::from_secs(5));
        assert_eq!(outcome, ReplyOutcome::Received("fresh".to_string()));
    }

    #[test]
    fn recv_bounded_discards_stale_lines() {
        let (tx, rx) = mpsc::channel::<String>();
        // Simulate a reply that arrived after its cycle had already timed out.
        tx.send("stale".to_string()).unwrap();
        tx.send("staler".to_string()).unwrap();
        let outcome = recv_bounded(&rx, Duration::from_millis(20));
        assert_eq!(outcome, ReplyOutcome::TimedOut);
    }

    proptest! {
        #[test]
        fn classify_ignores_case_and_surrounding_whitespace(
            word in prop::sample::select(vec!["yes", "y", "1", "no", "n", "0", "maybe", "ok"]),
            pre in "[ \t]{0,3}",
            post in "[ \t]{0,3}",
            upper in any::<bool>(),
        ) {
            let cased = if upper { word.to_uppercase() } else { word.to_string() };
            let decorated = format!("{pre}{cased}{post}");
            prop_assert_eq!(classify_reply(&decorated), classify_reply(word));
        }
    }
}
