//! Check-in loop engine.
//!
//! The engine is a blocking state machine. It owns no I/O of its own:
//! console input, audio, and notifications come in through the
//! `ReplySource`, `SoundPlayer`, and `Notifier` seams, and every state
//! change goes out as an [`Event`] through the caller's callback.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Initialized -> {Waiting -> Prompting -> AwaitingReply -> Evaluating}* -> Finalized
//! ```
//!
//! One `missed_pings` counter drives termination: a positive reply resets
//! it, a negative reply or a timeout increments it, and the loop ends once
//! it reaches `max_misses`. An unrecognized reply either counts as a miss
//! or aborts the loop, per [`UnrecognizedPolicy`].

use std::thread;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{Config, UnrecognizedPolicy};
use crate::cue::{Cue, SoundPlayer};
use crate::events::Event;
use crate::notify::Notifier;
use crate::reply::{classify_reply, normalize, Reply, ReplyOutcome, ReplySource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinState {
    Idle,
    Initialized,
    Waiting,
    Prompting,
    AwaitingReply,
    Evaluating,
    Finalized,
}

/// Why the loop ended. Both reasons are normal completion, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// `missed_pings` reached `max_misses`.
    MissLimitReached,
    /// An unrecognized reply arrived under the `abort` policy.
    UnrecognizedReply,
}

/// Core check-in loop.
pub struct CheckinLoop<S, P, N> {
    config: Config,
    source: S,
    player: P,
    notifier: N,
    state: CheckinState,
    missed_pings: u32,
    cycles: u32,
}

impl<S: ReplySource, P: SoundPlayer, N: Notifier> CheckinLoop<S, P, N> {
    pub fn new(config: Config, source: S, player: P, notifier: N) -> Self {
        Self {
            config,
            source,
            player,
            notifier,
            state: CheckinState::Idle,
            missed_pings: 0,
            cycles: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CheckinState {
        self.state
    }

    pub fn missed_pings(&self) -> u32 {
        self.missed_pings
    }

    /// Completed prompt cycles.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ── Loop ─────────────────────────────────────────────────────────

    /// Run the loop to completion, emitting every event to `on_event`.
    ///
    /// Blocks the calling thread for the whole session; returns the
    /// termination reason. `finalize` runs exactly once.
    pub fn run(&mut self, mut on_event: impl FnMut(&Event)) -> EndReason {
        self.initialize(&mut on_event);
        loop {
            if let Some(reason) = self.run_cycle(&mut on_event) {
                self.finalize(reason, &mut on_event);
                return reason;
            }
        }
    }

    fn initialize(&mut self, on_event: &mut impl FnMut(&Event)) {
        self.state = CheckinState::Initialized;
        on_event(&Event::CheckinStarted {
            interval_secs: self.config.interval_secs,
            max_misses: self.config.max_misses,
            at: Utc::now(),
        });
        self.player.play(Cue::Startup);
    }

    /// One wait -> prompt -> await-reply -> evaluate cycle.
    ///
    /// Returns the end reason once the loop should stop.
    fn run_cycle(&mut self, on_event: &mut impl FnMut(&Event)) -> Option<EndReason> {
        self.state = CheckinState::Waiting;
        thread::sleep(Duration::from_secs(self.config.interval_secs));

        self.state = CheckinState::Prompting;
        self.cycles += 1;
        on_event(&Event::PingEmitted {
            cycle: self.cycles,
            message: self.config.message.clone(),
            at: Utc::now(),
        });
        self.player.play(Cue::Ping);
        self.notifier.notify(&self.config.notification);

        self.state = CheckinState::AwaitingReply;
        on_event(&Event::AwaitingReply {
            timeout_secs: self.config.reply_timeout_secs,
            at: Utc::now(),
        });
        let outcome = self
            .source
            .collect(Duration::from_secs(self.config.reply_timeout_secs));

        self.state = CheckinState::Evaluating;
        self.evaluate(outcome, on_event)
    }

    fn evaluate(
        &mut self,
        outcome: ReplyOutcome,
        on_event: &mut impl FnMut(&Event),
    ) -> Option<EndReason> {
        match outcome {
            ReplyOutcome::TimedOut => {
                on_event(&Event::ReplyTimedOut { at: Utc::now() });
                self.record_miss(on_event)
            }
            ReplyOutcome::Received(raw) => {
                let classified = classify_reply(&raw);
                on_event(&Event::ReplyReceived {
                    reply: normalize(&raw),
                    classified,
                    at: Utc::now(),
                });
                match classified {
                    Reply::Positive => {
                        self.missed_pings = 0;
                        on_event(&Event::CounterReset { at: Utc::now() });
                        None
                    }
                    Reply::Negative => self.record_miss(on_event),
                    Reply::Unrecognized => match self.config.unrecognized_policy {
                        UnrecognizedPolicy::CountAsMiss => self.record_miss(on_event),
                        UnrecognizedPolicy::Abort => {
                            self.player.play(Cue::Error);
                            Some(EndReason::UnrecognizedReply)
                        }
                    },
                }
            }
        }
    }

    fn record_miss(&mut self, on_event: &mut impl FnMut(&Event)) -> Option<EndReason> {
        self.missed_pings += 1;
        on_event(&Event::MissRecorded {
            missed_pings: self.missed_pings,
            max_misses: self.config.max_misses,
            at: Utc::now(),
        });
        (self.missed_pings >= self.config.max_misses).then_some(EndReason::MissLimitReached)
    }

    fn finalize(&mut self, reason: EndReason, on_event: &mut impl FnMut(&Event)) {
        self.state = CheckinState::Finalized;
        on_event(&Event::CheckinEnded {
            reason,
            cycles: self.cycles,
            at: Utc::now(),
        });
        self.player.play(Cue::End);
    }
}
