use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// What should happen when a scheduled timer fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    Highlight(ColorId),
    Unhighlight(ColorId),
    /// Playback finished, the player may answer.
    BeginInput,
    /// Post-success delay elapsed, extend the sequence and play it again.
    NextRound,
}

/// Scheduled cue, tagged with the engine epoch it was created in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub epoch: Epoch,
    pub cue: Cue,
}

/// Deterministic timer queue driven by a virtual clock.
///
/// Timers due at the same instant fire in the order they were scheduled.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Millis,
    next_seq: u64,
    pending: BTreeMap<(Millis, u64), Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Absolute time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.keys().next().map(|&(due, _)| due)
    }

    pub fn schedule(&mut self, delay: Millis, timer: Timer) {
        let due = self.now.saturating_add(delay);
        self.pending.insert((due, self.next_seq), timer);
        self.next_seq += 1;
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    /// Moves the clock forward by `elapsed` and returns every timer that became due, in firing order.
    pub fn advance(&mut self, elapsed: Millis) -> Vec<Timer> {
        self.now = self.now.saturating_add(elapsed);
        let mut due = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    /// Pops the single earliest timer if it is due by `until`, moving the clock to its due time.
    pub fn pop_due(&mut self, until: Millis) -> Option<Timer> {
        let entry = self.pending.first_entry()?;
        let due = entry.key().0;
        if due > until {
            return None;
        }
        self.now = self.now.max(due);
        Some(entry.remove())
    }

    /// Takes over the scheduling commands and hands back the ones meant for presentation or storage.
    pub fn apply(&mut self, commands: impl IntoIterator<Item = Command>) -> Vec<Command> {
        let mut rest = Vec::new();
        for command in commands {
            match command {
                Command::Schedule { delay, timer } => self.schedule(delay, timer),
                Command::CancelTimers => self.cancel_all(),
                other => rest.push(other),
            }
        }
        rest
    }

    /// Runs the clock forward by `elapsed`, firing due timers into `engine` one at a time so timers scheduled while
    /// firing are picked up in the same run.
    pub fn run<G: SequenceGenerator>(
        &mut self,
        engine: &mut GameEngine<G>,
        elapsed: Millis,
        out: &mut Vec<Command>,
    ) {
        let until = self.now.saturating_add(elapsed);
        while let Some(timer) = self.pop_due(until) {
            let mut commands = Vec::new();
            engine.fire(timer, &mut commands);
            out.extend(self.apply(commands));
        }
        self.now = until;
    }
}
