use alloc::vec::Vec;

use crate::*;

/// A cue together with its delay, relative to the moment playback starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlannedCue {
    pub delay: Millis,
    pub cue: Cue,
}

/// Every timed signal of one playback pass, computed up front and sorted by delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackPlan {
    cues: Vec<PlannedCue>,
}

impl PlaybackPlan {
    /// Plans a full pass over `sequence`, always starting again from the first step.
    ///
    /// Step `i` lights up at `i * step` and goes dark [`HIGHLIGHT_GAP`] before the next step starts. Input is opened
    /// once the last step has had its full duration.
    pub fn new(sequence: &[ColorId], step: Millis) -> Self {
        if step <= HIGHLIGHT_GAP {
            log::warn!(
                "step duration {} does not leave room for the highlight gap {}",
                step,
                HIGHLIGHT_GAP
            );
        }
        let lit_for = step.saturating_sub(HIGHLIGHT_GAP);

        let mut cues = Vec::with_capacity(sequence.len() * 2 + 1);
        let mut start: Millis = 0;
        for &color in sequence {
            cues.push(PlannedCue {
                delay: start,
                cue: Cue::Highlight(color),
            });
            cues.push(PlannedCue {
                delay: start.saturating_add(lit_for),
                cue: Cue::Unhighlight(color),
            });
            start = start.saturating_add(step);
        }
        cues.push(PlannedCue {
            delay: start,
            cue: Cue::BeginInput,
        });

        // stable, keeps the unhighlight ahead of a highlight due at the same instant
        cues.sort_by_key(|planned| planned.delay);

        Self { cues }
    }

    /// Delay after which the player may start answering.
    pub fn total_duration(&self) -> Millis {
        self.cues.last().map_or(0, |planned| planned.delay)
    }

    pub fn cues(&self) -> &[PlannedCue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

impl IntoIterator for PlaybackPlan {
    type Item = PlannedCue;
    type IntoIter = alloc::vec::IntoIter<PlannedCue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.into_iter()
    }
}
