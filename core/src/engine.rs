use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    AwaitingDifficulty,
    Playback,
    AwaitingInput,
    GameOver,
}

impl GamePhase {
    /// Phase implied by the engine flags. The pause between a finished round and the next playback counts as
    /// playback.
    pub const fn derive(
        difficulty: Option<Difficulty>,
        is_animating: bool,
        is_player_turn: bool,
        game_over: bool,
    ) -> Self {
        if game_over {
            Self::GameOver
        } else if difficulty.is_none() {
            Self::AwaitingDifficulty
        } else if is_player_turn && !is_animating {
            Self::AwaitingInput
        } else {
            Self::Playback
        }
    }

    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    pub const fn accepts_difficulty(self) -> bool {
        matches!(self, Self::AwaitingDifficulty | Self::GameOver)
    }
}

/// Input from the player or the host scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    ColorPressed(ColorId),
    DifficultySelected(Difficulty),
    SchemeSelected(ColorScheme),
    ResetPressed,
    TimerFired(Timer),
}

/// Side effect the host has to carry out on behalf of the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Call [`GameEngine::fire`] with `timer` once `delay` has elapsed.
    Schedule { delay: Millis, timer: Timer },
    /// Drop every pending timer, they would be ignored anyway.
    CancelTimers,
    /// Light up a button. Also reflected by [`GameEngine::lit`], so hosts that re-render from engine state after
    /// every event may ignore this and [`Unhighlight`](Self::Unhighlight).
    Highlight(ColorId),
    Unhighlight(ColorId),
    /// Persist a new high score.
    StoreHighScore(Score),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    Ignored,
    Accepted,
    RoundComplete,
    Mismatch,
}

impl PressOutcome {
    pub const fn has_update(self) -> bool {
        use PressOutcome::*;
        match self {
            Ignored => false,
            Accepted => true,
            RoundComplete => true,
            Mismatch => true,
        }
    }
}

/// The whole game session: target sequence, player input, score and the phase flags.
///
/// Every operation takes an output buffer of [`Command`]s instead of touching timers, storage or the screen.
#[derive(Clone, Debug)]
pub struct GameEngine<G> {
    generator: G,
    scheme: ColorScheme,
    difficulty: Option<Difficulty>,
    sequence: Vec<ColorId>,
    user_input: Vec<ColorId>,
    score: Score,
    high_score: Score,
    is_animating: bool,
    is_player_turn: bool,
    game_over: bool,
    lit: Option<ColorId>,
    epoch: Epoch,
}

impl<G: SequenceGenerator> GameEngine<G> {
    pub fn new(generator: G, high_score: Score) -> Self {
        Self {
            generator,
            scheme: Default::default(),
            difficulty: None,
            sequence: Vec::new(),
            user_input: Vec::new(),
            score: 0,
            high_score,
            is_animating: false,
            is_player_turn: false,
            game_over: false,
            lit: None,
            epoch: 0,
        }
    }

    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn phase(&self) -> GamePhase {
        GamePhase::derive(
            self.difficulty,
            self.is_animating,
            self.is_player_turn,
            self.game_over,
        )
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn high_score(&self) -> Score {
        self.high_score
    }

    pub fn sequence(&self) -> &[ColorId] {
        &self.sequence
    }

    pub fn user_input(&self) -> &[ColorId] {
        &self.user_input
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn palette(&self) -> &'static Palette {
        self.scheme.palette()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Color currently lit by playback, if any.
    pub fn lit(&self) -> Option<ColorId> {
        self.lit
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn step_duration(&self) -> Millis {
        Difficulty::step_duration(self.difficulty)
    }

    /// Consuming form of [`handle`](Self::handle): `(state, event) -> (state, commands)`.
    pub fn step(mut self, event: Event) -> (Self, Vec<Command>) {
        let mut out = Vec::new();
        self.handle(event, &mut out);
        (self, out)
    }

    /// Dispatches one event, returns whether anything observable changed.
    pub fn handle(&mut self, event: Event, out: &mut Vec<Command>) -> bool {
        use Event::*;
        match event {
            ColorPressed(color) => self.submit_color(color, out).has_update(),
            DifficultySelected(difficulty) => self.select_difficulty(difficulty, out),
            SchemeSelected(scheme) => self.change_scheme(scheme),
            ResetPressed => {
                self.reset(out);
                true
            }
            TimerFired(timer) => self.fire(timer, out),
        }
    }

    /// Starts a new game. Only possible before the first game or after losing one.
    pub fn select_difficulty(&mut self, difficulty: Difficulty, out: &mut Vec<Command>) -> bool {
        let phase = self.phase();
        if !phase.accepts_difficulty() {
            log::debug!("difficulty {} ignored during {:?}", difficulty, phase);
            return false;
        }

        self.discard_pending(out);
        self.clear_session();
        self.difficulty = Some(difficulty);
        log::debug!("new game on {}", difficulty);

        self.append_step();
        self.start_playback(out);
        true
    }

    pub fn submit_color(&mut self, color: ColorId, out: &mut Vec<Command>) -> PressOutcome {
        let phase = self.phase();
        if !phase.accepts_input() {
            log::trace!("{} ignored during {:?}", color, phase);
            return PressOutcome::Ignored;
        }

        self.user_input.push(color);
        let index = self.user_input.len() - 1;

        if self.sequence.get(index) != Some(&color) {
            log::debug!(
                "mismatch at step {}: expected {:?}, got {}",
                index,
                self.sequence.get(index),
                color
            );
            self.game_over = true;
            self.is_player_turn = false;
            if self.score > self.high_score {
                self.high_score = self.score;
                out.push(Command::StoreHighScore(self.score));
            }
            return PressOutcome::Mismatch;
        }

        if self.user_input.len() < self.sequence.len() {
            return PressOutcome::Accepted;
        }

        self.score = self.score.saturating_add(1);
        self.user_input.clear();
        self.is_player_turn = false;
        log::debug!("round complete, score {}", self.score);
        out.push(Command::Schedule {
            delay: ROUND_DELAY,
            timer: self.timer(Cue::NextRound),
        });
        PressOutcome::RoundComplete
    }

    /// Abandons the current game and goes back to difficulty selection. The high score is kept.
    pub fn reset(&mut self, out: &mut Vec<Command>) {
        self.discard_pending(out);
        self.clear_session();
        self.difficulty = None;
        log::debug!("game reset");
    }

    /// Switches the palette used for display and future draws. Colors already in the sequence stay valid since
    /// every scheme maps the same colors.
    pub fn change_scheme(&mut self, scheme: ColorScheme) -> bool {
        if self.scheme == scheme {
            return false;
        }
        debug_assert!(self.sequence.iter().all(|&color| scheme.contains(color)));
        log::debug!("color scheme: {}", scheme);
        self.scheme = scheme;
        true
    }

    /// Applies a fired timer. Timers scheduled before the last reset are ignored.
    pub fn fire(&mut self, timer: Timer, out: &mut Vec<Command>) -> bool {
        if timer.epoch != self.epoch {
            log::trace!("stale timer {:?}, current epoch {}", timer, self.epoch);
            return false;
        }

        match timer.cue {
            Cue::Highlight(color) => {
                self.lit = Some(color);
                out.push(Command::Highlight(color));
                true
            }
            Cue::Unhighlight(color) => {
                if self.lit == Some(color) {
                    self.lit = None;
                }
                out.push(Command::Unhighlight(color));
                true
            }
            Cue::BeginInput => {
                if !self.is_animating {
                    return false;
                }
                self.is_animating = false;
                self.is_player_turn = true;
                self.lit = None;
                true
            }
            Cue::NextRound => {
                if self.game_over || self.difficulty.is_none() {
                    return false;
                }
                self.append_step();
                self.start_playback(out);
                true
            }
        }
    }

    fn timer(&self, cue: Cue) -> Timer {
        Timer {
            epoch: self.epoch,
            cue,
        }
    }

    fn discard_pending(&mut self, out: &mut Vec<Command>) {
        self.epoch = self.epoch.wrapping_add(1);
        out.push(Command::CancelTimers);
    }

    fn clear_session(&mut self) {
        self.sequence.clear();
        self.user_input.clear();
        self.score = 0;
        self.is_animating = false;
        self.is_player_turn = false;
        self.game_over = false;
        self.lit = None;
    }

    fn append_step(&mut self) -> ColorId {
        let color = self.generator.next_color(self.scheme);
        self.sequence.push(color);
        color
    }

    fn start_playback(&mut self, out: &mut Vec<Command>) {
        self.is_animating = true;
        self.is_player_turn = false;
        self.lit = None;

        let plan = PlaybackPlan::new(&self.sequence, self.step_duration());
        log::debug!(
            "playing {} steps over {}ms",
            self.sequence.len(),
            plan.total_duration()
        );
        let epoch = self.epoch;
        out.extend(plan.into_iter().map(|planned| Command::Schedule {
            delay: planned.delay,
            timer: Timer {
                epoch,
                cue: planned.cue,
            },
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ColorId::*;

    type Engine = GameEngine<FixedSequenceGenerator>;

    fn engine(script: &[ColorId]) -> Engine {
        GameEngine::new(FixedSequenceGenerator::new(script), 0)
    }

    /// Fires every scheduled timer in `commands`, in order, including ones scheduled while firing.
    fn run_timers(engine: &mut Engine, commands: Vec<Command>) -> Vec<Command> {
        let mut shown = Vec::new();
        let mut pending: Vec<_> = commands;
        while !pending.is_empty() {
            let mut next = Vec::new();
            for command in pending {
                match command {
                    Command::Schedule { timer, .. } => {
                        engine.fire(timer, &mut next);
                    }
                    other => shown.push(other),
                }
            }
            pending = next;
        }
        shown
    }

    fn start(engine: &mut Engine, difficulty: Difficulty) -> Vec<Command> {
        let mut out = Vec::new();
        assert!(engine.select_difficulty(difficulty, &mut out));
        out
    }

    fn start_and_play(engine: &mut Engine, difficulty: Difficulty) {
        let out = start(engine, difficulty);
        run_timers(engine, out);
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    fn press(engine: &mut Engine, color: ColorId) -> (PressOutcome, Vec<Command>) {
        let mut out = Vec::new();
        let outcome = engine.submit_color(color, &mut out);
        (outcome, out)
    }

    #[test]
    fn phase_is_derived_from_flags() {
        use GamePhase::*;
        let hard = Some(Difficulty::Hard);
        assert_eq!(GamePhase::derive(None, false, false, false), AwaitingDifficulty);
        assert_eq!(GamePhase::derive(hard, true, false, false), Playback);
        assert_eq!(GamePhase::derive(hard, false, false, false), Playback);
        assert_eq!(GamePhase::derive(hard, false, true, false), AwaitingInput);
        assert_eq!(GamePhase::derive(hard, false, true, true), GameOver);
    }

    #[test]
    fn selecting_difficulty_generates_first_step_and_plays_it() {
        let mut engine = engine(&[Red]);

        let out = start(&mut engine, Difficulty::Hard);

        assert_eq!(engine.sequence(), [Red]);
        assert_eq!(engine.phase(), GamePhase::Playback);
        assert_eq!(engine.step_duration(), 300);
        assert_eq!(out[0], Command::CancelTimers);
        assert!(out.contains(&Command::Schedule {
            delay: 300,
            timer: Timer {
                epoch: engine.epoch(),
                cue: Cue::BeginInput,
            },
        }));

        let shown = run_timers(&mut engine, out);
        assert_eq!(shown, [Command::CancelTimers, Command::Highlight(Red), Command::Unhighlight(Red)]);
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn presses_during_playback_are_ignored() {
        let mut engine = engine(&[Red]);
        start(&mut engine, Difficulty::Normal);

        let (outcome, out) = press(&mut engine, Red);

        assert_eq!(outcome, PressOutcome::Ignored);
        assert!(out.is_empty());
        assert!(engine.user_input().is_empty());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.sequence(), [Red]);
    }

    #[test]
    fn presses_before_any_game_are_ignored() {
        let mut engine = engine(&[Red]);
        assert_eq!(engine.phase(), GamePhase::default());

        let (outcome, out) = press(&mut engine, Red);

        assert_eq!(outcome, PressOutcome::Ignored);
        assert!(out.is_empty());
        assert!(engine.user_input().is_empty());
        assert!(engine.sequence().is_empty());
        assert_eq!(engine.phase(), GamePhase::AwaitingDifficulty);
    }

    #[test]
    fn presses_between_rounds_are_ignored() {
        let mut engine = engine(&[Red, Blue]);
        start_and_play(&mut engine, Difficulty::Normal);
        let (outcome, next_round) = press(&mut engine, Red);
        assert_eq!(outcome, PressOutcome::RoundComplete);
        assert_eq!(engine.phase(), GamePhase::Playback);

        let (outcome, out) = press(&mut engine, Red);

        assert_eq!(outcome, PressOutcome::Ignored);
        assert!(out.is_empty());
        assert!(engine.user_input().is_empty());
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.sequence(), [Red]);

        run_timers(&mut engine, next_round);
        assert_eq!(engine.sequence(), [Red, Blue]);
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn completing_a_round_scores_and_extends_sequence() {
        let mut engine = engine(&[Red, Blue]);
        start_and_play(&mut engine, Difficulty::Easy);

        let (outcome, out) = press(&mut engine, Red);

        assert_eq!(outcome, PressOutcome::RoundComplete);
        assert_eq!(engine.score(), 1);
        assert!(engine.user_input().is_empty());
        assert_eq!(engine.phase(), GamePhase::Playback);
        assert_eq!(
            out,
            [Command::Schedule {
                delay: ROUND_DELAY,
                timer: Timer {
                    epoch: engine.epoch(),
                    cue: Cue::NextRound,
                },
            }]
        );

        let shown = run_timers(&mut engine, out);
        assert_eq!(engine.sequence(), [Red, Blue]);
        assert_eq!(
            shown,
            [
                Command::Highlight(Red),
                Command::Unhighlight(Red),
                Command::Highlight(Blue),
                Command::Unhighlight(Blue),
            ]
        );
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn partial_match_keeps_waiting_for_input() {
        let mut engine = engine(&[Red, Blue]);
        start_and_play(&mut engine, Difficulty::Normal);
        let (_, out) = press(&mut engine, Red);
        run_timers(&mut engine, out);

        let (outcome, out) = press(&mut engine, Red);

        assert_eq!(outcome, PressOutcome::Accepted);
        assert!(out.is_empty());
        assert_eq!(engine.user_input(), [Red]);
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn mismatch_ends_game_and_keeps_attempt() {
        let mut engine = engine(&[Red, Blue]);
        start_and_play(&mut engine, Difficulty::Normal);
        let (_, out) = press(&mut engine, Red);
        run_timers(&mut engine, out);

        press(&mut engine, Red);
        let (outcome, out) = press(&mut engine, Green);

        assert_eq!(outcome, PressOutcome::Mismatch);
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert!(engine.is_game_over());
        assert_eq!(engine.user_input(), [Red, Green]);
        assert_eq!(engine.sequence(), [Red, Blue]);
        assert_eq!(engine.high_score(), 1);
        assert_eq!(out, [Command::StoreHighScore(1)]);
    }

    #[test]
    fn mismatch_below_high_score_leaves_it_alone() {
        let mut engine = GameEngine::new(FixedSequenceGenerator::new([Red]), 3);
        start_and_play(&mut engine, Difficulty::Normal);

        let (outcome, out) = press(&mut engine, Yellow);

        assert_eq!(outcome, PressOutcome::Mismatch);
        assert_eq!(engine.high_score(), 3);
        assert!(out.is_empty());
    }

    #[test]
    fn presses_after_game_over_are_ignored() {
        let mut engine = engine(&[Red]);
        start_and_play(&mut engine, Difficulty::Normal);
        press(&mut engine, Blue);

        let (outcome, _) = press(&mut engine, Red);

        assert_eq!(outcome, PressOutcome::Ignored);
        assert_eq!(engine.user_input(), [Blue]);
    }

    #[test]
    fn difficulty_is_locked_while_playing() {
        let mut engine = engine(&[Red]);
        start_and_play(&mut engine, Difficulty::Easy);

        let mut out = Vec::new();
        assert!(!engine.select_difficulty(Difficulty::Hard, &mut out));
        assert!(out.is_empty());
        assert_eq!(engine.difficulty(), Some(Difficulty::Easy));
    }

    #[test]
    fn new_game_after_game_over_starts_fresh() {
        let mut engine = engine(&[Red, Blue, Green]);
        start_and_play(&mut engine, Difficulty::Normal);
        press(&mut engine, Yellow);

        let out = start(&mut engine, Difficulty::Hard);

        assert_eq!(engine.score(), 0);
        assert!(!engine.is_game_over());
        assert!(engine.user_input().is_empty());
        assert_eq!(engine.sequence(), [Blue]);
        assert_eq!(engine.difficulty(), Some(Difficulty::Hard));
        assert_eq!(out[0], Command::CancelTimers);
    }

    #[test]
    fn reset_from_any_phase_returns_to_difficulty_selection() {
        let mut engine = GameEngine::new(FixedSequenceGenerator::new([Red, Blue]), 9);
        start_and_play(&mut engine, Difficulty::Normal);
        press(&mut engine, Red);

        let mut out = Vec::new();
        engine.reset(&mut out);

        assert_eq!(out, [Command::CancelTimers]);
        assert_eq!(engine.phase(), GamePhase::AwaitingDifficulty);
        assert_eq!(engine.score(), 0);
        assert!(engine.sequence().is_empty());
        assert!(engine.user_input().is_empty());
        assert!(!engine.is_game_over());
        assert_eq!(engine.difficulty(), None);
        assert_eq!(engine.high_score(), 9);
    }

    #[test]
    fn timers_from_before_a_reset_are_ignored() {
        let mut engine = engine(&[Red]);
        let stale = start(&mut engine, Difficulty::Normal);
        engine.reset(&mut Vec::new());

        let shown = run_timers(&mut engine, stale);

        assert_eq!(shown, [Command::CancelTimers]);
        assert_eq!(engine.phase(), GamePhase::AwaitingDifficulty);
        assert_eq!(engine.lit(), None);
    }

    #[test]
    fn pending_next_round_is_dropped_by_a_new_game() {
        let mut engine = engine(&[Red, Blue, Green]);
        start_and_play(&mut engine, Difficulty::Normal);
        let (_, stale) = press(&mut engine, Red);
        engine.reset(&mut Vec::new());
        start(&mut engine, Difficulty::Easy);

        for command in stale {
            let Command::Schedule { timer, .. } = command else {
                panic!("expected a schedule, got {:?}", command);
            };
            let mut out = Vec::new();
            assert!(!engine.fire(timer, &mut out));
            assert!(out.is_empty());
        }

        assert_eq!(engine.sequence(), [Blue]);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.phase(), GamePhase::Playback);
    }

    #[test]
    fn highlight_tracks_lit_color() {
        let mut engine = engine(&[Green]);
        start(&mut engine, Difficulty::Normal);
        let epoch = engine.epoch();
        let mut out = Vec::new();

        engine.fire(Timer { epoch, cue: Cue::Highlight(Green) }, &mut out);
        assert_eq!(engine.lit(), Some(Green));

        engine.fire(Timer { epoch, cue: Cue::Unhighlight(Green) }, &mut out);
        assert_eq!(engine.lit(), None);
        assert_eq!(out, [Command::Highlight(Green), Command::Unhighlight(Green)]);
    }

    #[test]
    fn scheme_change_mid_game_keeps_sequence_valid() {
        let mut engine = engine(&[Yellow, Red]);
        start_and_play(&mut engine, Difficulty::Normal);

        assert!(engine.change_scheme(ColorScheme::Scheme2));
        assert!(!engine.change_scheme(ColorScheme::Scheme2));

        assert!(engine.sequence().iter().all(|&c| engine.scheme().contains(c)));
        assert_eq!(engine.palette()[3], (Yellow, "#fbc02d"));
        let (outcome, _) = press(&mut engine, Yellow);
        assert_eq!(outcome, PressOutcome::RoundComplete);
    }

    #[test]
    fn step_is_a_pure_transition() {
        let engine = engine(&[Red]);

        let (engine, out) = engine.step(Event::DifficultySelected(Difficulty::Hard));
        assert_eq!(engine.phase(), GamePhase::Playback);
        assert!(!out.is_empty());

        let (engine, out) = engine.step(Event::ColorPressed(Red));
        assert!(out.is_empty());
        assert!(engine.user_input().is_empty());

        let (engine, _) = engine.step(Event::ResetPressed);
        assert_eq!(engine.phase(), GamePhase::AwaitingDifficulty);
    }
}
