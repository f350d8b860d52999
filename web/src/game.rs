use crate::storage::LocalStore;
use crate::utils::*;
use gloo::timers::callback::Timeout;
use memoria_core as game;
use game::{ColorId, ColorScheme, Command, Cue, Difficulty, Event, GamePhase, Timer};
use yew::prelude::*;

impl StorageKey for ColorScheme {
    const KEY: &'static str = "memoria:scheme";
}

const fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Normal => "Normal",
        Difficulty::Hard => "Hard",
    }
}

const fn scheme_label(scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Default => "Default",
        ColorScheme::Scheme1 => "Colors 1",
        ColorScheme::Scheme2 => "Colors 2",
    }
}

const fn phase_class(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::AwaitingDifficulty => "idle",
        GamePhase::Playback => "playback",
        GamePhase::AwaitingInput => "input",
        GamePhase::GameOver => "game-over",
    }
}

fn color_button_class(color: ColorId, lit: Option<ColorId>) -> Classes {
    classes!("button", (lit == Some(color)).then_some("active"))
}

#[derive(Properties, Debug, Clone, PartialEq, Default)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub seed: Option<u64>,
    /// Overrides the saved color scheme
    #[prop_or_default]
    pub scheme: Option<ColorScheme>,
    /// Starts a game on mount
    #[prop_or_default]
    pub difficulty: Option<Difficulty>,
}

pub(crate) struct GameView {
    engine: game::GameEngine<game::RandomSequenceGenerator>,
    high_scores: game::HighScoreStore<LocalStore>,
    timers: Vec<Timeout>,
}

impl GameView {
    fn apply(&mut self, ctx: &Context<Self>, command: Command) {
        match command {
            Command::Schedule { delay, timer } => {
                let link = ctx.link().clone();
                self.timers.push(Timeout::new(delay, move || {
                    link.send_message(Event::TimerFired(timer))
                }));
            }
            Command::CancelTimers => {
                log::trace!("dropping {} timers", self.timers.len());
                self.timers.clear();
            }
            // rendered from `GameEngine::lit`
            Command::Highlight(_) | Command::Unhighlight(_) => {}
            Command::StoreHighScore(score) => {
                if self.high_scores.record(score) {
                    log::info!("new high score: {}", score);
                }
            }
        }
    }
}

impl Component for GameView {
    type Message = Event;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let generator = game::RandomSequenceGenerator::new(props.seed.unwrap_or_else(js_random_seed));
        log::debug!("seed: {}", generator.seed());

        let mut high_scores = game::HighScoreStore::new(LocalStore);
        let high_score = high_scores.load();
        let scheme = props.scheme.unwrap_or_else(LocalOrDefault::local_or_default);
        let engine = game::GameEngine::new(generator, high_score).with_scheme(scheme);

        if let Some(difficulty) = props.difficulty {
            ctx.link().send_message(Event::DifficultySelected(difficulty));
        }

        Self {
            engine,
            high_scores,
            timers: Vec::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, event: Self::Message) -> bool {
        log::trace!("event: {:?}", event);

        let mut commands = Vec::new();
        let updated = self.engine.handle(event, &mut commands);

        if updated {
            match event {
                // the last playback timer just fired, nothing else is pending
                Event::TimerFired(Timer {
                    cue: Cue::BeginInput,
                    ..
                }) => self.timers.clear(),
                Event::SchemeSelected(scheme) => scheme.local_save(),
                _ => {}
            }
        }

        for command in commands {
            self.apply(ctx, command);
        }
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let phase = self.engine.phase();
        let lit = self.engine.lit();

        html! {
            <div class="memoria">
                <header>
                    <h1>{"Memoria Dinámica"}</h1>
                    <p>{format!("Score: {}", self.engine.score())}</p>
                    <p>{format!("High score: {}", self.engine.high_score())}</p>
                </header>
                <div class={classes!("button-grid", phase_class(phase))}>
                    {
                        for self.engine.scheme().color_ids().map(|color| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Event::ColorPressed(color));
                            html! {
                                <button
                                    class={color_button_class(color, lit)}
                                    data-color={color.name()}
                                    style={format!("background-color: {}", self.engine.scheme().display_value(color))}
                                    {onclick}
                                />
                            }
                        })
                    }
                </div>
                {
                    if phase.accepts_difficulty() {
                        html! {
                            <div class="difficulty-selector">
                                {
                                    for Difficulty::ALL.into_iter().map(|difficulty| {
                                        let onclick = ctx.link().callback(move |_: MouseEvent| {
                                            Event::DifficultySelected(difficulty)
                                        });
                                        html! { <button {onclick}>{difficulty_label(difficulty)}</button> }
                                    })
                                }
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
                <div class="color-selector">
                    <p>{"Color scheme:"}</p>
                    {
                        for ColorScheme::ALL.into_iter().map(|scheme| {
                            let onclick = ctx.link().callback(move |_: MouseEvent| Event::SchemeSelected(scheme));
                            html! { <button {onclick}>{scheme_label(scheme)}</button> }
                        })
                    }
                </div>
                {
                    if self.engine.is_game_over() {
                        let onclick = ctx.link().callback(|_: MouseEvent| Event::ResetPressed);
                        html! {
                            <div class="game-over-message">
                                <p>{"Game Over!"}</p>
                                <button {onclick}>{"Restart"}</button>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        }
    }
}
