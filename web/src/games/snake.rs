use retrodesk_core::input::{KeyMap, SnakeCommand};
use retrodesk_core::snake::{Point, Snake, SnakeConfig, Status, HIGH_SCORE_KEY};
use retrodesk_core::{HighScore, StatusText, Translate};
use yew::prelude::*;

use super::GameProps;
use crate::schedule::TickDriver;
use crate::strings::English;
use crate::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Ticked,
    Command(SnakeCommand),
}

pub(crate) struct SnakeView {
    driver: TickDriver<Snake>,
    /// Set once the finished game's score went to storage.
    recorded: bool,
    node: NodeRef,
}

impl SnakeView {
    fn start(ctx: &Context<Self>, seed: Option<u64>) -> TickDriver<Snake> {
        let high_score = HighScore::load(&BrowserStore, HIGH_SCORE_KEY);
        let engine = Snake::new(SnakeConfig::CLASSIC, seed_or_random(seed), high_score);
        TickDriver::start(engine, ctx.link(), Msg::Ticked)
    }

    fn record_if_over(&mut self) {
        let Some(score) = self
            .driver
            .engine()
            .and_then(|engine| (engine.status() == Status::GameOver).then(|| engine.score()))
        else {
            return;
        };
        if !self.recorded {
            self.recorded = true;
            if HighScore::record(&mut BrowserStore, HIGH_SCORE_KEY, score) {
                log::info!("New snake high score: {}", score);
            }
        }
    }

    fn view_board(engine: &Snake) -> Html {
        let SnakeConfig { width, height, .. } = engine.config();
        let head = engine.head();
        let food = engine.food();

        html! {
            <table class="board">
                {
                    for (0..height).map(|y| html! {
                        <tr>
                            {
                                for (0..width).map(|x| {
                                    let point = Point::new(x, y);
                                    let class = if point == head {
                                        "head"
                                    } else if engine.contains(point) {
                                        "body"
                                    } else if food == Some(point) {
                                        "food"
                                    } else {
                                        ""
                                    };
                                    html! { <td class={classes!("cell", class)}/> }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }
}

impl Component for SnakeView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            driver: Self::start(ctx, ctx.props().seed),
            recorded: false,
            node: NodeRef::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Ticked => {
                self.record_if_over();
                true
            }
            Msg::Command(SnakeCommand::Turn(direction)) => self
                .driver
                .with_engine(|engine| engine.set_direction(direction))
                .is_some_and(|result| match result {
                    Ok(changed) => changed,
                    Err(err) => {
                        log::trace!("turn rejected: {}", err);
                        false
                    }
                }),
            Msg::Command(SnakeCommand::Pause) => {
                self.driver.with_engine(|engine| {
                    if let Err(err) = engine.toggle_pause() {
                        log::trace!("pause rejected: {}", err);
                    }
                });
                true
            }
            Msg::Command(SnakeCommand::Restart) => {
                self.driver.with_engine(Snake::new_game);
                self.recorded = false;
                true
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            super::focus(&self.node);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.driver.stop();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onkeydown = ctx.link().batch_callback(|e: KeyboardEvent| {
            let command = KeyMap::snake(&e.key())?;
            e.prevent_default();
            Some(Msg::Command(command))
        });
        let on_restart = ctx
            .link()
            .callback(|_: MouseEvent| Msg::Command(SnakeCommand::Restart));
        let on_pause = ctx
            .link()
            .callback(|_: MouseEvent| Msg::Command(SnakeCommand::Pause));

        let Some(engine) = self.driver.engine() else {
            return html! {};
        };

        html! {
            <div class="snake" tabindex="0" ref={self.node.clone()} {onkeydown}>
                <nav>
                    <aside>{English.t("label.score")}{" "}{format_for_counter(engine.score() as i32)}</aside>
                    <aside>{English.t("label.highScore")}{" "}{format_for_counter(engine.high_score() as i32)}</aside>
                    <button onclick={on_pause}>{English.t("action.pause")}</button>
                    <button onclick={on_restart}>{English.t("action.newGame")}</button>
                </nav>
                {Self::view_board(&engine)}
                <p class="status">{English.t(engine.status_key())}</p>
            </div>
        }
    }
}
