use retrodesk_core::input::{KeyMap, PongCommand};
use retrodesk_core::pong::{PaddleInput, Pong, PongConfig, Side};
use retrodesk_core::{StatusText, Translate};
use yew::prelude::*;

use super::GameProps;
use crate::schedule::TickDriver;
use crate::strings::English;
use crate::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Ticked,
    Command(PongCommand),
    /// Key released, the paddle stops.
    Release,
    Pointer(f32),
}

fn px_box(x: f32, y: f32, width: f32, height: f32) -> String {
    format!("left: {x:.0}px; top: {y:.0}px; width: {width:.0}px; height: {height:.0}px;")
}

pub(crate) struct PongView {
    driver: TickDriver<Pong>,
    seed: Option<u64>,
    node: NodeRef,
}

impl Component for PongView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed;
        let engine = Pong::new(PongConfig::CLASSIC, seed_or_random(seed));
        Self {
            driver: TickDriver::start(engine, ctx.link(), Msg::Ticked),
            seed,
            node: NodeRef::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Ticked => true,
            Msg::Command(PongCommand::Paddle(input)) => {
                self.driver.with_engine(|engine| engine.set_player_input(input));
                false
            }
            Msg::Release => {
                self.driver
                    .with_engine(|engine| engine.set_player_input(PaddleInput::Idle));
                false
            }
            Msg::Pointer(y) => self
                .driver
                .with_engine(|engine| engine.set_player_target(y))
                .is_some_and(|result| match result {
                    Ok(()) => true,
                    Err(err) => {
                        log::trace!("pointer ignored: {}", err);
                        false
                    }
                }),
            Msg::Command(PongCommand::Pause) => {
                self.driver.with_engine(|engine| {
                    if let Err(err) = engine.toggle_pause() {
                        log::trace!("pause rejected: {}", err);
                    }
                });
                true
            }
            Msg::Command(PongCommand::Restart) => {
                let seed = seed_or_random(self.seed);
                self.driver.with_engine(|engine| engine.new_game(seed));
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
            let command = KeyMap::pong(&e.key())?;
            e.prevent_default();
            Some(Msg::Command(command))
        });
        let onkeyup = ctx.link().batch_callback(|e: KeyboardEvent| {
            matches!(KeyMap::pong(&e.key()), Some(PongCommand::Paddle(_))).then_some(Msg::Release)
        });
        let onmousemove = ctx
            .link()
            .callback(|e: MouseEvent| Msg::Pointer(e.offset_y() as f32));
        let on_restart = ctx
            .link()
            .callback(|_: MouseEvent| Msg::Command(PongCommand::Restart));

        let Some(engine) = self.driver.engine() else {
            return html! {};
        };
        let config = engine.config();
        let ball = engine.ball();
        let score = engine.score();
        let paddle = |side: Side| {
            let style = px_box(
                config.paddle_x(side),
                engine.paddle_y(side),
                config.paddle_width,
                config.paddle_height,
            );
            html! { <div class="paddle" {style}/> }
        };

        html! {
            <div class="pong" tabindex="0" ref={self.node.clone()} {onkeydown} {onkeyup}>
                <nav>
                    <aside>{score.of(Side::Player)}</aside>
                    <button onclick={on_restart}>{English.t("action.newGame")}</button>
                    <aside>{score.of(Side::Computer)}</aside>
                </nav>
                <div class="field" style={px_box(0.0, 0.0, config.width, config.height)} {onmousemove}>
                    {paddle(Side::Player)}
                    {paddle(Side::Computer)}
                    <div class="ball" style={px_box(ball.x, ball.y, config.ball_size, config.ball_size)}/>
                </div>
                <p class="status">{English.t(engine.status_key())}</p>
            </div>
        }
    }
}
