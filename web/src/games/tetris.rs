use retrodesk_core::input::{KeyMap, TetrisCommand};
use retrodesk_core::tetris::{PieceKind, PieceOutcome, Tetris, TetrisConfig};
use retrodesk_core::{Result, StatusText, Translate};
use yew::prelude::*;

use super::GameProps;
use crate::schedule::TickDriver;
use crate::strings::English;
use crate::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Ticked,
    Command(TetrisCommand),
}

fn view_preview(label: &str, kind: Option<PieceKind>) -> Html {
    let rows = kind.map(|kind| {
        let shape = kind.base_shape();
        html! {
            <table class={classes!("preview", kind.name())}>
                {
                    for shape.rows().into_iter().map(|row| html! {
                        <tr>
                            {for row.iter().map(|&filled| html! {
                                <td class={classes!("cell", filled.then_some("filled"))}/>
                            })}
                        </tr>
                    })
                }
            </table>
        }
    });

    html! {
        <figure>
            <figcaption>{English.t(label)}</figcaption>
            {for rows}
        </figure>
    }
}

fn view_board(engine: &Tetris) -> Html {
    let cells = engine.render_cells();
    let current = engine.current();
    let ghost = current.shifted(engine.ghost_row() - current.row, 0).cells();

    html! {
        <table class="board">
            {
                for cells.rows().into_iter().enumerate().map(|(r, row)| html! {
                    <tr>
                        {
                            for row.iter().enumerate().map(|(c, cell)| {
                                let class = match cell {
                                    Some(kind) => classes!("cell", "filled", kind.name()),
                                    None if ghost.contains(&(r as i32, c as i32)) => classes!("cell", "ghost"),
                                    None => classes!("cell"),
                                };
                                html! { <td {class}/> }
                            })
                        }
                    </tr>
                })
            }
        </table>
    }
}

pub(crate) struct TetrisView {
    driver: TickDriver<Tetris>,
    seed: Option<u64>,
    node: NodeRef,
}

impl TetrisView {
    fn piece_action(&self, action: &str, f: impl FnOnce(&mut Tetris) -> Result<PieceOutcome>) -> bool {
        self.driver
            .with_engine(f)
            .is_some_and(|result| log_rejection(action, result))
    }
}

impl Component for TetrisView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed;
        let engine = Tetris::new(TetrisConfig::CLASSIC, seed_or_random(seed));
        Self {
            driver: TickDriver::start(engine, ctx.link(), Msg::Ticked),
            seed,
            node: NodeRef::default(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use TetrisCommand::*;

        let updated = match msg {
            Msg::Ticked => true,
            Msg::Command(Shift(shift)) => self.piece_action("shift", |engine| engine.move_piece(shift)),
            Msg::Command(Rotate) => self.piece_action("rotate", Tetris::rotate),
            Msg::Command(HardDrop) => self.piece_action("hard drop", Tetris::hard_drop),
            Msg::Command(Hold) => self.piece_action("hold", Tetris::hold),
            Msg::Command(Pause) => {
                self.driver.with_engine(|engine| {
                    if let Err(err) = engine.toggle_pause() {
                        log::trace!("pause rejected: {}", err);
                    }
                });
                true
            }
            Msg::Command(Restart) => {
                let seed = seed_or_random(self.seed);
                self.driver.with_engine(|engine| engine.new_game(seed));
                true
            }
        };

        // gravity speeds up with the level, and a restart slows it down again
        if updated {
            self.driver.sync_interval();
        }
        updated
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
            let command = KeyMap::tetris(&e.key())?;
            e.prevent_default();
            Some(Msg::Command(command))
        });
        let on_restart = ctx
            .link()
            .callback(|_: MouseEvent| Msg::Command(TetrisCommand::Restart));
        let on_pause = ctx
            .link()
            .callback(|_: MouseEvent| Msg::Command(TetrisCommand::Pause));

        let Some(engine) = self.driver.engine() else {
            return html! {};
        };

        html! {
            <div class="tetris" tabindex="0" ref={self.node.clone()} {onkeydown}>
                {view_board(&engine)}
                <aside>
                    {view_preview("label.next", Some(engine.next()))}
                    {view_preview("label.hold", engine.held())}
                    <dl>
                        <dt>{English.t("label.score")}</dt><dd>{engine.score()}</dd>
                        <dt>{English.t("label.lines")}</dt><dd>{engine.lines()}</dd>
                        <dt>{English.t("label.level")}</dt><dd>{engine.level()}</dd>
                    </dl>
                    <button onclick={on_pause}>{English.t("action.pause")}</button>
                    <button onclick={on_restart}>{English.t("action.newGame")}</button>
                </aside>
                <p class="status">{English.t(engine.status_key())}</p>
            </div>
        }
    }
}
