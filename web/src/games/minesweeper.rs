use bitflags::bitflags;
use chrono::prelude::*;
use gloo::timers::callback::{Interval, Timeout};
use retrodesk_core::input::{LongPress, PressOutcome, LONG_PRESS_MS};
use retrodesk_core::minesweeper::{CellState, Minesweeper, Status};
use retrodesk_core::{Coord, Coord2, StatusText, Translate};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use super::GameProps;
use crate::settings::{MinesweeperSettings, SettingsView};
use crate::strings::English;
use crate::utils::*;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewCellState {
    Hidden,
    Revealed(u8),
    Flagged,
    TriggeredMine,
    Mine,
    Misflagged,
}

/// Engine plus the bookkeeping only the view cares about, persisted between visits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct MinesweeperSession {
    pub engine: Minesweeper,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub move_count: u32,
}

impl MinesweeperSession {
    fn new(engine: Minesweeper) -> Self {
        Self {
            engine,
            started_at: None,
            ended_at: None,
            move_count: 0,
        }
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn cell_state_at(&self, coords: Coord2) -> ViewCellState {
        let cell = self.engine.cell_at(coords);
        let plain = match cell.state() {
            CellState::Hidden => ViewCellState::Hidden,
            CellState::Revealed => ViewCellState::Revealed(cell.neighbor_mines()),
            CellState::Flagged => ViewCellState::Flagged,
        };

        match self.engine.status() {
            Status::Ready | Status::Playing => plain,
            Status::Won if cell.is_mine() => ViewCellState::Flagged,
            Status::Won => plain,
            Status::Lost if self.engine.triggered_mine() == Some(coords) => {
                ViewCellState::TriggeredMine
            }
            Status::Lost => match (cell.is_mine(), cell.state()) {
                (true, CellState::Flagged) => ViewCellState::Flagged,
                (true, _) => ViewCellState::Mine,
                (false, CellState::Flagged) => ViewCellState::Misflagged,
                (false, _) => plain,
            },
        }
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        self.move_count = self.move_count.saturating_add(1);

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    fn reveal(&mut self, coords: Coord2, now: DateTime<Utc>) -> bool {
        let result = match self.cell_state_at(coords) {
            ViewCellState::Revealed(_) => self.engine.chord_reveal(coords),
            _ => self.engine.reveal(coords),
        };
        let updated = log_rejection("reveal", result);
        if updated {
            self.on_successful_move(now);
        }
        updated
    }

    fn toggle_flag(&mut self, coords: Coord2, now: DateTime<Utc>) -> bool {
        let updated = log_rejection("flag", self.engine.toggle_flag(coords));
        if updated {
            self.on_successful_move(now);
        }
        updated
    }
}

impl StorageKey for MinesweeperSession {
    const KEY: &'static str = "retrodesk:minesweeper:session";
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    pos: (Coord, Coord),
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
    TouchStart(Coord2),
    TouchEnd,
    TouchCancel,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    LongPressCheck,
    UpdateTime,
    NewGame,
    ToggleSettings,
    ApplySettings(MinesweeperSettings),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    pos: Coord2,
    cell_state: ViewCellState,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        pos,
        cell_state,
        pressed,
        callback,
    } = props.clone();

    let mut class = classes!(
        "cell",
        match cell_state {
            Hidden => classes!(),
            Revealed(count) => classes!("open", format!("num-{}", count)),
            Flagged => classes!("flag"),
            TriggeredMine => classes!("open", "mine", "oops"),
            Mine => classes!("open", "mine"),
            Misflagged => classes!("flag", "wrong"),
        }
    );
    if pressed {
        class.push("open");
    }

    let pointer = |callback: Callback<CellMsg>| {
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            log::trace!("{:?} pointer {:?}", pos, buttons);
            callback.emit(CellMsg::Update(CellPointerState { pos, buttons }));
        })
    };
    let onmousedown = pointer(callback.clone());
    let onmouseup = pointer(callback.clone());
    let onmouseenter = pointer(callback.clone());
    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| callback.emit(CellMsg::Leave))
    };

    let ontouchstart = {
        let callback = callback.clone();
        Callback::from(move |_: TouchEvent| callback.emit(CellMsg::TouchStart(pos)))
    };
    let ontouchend = {
        let callback = callback.clone();
        Callback::from(move |e: TouchEvent| {
            // keeps the browser from replaying the touch as mouse events
            e.prevent_default();
            callback.emit(CellMsg::TouchEnd);
        })
    };
    let ontouchmove = {
        let callback = callback.clone();
        Callback::from(move |_: TouchEvent| callback.emit(CellMsg::TouchCancel))
    };
    let ontouchcancel = Callback::from(move |_: TouchEvent| callback.emit(CellMsg::TouchCancel));

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}
            {ontouchstart} {ontouchend} {ontouchmove} {ontouchcancel}/>
    }
}

pub(crate) struct MinesweeperView {
    settings: MinesweeperSettings,
    game: MinesweeperSession,
    seed: Option<u64>,
    prev_time: u32,
    settings_open: bool,
    current_cell_state: Option<CellPointerState>,
    touch: LongPress<Coord2>,
    _long_press_timer: Option<Timeout>,
    _timer_interval: Interval,
}

impl MinesweeperView {
    fn fresh_session(settings: MinesweeperSettings, seed: Option<u64>) -> MinesweeperSession {
        MinesweeperSession::new(Minesweeper::with_policy(
            settings.difficulty,
            settings.policy,
            seed_or_random(seed),
        ))
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn is_mid_open(&self) -> bool {
        matches!(
            self.current_cell_state,
            Some(CellPointerState {
                buttons: MouseButtons::LEFT,
                ..
            })
        )
    }

    fn state_class(&self) -> &'static str {
        match self.game.engine.status() {
            Status::Ready | Status::Playing if self.is_mid_open() => "mid-open",
            Status::Ready => "not-started",
            Status::Playing => "in-progress",
            Status::Won => "win",
            Status::Lost => "lose",
        }
    }

    fn is_pressed(&self, coords: Coord2, cell_state: ViewCellState) -> bool {
        if self.game.engine.is_finished() || cell_state != ViewCellState::Hidden {
            return false;
        }

        const fn is_neighbor(a: Coord2, b: Coord2) -> bool {
            (a.0.abs_diff(b.0) <= 1) && (a.1.abs_diff(b.1) <= 1)
        }

        match self.current_cell_state {
            Some(CellPointerState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if pos == coords => true,
            Some(CellPointerState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if is_neighbor(pos, coords) => self.game.engine.can_chord_reveal_at(pos),
            _ => false,
        }
    }

    fn on_pointer(&mut self, cell_state: CellPointerState) -> bool {
        if !cell_state.buttons.is_empty() {
            return match self.current_cell_state.replace(cell_state) {
                None => true,
                Some(CellPointerState { pos, buttons }) => {
                    (pos != cell_state.pos)
                        || ((buttons & MouseButtons::LEFT)
                            != (cell_state.buttons & MouseButtons::LEFT))
                }
            };
        }

        match self.current_cell_state.take() {
            None => false,
            Some(CellPointerState { pos, buttons }) => {
                match buttons {
                    MouseButtons::LEFT => {
                        log::debug!("reveal cell: {:?}", pos);
                        self.game.reveal(pos, utc_now());
                    }
                    MouseButtons::RIGHT => {
                        log::debug!("flag cell: {:?}", pos);
                        self.game.toggle_flag(pos, utc_now());
                    }
                    _ => {}
                }
                true
            }
        }
    }
}

impl Component for MinesweeperView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings = MinesweeperSettings::local_or_default();
        let seed = ctx.props().seed;
        let saved: Option<MinesweeperSession> = LocalOrDefault::local_or_default();
        let game = match saved {
            // a forced seed asks for that exact board, not the saved one
            Some(session) if seed.is_none() && !session.engine.is_finished() => session,
            _ => Self::fresh_session(settings, seed),
        };

        Self {
            settings,
            game,
            seed,
            prev_time: 0,
            settings_open: false,
            current_cell_state: None,
            touch: LongPress::default(),
            _long_press_timer: None,
            _timer_interval: Self::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        let updated = match msg {
            CellEvent(Leave) => self.current_cell_state.take().is_some(),
            CellEvent(Update(cell_state)) => self.on_pointer(cell_state),
            CellEvent(TouchStart(pos)) => {
                self.touch.press(pos, now_ms());
                let link = ctx.link().clone();
                self._long_press_timer = Some(Timeout::new(LONG_PRESS_MS as u32, move || {
                    link.send_message(LongPressCheck)
                }));
                false
            }
            CellEvent(TouchEnd) => {
                self._long_press_timer = None;
                match self.touch.release(now_ms()) {
                    PressOutcome::Tap(pos) => self.game.reveal(pos, utc_now()),
                    PressOutcome::Held(pos) => self.game.toggle_flag(pos, utc_now()),
                    PressOutcome::Consumed | PressOutcome::Ignored => false,
                }
            }
            CellEvent(TouchCancel) => {
                self._long_press_timer = None;
                self.touch.cancel();
                false
            }
            LongPressCheck => {
                self._long_press_timer = None;
                match self.touch.poll(now_ms()) {
                    Some(pos) => {
                        log::debug!("long press flag: {:?}", pos);
                        self.game.toggle_flag(pos, utc_now())
                    }
                    None => false,
                }
            }
            UpdateTime => {
                let time = self.game.elapsed_secs(utc_now());
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            NewGame => {
                self.game = Self::fresh_session(self.settings, self.seed);
                self.prev_time = 0;
                true
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            ApplySettings(settings) => {
                self.settings_open = false;
                if self.settings != settings {
                    self.settings = settings;
                    self.game = Self::fresh_session(settings, self.seed);
                    self.prev_time = 0;
                }
                true
            }
        };

        self.game.local_save();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let engine = &self.game.engine;
        let (rows, cols) = engine.size();
        let mines_left = format_for_counter(i32::from(engine.flags_left()));
        let elapsed_time = format_for_counter(self.game.elapsed_secs(utc_now()) as i32);
        let playable = !engine.is_finished();

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_settings = ctx.link().callback(|_: MouseEvent| ToggleSettings);
        let on_close = ctx.link().callback(|_: ()| ToggleSettings);
        let on_apply = ctx.link().callback(ApplySettings);
        let callback = ctx.link().callback(CellEvent);

        html! {
            <div class="minesweeper" oncontextmenu={Callback::from(|e: MouseEvent| e.prevent_default())}>
                <small onclick={cb_settings} title={English.t("action.settings")}>{"···"}</small>
                <nav>
                    <aside>{mines_left}</aside>
                    <span><button class={self.state_class()} onclick={cb_new_game} title={English.t("action.newGame")}/></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                <table class={playable.then_some("playable")}>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        let cell_state = self.game.cell_state_at(pos);
                                        let pressed = self.is_pressed(pos, cell_state);
                                        let callback = callback.clone();
                                        html! {
                                            <CellView {pos} {cell_state} {pressed} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <p class="status">{English.t(engine.status_key())}</p>
                <SettingsView open={self.settings_open} {on_close} {on_apply}/>
            </div>
        }
    }
}
