//! Framework-free input helpers: touch long-press detection and keyboard bindings.

use crate::pong::PaddleInput;
use crate::snake::Direction;
use crate::tetris::Shift;

/// Hold time after which a touch counts as a long press.
pub const LONG_PRESS_MS: f64 = 500.0;

#[derive(Copy, Clone, Debug, PartialEq)]
enum PressState<P> {
    Idle,
    Pressed {
        pos: P,
        since: f64,
    },
    /// Long press already reported, the release is swallowed.
    Fired,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PressOutcome<P> {
    Tap(P),
    /// Held past the threshold without any poll noticing.
    Held(P),
    Consumed,
    Ignored,
}

/// Tells taps from long presses. Timestamps are milliseconds from any monotonic origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LongPress<P> {
    state: PressState<P>,
    threshold_ms: f64,
}

impl<P: Copy> Default for LongPress<P> {
    fn default() -> Self {
        Self::new(LONG_PRESS_MS)
    }
}

impl<P: Copy> LongPress<P> {
    pub fn new(threshold_ms: f64) -> Self {
        Self {
            state: PressState::Idle,
            threshold_ms,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, PressState::Pressed { .. })
    }

    pub fn press(&mut self, pos: P, now: f64) {
        self.state = PressState::Pressed { pos, since: now };
    }

    /// Reports the position once, the first time it is polled past the threshold.
    pub fn poll(&mut self, now: f64) -> Option<P> {
        match self.state {
            PressState::Pressed { pos, since } if now - since >= self.threshold_ms => {
                self.state = PressState::Fired;
                Some(pos)
            }
            _ => None,
        }
    }

    pub fn release(&mut self, now: f64) -> PressOutcome<P> {
        match std::mem::replace(&mut self.state, PressState::Idle) {
            PressState::Idle => PressOutcome::Ignored,
            PressState::Fired => PressOutcome::Consumed,
            PressState::Pressed { pos, since } if now - since >= self.threshold_ms => {
                PressOutcome::Held(pos)
            }
            PressState::Pressed { pos, .. } => PressOutcome::Tap(pos),
        }
    }

    /// Finger moved away or the touch was interrupted.
    pub fn cancel(&mut self) {
        self.state = PressState::Idle;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnakeCommand {
    Turn(Direction),
    Pause,
    Restart,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TetrisCommand {
    Shift(Shift),
    Rotate,
    HardDrop,
    Hold,
    Pause,
    Restart,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PongCommand {
    Paddle(PaddleInput),
    Pause,
    Restart,
}

/// Maps `KeyboardEvent.key` values to game commands. Letters are matched case-insensitively.
pub struct KeyMap;

impl KeyMap {
    fn normalize(key: &str) -> String {
        if key.chars().count() == 1 {
            key.to_ascii_lowercase()
        } else {
            key.to_owned()
        }
    }

    fn direction(key: &str) -> Option<Direction> {
        match key {
            "ArrowUp" | "w" => Some(Direction::Up),
            "ArrowDown" | "s" => Some(Direction::Down),
            "ArrowLeft" | "a" => Some(Direction::Left),
            "ArrowRight" | "d" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn snake(key: &str) -> Option<SnakeCommand> {
        let key = Self::normalize(key);
        match key.as_str() {
            "p" | "Escape" | " " => Some(SnakeCommand::Pause),
            "Enter" | "r" => Some(SnakeCommand::Restart),
            key => Self::direction(key).map(SnakeCommand::Turn),
        }
    }

    pub fn tetris(key: &str) -> Option<TetrisCommand> {
        let key = Self::normalize(key);
        let command = match key.as_str() {
            "ArrowLeft" | "a" => TetrisCommand::Shift(Shift::Left),
            "ArrowRight" | "d" => TetrisCommand::Shift(Shift::Right),
            "ArrowDown" | "s" => TetrisCommand::Shift(Shift::Down),
            "ArrowUp" | "w" | "x" => TetrisCommand::Rotate,
            " " => TetrisCommand::HardDrop,
            "c" | "Shift" => TetrisCommand::Hold,
            "p" | "Escape" => TetrisCommand::Pause,
            "Enter" | "r" => TetrisCommand::Restart,
            _ => return None,
        };
        Some(command)
    }

    /// Key down moves the paddle, the host sends [`PaddleInput::Idle`] on key up.
    pub fn pong(key: &str) -> Option<PongCommand> {
        let key = Self::normalize(key);
        match key.as_str() {
            "ArrowUp" | "w" => Some(PongCommand::Paddle(PaddleInput::Up)),
            "ArrowDown" | "s" => Some(PongCommand::Paddle(PaddleInput::Down)),
            "p" | "Escape" | " " => Some(PongCommand::Pause),
            "Enter" | "r" => Some(PongCommand::Restart),
            _ => None,
        }
    }
}
