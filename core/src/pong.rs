//! Pong against a deliberately imperfect computer paddle. The player holds the left paddle.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PongConfig {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a paddle and its edge of the arena.
    pub paddle_margin: f32,
    pub ball_size: f32,
    pub ball_speed: f32,
    pub paddle_speed: f32,
    /// Fraction of `paddle_speed` the computer moves at.
    pub ai_factor: f32,
    /// The computer holds still while the ball is this close to its paddle centre.
    pub ai_dead_zone: f32,
    pub winning_score: u32,
    pub tick_ms: u32,
}

impl PongConfig {
    pub const CLASSIC: Self = Self {
        width: 600.0,
        height: 400.0,
        paddle_width: 10.0,
        paddle_height: 80.0,
        paddle_margin: 20.0,
        ball_size: 10.0,
        ball_speed: 5.0,
        paddle_speed: 6.0,
        ai_factor: 0.6,
        ai_dead_zone: 10.0,
        winning_score: 5,
        tick_ms: 16,
    };

    /// Copy whose paddles and ball fit inside the arena, with no negative speeds.
    pub fn sanitized(self) -> Self {
        let height = self.height.max(1.0);
        let paddle_width = self.paddle_width.max(1.0);
        let paddle_margin = self.paddle_margin.max(0.0);
        let ball_size = self.ball_size.clamp(1.0, height);
        // both paddles plus room for the ball between them
        let width = self
            .width
            .max(2.0 * (paddle_margin + paddle_width) + ball_size);
        Self {
            width,
            height,
            paddle_width,
            paddle_height: self.paddle_height.clamp(1.0, height),
            paddle_margin,
            ball_size,
            ball_speed: self.ball_speed.max(0.0),
            paddle_speed: self.paddle_speed.max(0.0),
            ai_factor: self.ai_factor.clamp(0.0, 1.0),
            ai_dead_zone: self.ai_dead_zone.max(0.0),
            winning_score: self.winning_score.max(1),
            tick_ms: self.tick_ms.max(1),
        }
    }

    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Player => self.paddle_margin,
            Side::Computer => self.width - self.paddle_margin - self.paddle_width,
        }
    }
}

impl Default for PongConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Left paddle.
    Player,
    /// Right paddle.
    Computer,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleInput {
    #[default]
    Idle,
    Up,
    Down,
}

/// Top-left corner and velocity per tick.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub computer: u32,
}

impl Score {
    pub fn of(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player,
            Side::Computer => self.computer,
        }
    }

    fn award(&mut self, side: Side) -> u32 {
        let points = match side {
            Side::Player => &mut self.player,
            Side::Computer => &mut self.computer,
        };
        *points += 1;
        *points
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    Won(Side),
}

#[derive(Clone, Debug)]
pub struct Pong {
    config: PongConfig,
    ball: Ball,
    /// Top edge of each paddle.
    player_y: f32,
    computer_y: f32,
    input: PaddleInput,
    score: Score,
    status: Status,
    paused: bool,
    rng: SmallRng,
}

impl Pong {
    pub fn new(config: PongConfig, seed: u64) -> Self {
        let sanitized = config.sanitized();
        if sanitized != config {
            log::warn!("Pong config {:?} out of range, using {:?}", config, sanitized);
        }
        let config = sanitized;
        let centre = (config.height - config.paddle_height) / 2.0;
        let mut game = Self {
            config,
            ball: Ball {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
            },
            player_y: centre,
            computer_y: centre,
            input: PaddleInput::Idle,
            score: Score::default(),
            status: Status::Playing,
            paused: false,
            rng: SmallRng::seed_from_u64(seed),
        };
        game.serve(Side::Computer);
        log::debug!("New pong game, first to {}", config.winning_score);
        game
    }

    pub fn new_game(&mut self, seed: u64) {
        *self = Self::new(self.config, seed);
    }

    pub fn config(&self) -> PongConfig {
        self.config
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    pub fn paddle_y(&self, side: Side) -> f32 {
        match side {
            Side::Player => self.player_y,
            Side::Computer => self.computer_y,
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::Won(side) => Some(side),
            Status::Playing => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Held keys, applied on every tick until changed.
    pub fn set_player_input(&mut self, input: PaddleInput) {
        self.input = input;
    }

    /// Centres the player paddle on a pointer position.
    pub fn set_player_target(&mut self, y: f32) -> Result<()> {
        self.check_playing()?;
        self.set_paddle_top(Side::Player, y - self.config.paddle_height / 2.0);
        Ok(())
    }

    /// Moves a paddle, clamped to the arena.
    pub fn set_paddle_top(&mut self, side: Side, top: f32) {
        let top = top.clamp(0.0, self.config.height - self.config.paddle_height);
        match side {
            Side::Player => self.player_y = top,
            Side::Computer => self.computer_y = top,
        }
    }

    /// Replaces the ball, used to set up fixed scenarios.
    pub fn place_ball(&mut self, ball: Ball) {
        self.ball = ball;
    }

    pub fn toggle_pause(&mut self) -> Result<bool> {
        self.check_playing()?;
        self.paused = !self.paused;
        log::debug!("Pong paused: {}", self.paused);
        Ok(self.paused)
    }

    /// Ball from the centre towards `side`, with a random slope.
    fn serve(&mut self, side: Side) {
        let config = &self.config;
        let direction = match side {
            Side::Player => -1.0,
            Side::Computer => 1.0,
        };
        let slope: f32 = self.rng.random_range(-0.5..=0.5);
        self.ball = Ball {
            x: (config.width - config.ball_size) / 2.0,
            y: (config.height - config.ball_size) / 2.0,
            vx: direction * config.ball_speed,
            vy: slope * config.ball_speed,
        };
    }

    fn step(&mut self) -> Result<TickOutcome> {
        self.check_playing()?;
        if self.paused {
            return Err(GameError::Paused);
        }

        self.move_player();
        self.move_computer();

        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;
        self.bounce_off_walls();
        self.bounce_off_paddle(Side::Player);
        self.bounce_off_paddle(Side::Computer);

        let size = self.config.ball_size;
        let scorer = if self.ball.x + size < 0.0 {
            Some(Side::Computer)
        } else if self.ball.x > self.config.width {
            Some(Side::Player)
        } else {
            None
        };
        let Some(scorer) = scorer else {
            return Ok(TickOutcome::Moved);
        };

        let points = self.score.award(scorer);
        log::debug!("Point for {:?}, score {:?}", scorer, self.score);
        if points >= self.config.winning_score {
            self.status = Status::Won(scorer);
            log::debug!("Pong won by {:?}", scorer);
            return Ok(TickOutcome::Ended);
        }
        // served towards the scorer, back out the way it left
        self.serve(scorer);
        Ok(TickOutcome::Scored)
    }

    fn move_player(&mut self) {
        let delta = match self.input {
            PaddleInput::Idle => return,
            PaddleInput::Up => -self.config.paddle_speed,
            PaddleInput::Down => self.config.paddle_speed,
        };
        self.set_paddle_top(Side::Player, self.player_y + delta);
    }

    fn move_computer(&mut self) {
        let config = &self.config;
        let paddle_centre = self.computer_y + config.paddle_height / 2.0;
        let ball_centre = self.ball.y + config.ball_size / 2.0;
        let offset = ball_centre - paddle_centre;
        if offset.abs() <= config.ai_dead_zone {
            return;
        }
        let step = offset.signum() * config.paddle_speed * config.ai_factor;
        self.set_paddle_top(Side::Computer, self.computer_y + step);
    }

    fn bounce_off_walls(&mut self) {
        let floor = self.config.height - self.config.ball_size;
        if self.ball.y < 0.0 {
            self.ball.y = 0.0;
            self.ball.vy = self.ball.vy.abs();
        } else if self.ball.y > floor {
            self.ball.y = floor;
            self.ball.vy = -self.ball.vy.abs();
        }
    }

    fn bounce_off_paddle(&mut self, side: Side) {
        let config = &self.config;
        let incoming = match side {
            Side::Player => self.ball.vx < 0.0,
            Side::Computer => self.ball.vx > 0.0,
        };
        if !incoming {
            return;
        }

        let paddle_x = config.paddle_x(side);
        let paddle_y = self.paddle_y(side);
        let size = config.ball_size;
        let overlaps = self.ball.x < paddle_x + config.paddle_width
            && self.ball.x + size > paddle_x
            && self.ball.y < paddle_y + config.paddle_height
            && self.ball.y + size > paddle_y;
        if !overlaps {
            return;
        }

        let hit = ((self.ball.y + size / 2.0 - paddle_y) / config.paddle_height).clamp(0.0, 1.0);
        self.ball.vy = (hit - 0.5) * config.ball_speed * 2.0;
        match side {
            Side::Player => {
                self.ball.vx = self.ball.vx.abs();
                self.ball.x = paddle_x + config.paddle_width;
            }
            Side::Computer => {
                self.ball.vx = -self.ball.vx.abs();
                self.ball.x = paddle_x - size;
            }
        }
        log::trace!("Ball hit {:?} paddle at {:.2}", side, hit);
    }

    fn check_playing(&self) -> Result<()> {
        match self.status {
            Status::Playing => Ok(()),
            Status::Won(_) => Err(GameError::AlreadyEnded),
        }
    }
}

impl Ticking for Pong {
    fn tick(&mut self) -> Result<TickOutcome> {
        self.step()
    }

    fn tick_interval_ms(&self) -> u32 {
        self.config.tick_ms
    }
}

impl StatusText for Pong {
    fn status_key(&self) -> &'static str {
        match (self.status, self.paused) {
            (Status::Won(Side::Player), _) => "pong.status.playerWon",
            (Status::Won(Side::Computer), _) => "pong.status.computerWon",
            (Status::Playing, true) => "pong.status.paused",
            (Status::Playing, false) => "pong.status.playing",
        }
    }
}
