//! Snake on a fixed grid. Endless: the run only ends by collision and is scored against a
//! persisted high score.

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::*;

pub const HIGH_SCORE_KEY: &str = "retrodesk:snake:highScore";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Screen-space delta, `y` grows downwards.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeConfig {
    pub width: i32,
    pub height: i32,
    pub start: Point,
    pub start_direction: Direction,
    pub tick_ms: u32,
    pub food_score: u32,
}

impl SnakeConfig {
    pub const CLASSIC: Self = Self {
        width: 20,
        height: 20,
        start: Point::new(10, 10),
        start_direction: Direction::Right,
        tick_ms: 150,
        food_score: 10,
    };
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct Snake {
    config: SnakeConfig,
    segments: VecDeque<Point>,
    /// Direction used by the last tick, reversal is judged against this.
    direction: Direction,
    /// Direction the next tick will use.
    next_direction: Direction,
    food: Option<Point>,
    score: u32,
    high_score: u32,
    status: Status,
    paused: bool,
    rng: SmallRng,
}

impl Snake {
    pub fn new(config: SnakeConfig, seed: u64, high_score: u32) -> Self {
        let mut config = config;
        if config.width < 1 || config.height < 1 {
            log::warn!("Snake grid {}x{} is empty, using the classic grid", config.width, config.height);
            config = SnakeConfig::CLASSIC;
        }
        let mut snake = Self {
            config,
            segments: VecDeque::new(),
            direction: config.start_direction,
            next_direction: config.start_direction,
            food: None,
            score: 0,
            high_score,
            status: Status::Playing,
            paused: false,
            rng: SmallRng::seed_from_u64(seed),
        };
        snake.new_game();
        snake
    }

    /// Resets the board, keeping the high score and the random stream.
    pub fn new_game(&mut self) {
        let start = Point::new(
            self.config.start.x.clamp(0, self.config.width - 1),
            self.config.start.y.clamp(0, self.config.height - 1),
        );
        self.segments = VecDeque::from([start]);
        self.direction = self.config.start_direction;
        self.next_direction = self.config.start_direction;
        self.score = 0;
        self.status = Status::Playing;
        self.paused = false;
        self.food = self.random_free_cell();
        log::debug!("New snake game, food at {:?}", self.food);
    }

    pub fn config(&self) -> SnakeConfig {
        self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.segments.iter().copied()
    }

    pub fn head(&self) -> Point {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn contains(&self, point: Point) -> bool {
        self.segments.contains(&point)
    }

    /// Puts the food on a given free cell, used to set up fixed scenarios.
    pub fn place_food(&mut self, point: Point) -> Result<()> {
        if !self.in_bounds(point) {
            return Err(GameError::InvalidCoords);
        }
        if self.contains(point) {
            return Err(GameError::IllegalMove);
        }
        self.food = Some(point);
        Ok(())
    }

    /// Queues a turn for the next tick. Turning straight back into the neck is rejected.
    pub fn set_direction(&mut self, direction: Direction) -> Result<bool> {
        self.check_playing()?;
        if direction == self.direction.opposite() {
            return Err(GameError::IllegalMove);
        }
        let changed = self.next_direction != direction;
        self.next_direction = direction;
        Ok(changed)
    }

    pub fn toggle_pause(&mut self) -> Result<bool> {
        self.check_playing()?;
        self.paused = !self.paused;
        log::debug!("Snake paused: {}", self.paused);
        Ok(self.paused)
    }

    fn step(&mut self) -> Result<TickOutcome> {
        self.check_playing()?;
        if self.paused {
            return Err(GameError::Paused);
        }

        self.direction = self.next_direction;
        let head = self.head().step(self.direction);

        // the tail still counts, it has not moved away yet
        if !self.in_bounds(head) || self.contains(head) {
            self.game_over();
            return Ok(TickOutcome::Ended);
        }

        self.segments.push_front(head);
        if self.food == Some(head) {
            self.score += self.config.food_score;
            self.food = self.random_free_cell();
            log::trace!("Snake ate at {:?}, length {}", head, self.len());
            if self.food.is_none() {
                log::debug!("Snake filled the board");
                self.game_over();
                return Ok(TickOutcome::Ended);
            }
            Ok(TickOutcome::Scored)
        } else {
            self.segments.pop_back();
            Ok(TickOutcome::Moved)
        }
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        log::debug!("Snake game over, score {}", self.score);
    }

    fn random_free_cell(&mut self) -> Option<Point> {
        let free: Vec<Point> = (0..self.config.height)
            .flat_map(|y| (0..self.config.width).map(move |x| Point::new(x, y)))
            .filter(|&point| !self.segments.contains(&point))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn in_bounds(&self, point: Point) -> bool {
        (0..self.config.width).contains(&point.x) && (0..self.config.height).contains(&point.y)
    }

    fn check_playing(&self) -> Result<()> {
        match self.status {
            Status::Playing => Ok(()),
            Status::GameOver => Err(GameError::AlreadyEnded),
        }
    }
}

impl Ticking for Snake {
    fn tick(&mut self) -> Result<TickOutcome> {
        self.step()
    }

    fn tick_interval_ms(&self) -> u32 {
        self.config.tick_ms
    }
}

impl StatusText for Snake {
    fn status_key(&self) -> &'static str {
        match (self.status, self.paused) {
            (Status::GameOver, _) => "snake.status.gameOver",
            (Status::Playing, true) => "snake.status.paused",
            (Status::Playing, false) => "snake.status.playing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake() -> Snake {
        let mut snake = Snake::new(SnakeConfig::CLASSIC, 7, 0);
        snake.place_food(Point::new(0, 0)).unwrap();
        snake
    }

    fn grown(len: usize) -> Snake {
        let mut snake = snake();
        for i in 1..len as i32 {
            snake.place_food(Point::new(10 + i, 10)).unwrap();
            snake.tick().unwrap();
        }
        snake.place_food(Point::new(0, 0)).unwrap();
        snake
    }

    #[test]
    fn new_game_starts_playing() {
        let snake = Snake::new(SnakeConfig::CLASSIC, 1, 50);
        assert_eq!(snake.status(), Status::Playing);
        assert_eq!(snake.head(), Point::new(10, 10));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.high_score(), 50);
        let food = snake.food().unwrap();
        assert!(!snake.contains(food));
    }

    #[test]
    fn three_ticks_move_three_cells() {
        let mut snake = snake();
        for _ in 0..3 {
            assert_eq!(snake.tick().unwrap(), TickOutcome::Moved);
        }
        assert_eq!(snake.head(), Point::new(13, 10));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn reversal_is_rejected() {
        let mut snake = snake();
        assert_eq!(snake.set_direction(Direction::Left), Err(GameError::IllegalMove));
        assert_eq!(snake.next_direction(), Direction::Right);

        assert_eq!(snake.set_direction(Direction::Up), Ok(true));
        snake.tick().unwrap();
        assert_eq!(snake.set_direction(Direction::Down), Err(GameError::IllegalMove));
        assert_eq!(snake.next_direction(), Direction::Up);
    }

    #[test]
    fn two_quick_turns_cannot_reverse() {
        let mut snake = grown(3);
        snake.set_direction(Direction::Up).unwrap();
        // judged against the direction actually travelled, not the queued one
        assert_eq!(snake.set_direction(Direction::Left), Err(GameError::IllegalMove));
        assert_eq!(snake.tick().unwrap(), TickOutcome::Moved);
    }

    #[test]
    fn eating_grows_and_respawns_food_off_snake() {
        let mut snake = snake();
        snake.place_food(Point::new(11, 10)).unwrap();

        assert_eq!(snake.tick().unwrap(), TickOutcome::Scored);

        assert_eq!(snake.len(), 2);
        assert_eq!(snake.score(), 10);
        let food = snake.food().unwrap();
        assert!(!snake.contains(food));
    }

    #[test]
    fn wall_ends_the_game_and_freezes() {
        let mut snake = snake();
        for _ in 0..9 {
            assert_eq!(snake.tick().unwrap(), TickOutcome::Moved);
        }
        assert_eq!(snake.head(), Point::new(19, 10));
        assert_eq!(snake.tick().unwrap(), TickOutcome::Ended);
        assert_eq!(snake.status(), Status::GameOver);

        let head = snake.head();
        assert_eq!(snake.tick(), Err(GameError::AlreadyEnded));
        assert_eq!(snake.head(), head);
        assert_eq!(snake.set_direction(Direction::Up), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn running_into_the_body_ends_the_game() {
        let mut snake = grown(5);
        snake.set_direction(Direction::Up).unwrap();
        snake.tick().unwrap();
        snake.set_direction(Direction::Left).unwrap();
        snake.tick().unwrap();
        snake.set_direction(Direction::Down).unwrap();
        assert_eq!(snake.tick().unwrap(), TickOutcome::Ended);
        assert_eq!(snake.status(), Status::GameOver);
    }

    #[test]
    fn moving_into_the_tail_cell_counts_as_collision() {
        // a 4-long snake turning in a tight square meets its own tail
        let mut snake = grown(4);
        snake.set_direction(Direction::Up).unwrap();
        snake.tick().unwrap();
        snake.set_direction(Direction::Left).unwrap();
        snake.tick().unwrap();
        snake.set_direction(Direction::Down).unwrap();
        assert_eq!(snake.tick().unwrap(), TickOutcome::Ended);
    }

    #[test]
    fn game_over_raises_high_score() {
        let mut snake = Snake::new(SnakeConfig::CLASSIC, 7, 5);
        snake.place_food(Point::new(11, 10)).unwrap();
        snake.tick().unwrap();
        snake.place_food(Point::new(0, 0)).unwrap();
        while snake.tick() != Ok(TickOutcome::Ended) {}
        assert_eq!(snake.high_score(), 10);
    }

    #[test]
    fn pause_suspends_ticks() {
        let mut snake = snake();
        assert_eq!(snake.toggle_pause(), Ok(true));
        assert_eq!(snake.tick(), Err(GameError::Paused));
        assert_eq!(snake.head(), Point::new(10, 10));
        assert_eq!(snake.toggle_pause(), Ok(false));
        assert_eq!(snake.tick().unwrap(), TickOutcome::Moved);
    }
}
