use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game has not started, make a first move")]
    NotStarted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Game is paused")]
    Paused,
    #[error("Move is not allowed")]
    IllegalMove,
}

pub type Result<T> = core::result::Result<T, GameError>;
