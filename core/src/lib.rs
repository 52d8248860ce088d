//! Simulation engines for the RetroDesk arcade: Minesweeper, Solitaire, Snake, Tetris and Pong.
//!
//! Every engine is a deterministic state machine. It is mutated only by discrete input events or
//! by [`Ticking::tick`], and it never touches timers, storage or the DOM itself. Those are reached
//! through the host seams re-exported at the crate root ([`Scheduler`], [`KeyValueStore`],
//! [`Translate`]).

pub use error::*;
pub use grid::*;
pub use schedule::*;
pub use store::*;
pub use translate::*;

pub mod input;
pub mod minesweeper;
pub mod pong;
pub mod snake;
pub mod solitaire;
pub mod tetris;

mod error;
mod grid;
mod schedule;
mod store;
mod translate;
