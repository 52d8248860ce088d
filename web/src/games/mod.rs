use serde::{Deserialize, Serialize};
use yew::prelude::*;

mod minesweeper;
mod pong;
mod snake;
mod solitaire;
mod tetris;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) enum GameKind {
    Minesweeper,
    Solitaire,
    Snake,
    Tetris,
    Pong,
}

impl GameKind {
    pub(crate) const ALL: [GameKind; 5] = [
        GameKind::Minesweeper,
        GameKind::Solitaire,
        GameKind::Snake,
        GameKind::Tetris,
        GameKind::Pong,
    ];

    pub(crate) const fn title_key(self) -> &'static str {
        use GameKind::*;
        match self {
            Minesweeper => "game.minesweeper",
            Solitaire => "game.solitaire",
            Snake => "game.snake",
            Tetris => "game.tetris",
            Pong => "game.pong",
        }
    }

    pub(crate) const fn css_class(self) -> &'static str {
        use GameKind::*;
        match self {
            Minesweeper => "minesweeper",
            Solitaire => "solitaire",
            Snake => "snake",
            Tetris => "tetris",
            Pong => "pong",
        }
    }
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub seed: Option<u64>,
}

pub(crate) fn view(kind: GameKind, seed: Option<u64>) -> Html {
    match kind {
        GameKind::Minesweeper => html! { <minesweeper::MinesweeperView {seed}/> },
        GameKind::Solitaire => html! { <solitaire::SolitaireView {seed}/> },
        GameKind::Snake => html! { <snake::SnakeView {seed}/> },
        GameKind::Tetris => html! { <tetris::TetrisView {seed}/> },
        GameKind::Pong => html! { <pong::PongView {seed}/> },
    }
}

/// Keyboard focus for the key-driven games, so arrows work without clicking first.
pub(crate) fn focus(node: &NodeRef) {
    if let Some(element) = node.cast::<web_sys::HtmlElement>() {
        if let Err(err) = element.focus() {
            log::debug!("Could not focus game: {:?}", err);
        }
    }
}
