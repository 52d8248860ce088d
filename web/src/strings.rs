use retrodesk_core::Translate;

/// Built-in English strings. Unknown keys are shown as-is so missing entries stay visible.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct English;

impl English {
    fn lookup(key: &str) -> Option<&'static str> {
        Some(match key {
            "shell.title" => "RetroDesk",
            "shell.close" => "Close",

            "game.minesweeper" => "Minesweeper",
            "game.solitaire" => "Solitaire",
            "game.snake" => "Snake",
            "game.tetris" => "Tetris",
            "game.pong" => "Pong",

            "action.newGame" => "New game",
            "action.pause" => "Pause",
            "action.undo" => "Undo",
            "action.autoComplete" => "Finish",
            "action.settings" => "Settings",
            "action.apply" => "Apply",
            "action.cancel" => "Cancel",

            "label.score" => "Score",
            "label.highScore" => "Best",
            "label.level" => "Level",
            "label.lines" => "Lines",
            "label.next" => "Next",
            "label.hold" => "Hold",
            "label.moves" => "Moves",

            "minesweeper.status.ready" => "Click any cell to start",
            "minesweeper.status.playing" => "Good luck!",
            "minesweeper.status.won" => "Cleared!",
            "minesweeper.status.lost" => "Boom. Try again?",
            "minesweeper.difficulty.beginner" => "Beginner",
            "minesweeper.difficulty.intermediate" => "Intermediate",
            "minesweeper.difficulty.expert" => "Expert",
            "minesweeper.settings.zeroStart" => "First click always opens an area",

            "solitaire.status.playing" => "Build the foundations up from ace to king",
            "solitaire.status.won" => "You won!",

            "snake.status.playing" => "Arrow keys or WASD to steer",
            "snake.status.paused" => "Paused",
            "snake.status.gameOver" => "Game over",

            "tetris.status.playing" => "Space drops, C holds",
            "tetris.status.paused" => "Paused",
            "tetris.status.gameOver" => "Game over",

            "pong.status.playing" => "First to five wins",
            "pong.status.paused" => "Paused",
            "pong.status.playerWon" => "You win!",
            "pong.status.computerWon" => "The computer wins",

            _ => return None,
        })
    }
}

impl Translate for English {
    fn t(&self, key: &str) -> String {
        Self::lookup(key).map_or_else(
            || {
                log::warn!("Missing string for {}", key);
                key.to_owned()
            },
            str::to_owned,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrodesk_core::minesweeper::Difficulty;

    #[test]
    fn unknown_keys_fall_back_to_the_key() {
        assert_eq!(English.t("snake.status.gameOver"), "Game over");
        assert_eq!(English.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn every_difficulty_preset_is_named() {
        for (key, _) in Difficulty::PRESETS {
            assert!(English::lookup(key).is_some(), "{}", key);
        }
    }
}
