//! End-to-end runs of each engine through its public API.

use retrodesk_core::minesweeper::{self, Difficulty, Minesweeper, RevealOutcome};
use retrodesk_core::pong::{Ball, Pong, PongConfig, Side};
use retrodesk_core::snake::{self, Point, Snake, SnakeConfig};
use retrodesk_core::solitaire::{Card, DrawOutcome, Solitaire};
use retrodesk_core::tetris::{PieceKind, PieceOutcome, Shift, Tetris, TetrisConfig};
use retrodesk_core::*;

#[test]
fn minesweeper_first_reveal_is_safe_and_board_is_solvable() {
    for seed in 0..20 {
        let mut game = Minesweeper::new(Difficulty::BEGINNER, seed);
        let outcome = game.reveal((4, 4)).unwrap();
        assert_ne!(outcome, RevealOutcome::HitMine);
        assert!(!game.cell_at((4, 4)).is_mine());

        let (rows, cols) = game.size();
        for row in 0..rows {
            for col in 0..cols {
                let cell = game.cell_at((row, col));
                if !cell.is_mine() && cell.is_hidden() {
                    let outcome = game.reveal((row, col)).unwrap();
                    assert_ne!(outcome, RevealOutcome::HitMine);
                }
            }
        }
        assert_eq!(game.status(), minesweeper::Status::Won, "seed {}", seed);
        assert_eq!(game.hidden_safe_count(), 0);
    }
}

#[test]
fn solitaire_draws_three_at_a_time() {
    let mut game = Solitaire::new(2024);
    let stock: Vec<Card> = game.piles().stock.clone();
    assert_eq!(stock.len(), 24);

    assert_eq!(game.draw_from_stock(), Ok(DrawOutcome::Drawn(3)));
    let waste = &game.piles().waste;
    assert_eq!(waste.len(), 3);
    assert!(waste.iter().all(|card| card.face_up));
    let expected: Vec<u8> = stock[21..].iter().rev().map(Card::id).collect();
    assert_eq!(waste.iter().map(Card::id).collect::<Vec<_>>(), expected);

    assert_eq!(game.piles().stock.len(), 21);
    assert_eq!(game.draw_from_stock(), Ok(DrawOutcome::Drawn(3)));
    let next: Vec<u8> = stock[18..21].iter().rev().map(Card::id).collect();
    assert_eq!(
        game.piles().waste[3..].iter().map(Card::id).collect::<Vec<_>>(),
        next
    );
}

#[test]
fn snake_moves_right_three_cells() {
    let mut store = MemoryStore::default();
    let mut game = Snake::new(
        SnakeConfig::CLASSIC,
        5,
        HighScore::load(&store, snake::HIGH_SCORE_KEY),
    );
    game.place_food(Point::new(0, 0)).unwrap();
    assert_eq!(game.head(), Point::new(10, 10));

    for _ in 0..3 {
        assert_eq!(game.tick(), Ok(TickOutcome::Moved));
    }
    assert_eq!(game.head(), Point::new(13, 10));
    assert_eq!(game.len(), 1);

    // run into the right wall
    while game.tick() == Ok(TickOutcome::Moved) {}
    assert_eq!(game.status(), snake::Status::GameOver);
    assert!(!HighScore::record(&mut store, snake::HIGH_SCORE_KEY, game.high_score()));
}

#[test]
fn tetris_i_piece_falls_four_rows() {
    let mut game = Tetris::starting_with(TetrisConfig::CLASSIC, 1, PieceKind::I);
    let spawned = game.current();
    assert_eq!((spawned.row, spawned.col), (0, 3));

    for _ in 0..4 {
        assert_eq!(game.move_piece(Shift::Down), Ok(PieceOutcome::Moved));
    }
    assert_eq!(game.current().row, 4);
    assert_eq!(game.current().col, 3);
}

#[test]
fn pong_missed_ball_scores_for_player_and_serves_left() {
    let config = PongConfig {
        ai_factor: 0.0,
        ..PongConfig::CLASSIC
    };
    let mut game = Pong::new(config, 9);
    game.set_paddle_top(Side::Computer, 0.0);
    game.place_ball(Ball {
        x: 295.0,
        y: 195.0,
        vx: 5.0,
        vy: 0.0,
    });

    let mut ticks = 0;
    let outcome = loop {
        let outcome = game.tick().unwrap();
        ticks += 1;
        if outcome != TickOutcome::Moved || ticks > 200 {
            break outcome;
        }
    };
    assert_eq!(outcome, TickOutcome::Scored);
    assert_eq!(game.score().player, 1);
    assert_eq!(game.score().computer, 0);
    assert!(game.ball().vx < 0.0);
    assert_eq!(game.ball().x, 295.0);
}

#[test]
fn unmount_stops_ticks() {
    let scheduler = ManualScheduler::default();
    let ticks = std::rc::Rc::new(std::cell::Cell::new(0));
    let counter = ticks.clone();
    let mounted = Mounted::mount(
        Snake::new(SnakeConfig::CLASSIC, 1, 0),
        &scheduler,
        move |_| counter.set(counter.get() + 1),
    );
    scheduler.advance(450);
    assert_eq!(ticks.get(), 3);

    let engine = mounted.unmount().unwrap();
    assert_eq!(engine.head(), Point::new(13, 10));
    scheduler.advance(1000);
    assert_eq!(ticks.get(), 3);
}
