//! Bot-vs-bot arena runner.
//!
//! Games are independent, so they are played in parallel with rayon. Each game
//! gets its own rng seeded from `base_seed + game_idx` (wrapping), which keeps a
//! run reproducible regardless of scheduling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::bot_strategy::MoveStrategy;
use crate::engine::error::MoveError;
use crate::games::tictactoe::board::Board;
use crate::games::tictactoe::rules::evaluate;
use crate::games::tictactoe::types::{GameOutcome, Marker};

/// A named strategy taking part in an arena run.
pub struct ArenaPlayer {
    pub name: String,
    pub strategy: Box<dyn MoveStrategy>,
}

impl ArenaPlayer {
    pub fn new(name: impl Into<String>, strategy: Box<dyn MoveStrategy>) -> Self {
        Self { name: name.into(), strategy }
    }
}

/// Result of a single arena game, in seat order (seat 0 moves first as X).
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Index into the players array for each seat.
    pub seats: [usize; 2],
    /// Winning seat, or None for a draw.
    pub winner_seat: Option<usize>,
    pub moves: usize,
    pub duration_ms: f64,
}

/// Aggregated results from an arena run.
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: HashMap<String, usize>,
    /// Wins while moving first, per player.
    pub first_seat_wins: HashMap<String, usize>,
    pub draws: usize,
    pub move_counts: Vec<usize>,
    pub game_durations_ms: Vec<f64>,
    names: Vec<String>,
}

impl ArenaResult {
    fn new(names: Vec<String>, num_games: usize) -> Self {
        Self {
            num_games,
            wins: names.iter().map(|n| (n.clone(), 0)).collect(),
            first_seat_wins: names.iter().map(|n| (n.clone(), 0)).collect(),
            draws: 0,
            move_counts: Vec::with_capacity(num_games),
            game_durations_ms: Vec::with_capacity(num_games),
            names,
        }
    }

    fn record(&mut self, game: &GameRecord) {
        self.move_counts.push(game.moves);
        self.game_durations_ms.push(game.duration_ms);
        match game.winner_seat {
            Some(seat) => {
                let name = &self.names[game.seats[seat]];
                *self.wins.entry(name.clone()).or_insert(0) += 1;
                if seat == 0 {
                    *self.first_seat_wins.entry(name.clone()).or_insert(0) += 1;
                }
            }
            None => self.draws += 1,
        }
    }

    pub fn losses(&self, name: &str) -> usize {
        let wins = self.wins.get(name).copied().unwrap_or(0);
        self.num_games - self.draws - wins
    }

    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn draw_rate(&self) -> f64 {
        self.draws as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_moves(&self) -> f64 {
        if self.move_counts.is_empty() {
            return 0.0;
        }
        self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        for name in &self.names {
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]  first-seat wins={}  losses={}",
                name,
                self.wins[name],
                self.win_rate(name) * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
                self.first_seat_wins[name],
                self.losses(name),
            ));
        }
        lines.push(format!(
            "  {:>12}: {} ({:.1}%)",
            "Draws",
            self.draws,
            self.draw_rate() * 100.0
        ));
        lines.push(format!("  Avg moves: {:.2}", self.avg_moves()));
        if !self.game_durations_ms.is_empty() {
            let total_ms = self.game_durations_ms.iter().sum::<f64>();
            let avg_ms = total_ms / self.game_durations_ms.len() as f64;
            lines.push(format!("  Avg game: {:.2}ms  |  Total CPU: {:.1}s", avg_ms, total_ms / 1000.0));
        }
        lines.join("\n")
    }
}

/// Run `num_games` between two players and return aggregated stats.
///
/// With `alternate_seats`, odd-numbered games swap who moves first.
pub fn run_arena(
    players: &[ArenaPlayer; 2],
    num_games: usize,
    base_seed: u64,
    alternate_seats: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> ArenaResult {
    let completed = AtomicUsize::new(0);

    let records: Vec<GameRecord> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let seed = base_seed.wrapping_add(game_idx as u64);
            let seats = if alternate_seats && game_idx % 2 == 1 {
                [1, 0]
            } else {
                [0, 1]
            };
            let record = play_one_game(players, seats, seed);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(done, num_games);
            }
            record
        })
        .collect();

    let mut result = ArenaResult::new(players.iter().map(|p| p.name.clone()).collect(), num_games);
    for record in &records {
        result.record(record);
    }
    tracing::debug!(
        num_games,
        draws = result.draws,
        avg_moves = result.avg_moves(),
        "arena finished"
    );
    result
}

/// Play one game to completion. `seats[i]` is the player index in seat `i`.
pub fn play_one_game(players: &[ArenaPlayer; 2], seats: [usize; 2], seed: u64) -> GameRecord {
    let markers = [Marker::x(), Marker::o()];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new();
    let mut seat = 0;
    let t0 = Instant::now();

    let winner_seat = loop {
        match evaluate(&board) {
            GameOutcome::Win { marker, .. } => {
                break markers.iter().position(|m| *m == marker);
            }
            GameOutcome::Draw => break None,
            GameOutcome::InProgress => {}
        }

        let player = &players[seats[seat]];
        let me = &markers[seat];
        let opponent = &markers[1 - seat];
        let chosen = player.strategy.choose_move(&board, me, opponent, &mut rng);
        let placed = chosen
            .ok_or(MoveError::NoEmptyCell)
            .and_then(|index| board.place(index, me.clone()));
        if let Err(e) = placed {
            // An illegal move forfeits the game.
            tracing::warn!(player = %player.name, error = %e, seed, "illegal move, forfeiting");
            break Some(1 - seat);
        }
        seat = 1 - seat;
    };

    GameRecord {
        seats,
        winner_seat,
        moves: board.move_count(),
        duration_ms: t0.elapsed().as_secs_f64() * 1000.0,
    }
}
