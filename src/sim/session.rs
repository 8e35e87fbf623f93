//! GameSession: the complete owned state of one playthrough.
//!
//! The session is the single owner of the grid, the player, the enemy
//! roster and the trail. The capture engine and the enemy behaviors
//! borrow them for the duration of one call inside `step()` and never
//! retain access. External consumers read through `snapshot()`, a deep
//! copy with no ties back into the session, and drive the game through
//! `handle_input` / `step` / `trigger_next_level`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GameConfig;
use crate::domain::ai;
use crate::domain::cell::Cell;
use crate::domain::entity::{Enemy, MoveDir, Player, Point};
use crate::domain::grid::Grid;
use crate::sim::event::GameEvent;

pub struct GameSession {
    pub(crate) config: GameConfig,
    pub(crate) grid: Grid,
    pub(crate) player: Player,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) trail: Vec<Point>,
    pub(crate) is_drawing: bool,

    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) level: u32,
    pub(crate) captured_percentage: f64,
    pub(crate) last_score_milestone: u32,

    pub(crate) game_over: bool,
    pub(crate) level_complete: bool,
    pub(crate) game_running: bool,
    pub(crate) tick: u64,

    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Start a fresh playthrough at `start_level` (clamped to 1).
    pub fn new(start_level: u32, config: GameConfig) -> Self {
        let seed = config.rng_seed.unwrap_or_else(|| rand::rng().random());
        let grid = Grid::new(config.grid_cols, config.grid_rows, config.border_thickness);
        let player = Player::new(config.grid_cols / 2, config.grid_rows - 2);

        let mut session = GameSession {
            grid,
            player,
            enemies: Vec::new(),
            trail: Vec::new(),
            is_drawing: false,
            score: 0,
            lives: config.starting_lives,
            level: start_level.max(1),
            captured_percentage: 0.0,
            last_score_milestone: 0,
            game_over: false,
            level_complete: false,
            game_running: true,
            tick: 0,
            rng: Pcg32::seed_from_u64(seed),
            config,
        };
        session.enemies = ai::spawn_enemies(
            session.level,
            &session.config,
            &session.grid,
            &session.player,
            &mut session.rng,
        );
        session.captured_percentage = session.grid.captured_percentage();
        session
    }

    /// Set the pending movement direction for the next tick.
    /// Ignored while paused or after game over.
    pub fn handle_input(&mut self, dir: MoveDir) {
        if !self.game_running || self.game_over {
            return;
        }
        let (dx, dy) = dir.delta();
        self.player.dx = dx;
        self.player.dy = dy;
    }

    /// Advance exactly one fixed tick. No-op unless the game is running.
    pub fn step(&mut self) -> Vec<GameEvent> {
        super::step::step(self)
    }

    /// Advance to the next level. Valid only while `level_complete` is
    /// set (after `step` reported the capture target reached).
    pub fn trigger_next_level(&mut self) {
        if !self.level_complete {
            return;
        }
        self.level += 1;
        self.start_level();
    }

    /// Deep, independent copy of the observable state. Mutating it has
    /// no effect on the session.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            lives: self.lives,
            level: self.level,
            captured_percentage: self.captured_percentage,
            player: self.player.clone(),
            grid: self.grid.clone(),
            enemies: self.enemies.clone(),
            is_drawing: self.is_drawing,
            trail: self.trail.clone(),
            game_over: self.game_over,
            level_complete: self.level_complete,
            game_running: self.game_running,
            grid_cols: self.grid.cols(),
            grid_rows: self.grid.rows(),
            target_percentage: self.config.target_percentage,
        }
    }

    // ── Internal lifecycle ──

    fn start_coords(&self) -> (i32, i32) {
        (self.config.grid_cols / 2, self.config.grid_rows - 2)
    }

    pub(crate) fn reset_player(&mut self) {
        let (x, y) = self.start_coords();
        self.player.x = x;
        self.player.y = y;
        self.player.halt();
    }

    /// Take a life: roll the live trail back to open field, reset the
    /// player, and end the game when no lives remain.
    pub(crate) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.is_drawing = false;
        for p in &self.trail {
            if self.grid.cell(p.x, p.y) == Some(Cell::Trail) {
                self.grid.set(p.x, p.y, Cell::Uncaptured);
            }
        }
        self.trail.clear();
        self.reset_player();

        if self.lives == 0 {
            self.game_over = true;
            self.game_running = false;
        }
    }

    /// (Re)build the current level: fresh grid and roster, player at the
    /// start cell, milestone anchored to the score carried over.
    pub(crate) fn start_level(&mut self) {
        self.is_drawing = false;
        self.trail.clear();
        self.grid = Grid::new(
            self.config.grid_cols,
            self.config.grid_rows,
            self.config.border_thickness,
        );
        self.enemies = ai::spawn_enemies(
            self.level,
            &self.config,
            &self.grid,
            &self.player,
            &mut self.rng,
        );
        self.reset_player();
        self.captured_percentage = self.grid.captured_percentage();
        if self.config.extra_life_interval > 0 {
            self.last_score_milestone =
                self.score / self.config.extra_life_interval * self.config.extra_life_interval;
        }
        self.level_complete = false;
        self.game_over = false;
        self.game_running = true;
    }
}

/// Deep, independent snapshot of a session: the sole read channel for
/// renderers and UI.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub captured_percentage: f64,
    pub player: Player,
    pub grid: Grid,
    pub enemies: Vec<Enemy>,
    pub is_drawing: bool,
    pub trail: Vec<Point>,
    pub game_over: bool,
    pub level_complete: bool,
    pub game_running: bool,
    pub grid_cols: i32,
    pub grid_rows: i32,
    pub target_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::EnemyKind;

    fn config() -> GameConfig {
        GameConfig {
            grid_cols: 16,
            grid_rows: 12,
            border_thickness: 2,
            rng_seed: Some(7),
            ..GameConfig::default()
        }
    }

    #[test]
    fn fresh_session_state() {
        let session = GameSession::new(1, config());
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
        assert_eq!(session.level, 1);
        assert!(session.game_running);
        assert!(!session.game_over);
        assert!(!session.level_complete);
        assert!(!session.is_drawing);
        assert_eq!(session.captured_percentage, 0.0);
        assert_eq!((session.player.x, session.player.y), (8, 10));
        assert_eq!(session.enemies.len(), 2);
    }

    #[test]
    fn start_level_floor_is_one() {
        let session = GameSession::new(0, config());
        assert_eq!(session.level, 1);
    }

    #[test]
    fn input_sets_pending_direction() {
        let mut session = GameSession::new(1, config());
        session.handle_input(MoveDir::Left);
        assert_eq!((session.player.dx, session.player.dy), (-1, 0));
        session.handle_input(MoveDir::Down);
        assert_eq!((session.player.dx, session.player.dy), (0, 1));
    }

    #[test]
    fn input_ignored_after_game_over() {
        let mut session = GameSession::new(1, config());
        session.lives = 1;
        session.lose_life();
        assert!(session.game_over);

        session.handle_input(MoveDir::Up);
        assert_eq!((session.player.dx, session.player.dy), (0, 0));
    }

    #[test]
    fn losing_a_life_rolls_back_the_trail() {
        let mut session = GameSession::new(1, config());
        session.is_drawing = true;
        session.trail = vec![Point::new(5, 5), Point::new(5, 6)];
        session.grid.set(5, 5, Cell::Trail);
        session.grid.set(5, 6, Cell::Trail);

        session.lose_life();
        assert_eq!(session.lives, 2);
        assert!(!session.is_drawing);
        assert!(session.trail.is_empty());
        assert_eq!(session.grid.cell(5, 5), Some(Cell::Uncaptured));
        assert_eq!(session.grid.cell(5, 6), Some(Cell::Uncaptured));
        assert_eq!((session.player.x, session.player.y), (8, 10));
        assert!(!session.game_over);
    }

    #[test]
    fn trigger_next_level_requires_level_complete() {
        let mut session = GameSession::new(1, config());
        session.trigger_next_level();
        assert_eq!(session.level, 1);

        session.score = 4321;
        session.level_complete = true;
        session.game_running = false;
        session.trigger_next_level();
        assert_eq!(session.level, 2);
        assert!(session.game_running);
        assert!(!session.level_complete);
        // Score and lives carry over; the grid is rebuilt.
        assert_eq!(session.score, 4321);
        assert_eq!(session.lives, 3);
        assert_eq!(session.captured_percentage, 0.0);
        // Milestone re-anchored below the carried score.
        assert_eq!(session.last_score_milestone, 0);
    }

    #[test]
    fn next_level_scales_the_roster() {
        let mut session = GameSession::new(1, config());
        for _ in 0..5 {
            session.level_complete = true;
            session.trigger_next_level();
        }
        assert_eq!(session.level, 6);
        assert_eq!(session.enemies.len(), 5);
        assert_eq!(
            session.enemies.iter().filter(|e| e.kind == EnemyKind::Patroller).count(),
            3
        );
    }

    #[test]
    fn snapshot_is_independent_of_the_session() {
        let mut session = GameSession::new(1, config());
        let view = session.snapshot();
        assert_eq!(view.grid_cols, 16);
        assert_eq!(view.grid_rows, 12);
        assert_eq!(view.target_percentage, 75.0);
        assert_eq!(view.enemies.len(), session.enemies.len());

        // Mutate the session; the snapshot keeps the old state.
        session.grid.set(5, 5, Cell::Trail);
        session.score = 999;
        assert_eq!(view.grid.cell(5, 5), Some(Cell::Uncaptured));
        assert_eq!(view.score, 0);
    }
}
