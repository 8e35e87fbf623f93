//! Enemy behaviors and the level spawner.
//!
//! Two movement machines share one chassis (position, direction, speed,
//! history, stuck counter):
//!
//!   - **Bouncer** — roams the open field in unit steps, reflecting off
//!     claimed ground and the grid edge, axis by axis. Never enters
//!     claimed territory.
//!   - **Patroller** — walks claimed ground in single strides, reflecting
//!     off any axis whose near cell is open field, which keeps it hugging
//!     the boundary. Never leaves claimed territory.
//!
//! Touching the player's live trail is a life-loss signal returned to the
//! caller; the enemy's move is aborted, never applied. Both machines run
//! stuck detection over a short position history and carry a safety-net
//! rollback for positions that violate their terrain invariant. Those
//! are recovered locally and logged, never propagated.

use log::{debug, error, warn};
use rand::Rng;

use crate::config::GameConfig;

use super::cell::Cell;
use super::entity::{Enemy, EnemyKind, Player, Point};
use super::grid::Grid;

/// Bounded position-history length used for stuck detection.
pub const HISTORY_LEN: usize = 4;
/// Consecutive no-progress ticks before a forced direction reversal.
pub const STUCK_THRESHOLD: u32 = 10;

const SPAWN_ATTEMPTS: u32 = 100;

/// First life-losing contact made during a fleet update.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    /// An enemy stepped into the live trail.
    Trail,
    /// An enemy ended its move on the player while the player was drawing.
    Player,
}

// ── Fleet update ──

/// Advance every enemy one tick, in array order. Stops at the first
/// life-losing contact; enemies after it keep their pre-tick state.
pub fn update_enemies(
    enemies: &mut [Enemy],
    grid: &Grid,
    player: &Player,
    trail: &[Point],
    is_drawing: bool,
) -> Option<Contact> {
    for enemy in enemies.iter_mut() {
        let hit_trail = match enemy.kind {
            EnemyKind::Bouncer => step_bouncer(enemy, grid, trail, is_drawing),
            EnemyKind::Patroller => step_patroller(enemy, grid, trail, is_drawing),
        };
        if hit_trail {
            return Some(Contact::Trail);
        }
        if is_drawing && enemy.x == player.x && enemy.y == player.y {
            return Some(Contact::Player);
        }
    }
    None
}

// ── Bouncer ──

/// One bouncer tick: up to `speed` unit steps with axis-wise reflection.
/// Returns true on a trail hit (life loss); the position change for the
/// whole tick is discarded in that case.
fn step_bouncer(enemy: &mut Enemy, grid: &Grid, trail: &[Point], is_drawing: bool) -> bool {
    let blocked = |cx: i32, cy: i32| grid.cell(cx, cy).map_or(true, |c| c.is_captured());

    let mut x = enemy.x;
    let mut y = enemy.y;
    let mut dx = enemy.dx;
    let mut dy = enemy.dy;

    for _ in 0..enemy.speed.abs() {
        let step_x = x + dx.signum();
        let step_y = y + dy.signum();

        let hit_x = blocked(step_x, y);
        let hit_y = blocked(x, step_y);

        if !hit_x && !hit_y && blocked(step_x, step_y) {
            // Genuine corner: both components reverse, the tick ends here.
            dx = -dx;
            dy = -dy;
            break;
        }

        let mut tx = step_x;
        let mut ty = step_y;
        let mut bounced = false;
        if hit_x {
            dx = -dx;
            tx = x;
            bounced = true;
        }
        if hit_y {
            dy = -dy;
            ty = y;
            bounced = true;
        }

        if is_drawing && trail.iter().any(|p| p.x == tx && p.y == ty) {
            enemy.dx = dx;
            enemy.dy = dy;
            return true;
        }

        x = tx;
        y = ty;
        if bounced {
            break;
        }
    }

    enemy.dx = dx;
    enemy.dy = dy;
    enemy.x = x;
    enemy.y = y;

    track_progress(enemy);
    if enemy.stuck >= STUCK_THRESHOLD {
        enemy.dx = -enemy.dx;
        enemy.dy = -enemy.dy;
        enemy.stuck = 0;
        enemy.history.clear();
    }

    // Invariant: a bouncer never stands on claimed ground. A capture
    // resolving under it mid-tick is the one way this can still happen.
    if grid.cell(enemy.x, enemy.y) == Some(Cell::Captured) {
        warn!("bouncer stranded on claimed ground at ({}, {}), rolling back", enemy.x, enemy.y);
        recover_bouncer(enemy, grid);
    }
    false
}

fn recover_bouncer(enemy: &mut Enemy, grid: &Grid) {
    match prior_position(enemy) {
        Some(p) if grid.cell(p.x, p.y).map_or(false, |c| !c.is_captured()) => {
            enemy.x = p.x;
            enemy.y = p.y;
        }
        _ => {
            enemy.dx = -enemy.dx;
            enemy.dy = -enemy.dy;
            error!("bouncer rollback failed at ({}, {})", enemy.x, enemy.y);
        }
    }
}

// ── Patroller ──

/// One patroller tick: a single stride of (dx, dy) along claimed ground,
/// reflecting off any axis whose near cell is not claimed. Returns true
/// on a trail hit at the intended (pre-reflection) cell.
fn step_patroller(enemy: &mut Enemy, grid: &Grid, trail: &[Point], is_drawing: bool) -> bool {
    let x = enemy.x;
    let y = enemy.y;
    let mut dx = enemy.dx;
    let mut dy = enemy.dy;

    if is_drawing && trail.iter().any(|p| p.x == x + dx && p.y == y + dy) {
        return true;
    }

    // Hug claimed ground: both axis checks use the pre-reflection stride.
    if grid.cell(x + dx, y) != Some(Cell::Captured) {
        dx = -dx;
    }
    if grid.cell(x, y + dy) != Some(Cell::Captured) {
        dy = -dy;
    }
    enemy.dx = dx;
    enemy.dy = dy;

    if grid.cell(x + dx, y + dy) == Some(Cell::Captured) {
        enemy.x = x + dx;
        enemy.y = y + dy;
    } else {
        // Inner corner: even the reflected target is off-path. Hold
        // position; the new direction gets its chance next tick.
        debug!("patroller held at ({x}, {y})");
    }

    track_progress(enemy);
    if enemy.stuck >= STUCK_THRESHOLD {
        enemy.dx = -enemy.dx;
        enemy.dy = -enemy.dy;
        if enemy.dx == 0 && enemy.dy == 0 && enemy.speed != 0 {
            enemy.dx = enemy.speed;
        }
        enemy.stuck = 0;
        enemy.history.clear();
    }

    // Invariant: a patroller never leaves claimed ground.
    if grid.cell(enemy.x, enemy.y) != Some(Cell::Captured) {
        warn!("patroller off path at ({}, {}), rolling back", enemy.x, enemy.y);
        recover_patroller(enemy, grid);
    }
    false
}

fn recover_patroller(enemy: &mut Enemy, grid: &Grid) {
    match prior_position(enemy) {
        Some(p) if grid.cell(p.x, p.y) == Some(Cell::Captured) => {
            enemy.x = p.x;
            enemy.y = p.y;
        }
        _ => {
            error!("patroller rollback failed at ({}, {}), resetting", enemy.x, enemy.y);
            enemy.x = 1;
            enemy.y = 1;
            enemy.dx = enemy.speed;
            enemy.dy = 0;
        }
    }
}

// ── Stuck detection (shared) ──

/// Record the post-move position and bump the stuck counter when the
/// whole history window shows no movement.
fn track_progress(enemy: &mut Enemy) {
    enemy.history.push(enemy.pos());
    if enemy.history.len() > HISTORY_LEN {
        enemy.history.remove(0);
    }
    let first = enemy.history[0];
    if enemy.history.len() == HISTORY_LEN && enemy.history.iter().all(|p| *p == first) {
        enemy.stuck += 1;
    } else {
        enemy.stuck = 0;
    }
}

/// Position before the current one, if the history still holds it.
fn prior_position(enemy: &Enemy) -> Option<Point> {
    enemy.history.len().checked_sub(2).map(|i| enemy.history[i])
}

// ── Spawner ──

/// Create the enemy roster for `level`.
///
/// Scaling: total = base + level/2, patrollers = base + level/3,
/// bouncers = max(1, total - patrollers), speed = max(1, base + (level-1)/4).
/// Patrollers cycle through four corner-adjacent slots on the starting
/// border with diagonal strides; bouncers are rejection-sampled onto open
/// field away from the player and each other.
pub fn spawn_enemies<R: Rng>(
    level: u32,
    cfg: &GameConfig,
    grid: &Grid,
    player: &Player,
    rng: &mut R,
) -> Vec<Enemy> {
    let total = cfg.base_enemy_count + level / 2;
    let patrollers = cfg.base_patroller_count + level / 3;
    let bouncers = total.saturating_sub(patrollers).max(1);
    let speed = (cfg.base_enemy_speed + (level.saturating_sub(1) / 4) as i32).max(1);

    let cols = grid.cols();
    let rows = grid.rows();
    let mut enemies = Vec::with_capacity((patrollers + bouncers) as usize);

    for i in 0..patrollers {
        let (x, y, dx, dy) = match i % 4 {
            0 => (2, 1, speed, speed),
            1 => (cols - 2, 2, -speed, speed),
            2 => (cols - 3, rows - 2, -speed, -speed),
            _ => (1, rows - 3, speed, -speed),
        };
        enemies.push(Enemy::new(EnemyKind::Patroller, x, y, dx, dy, speed));
    }

    for _ in 0..bouncers {
        let mut x = cols / 2;
        let mut y = rows / 2;
        let mut placed = false;
        for _ in 0..SPAWN_ATTEMPTS {
            x = rng.random_range(2..cols - 2);
            y = rng.random_range(2..rows - 2);
            let clear = grid.cell(x, y) == Some(Cell::Uncaptured)
                && !enemies.iter().any(|e| e.x == x && e.y == y)
                && !(x == player.x && y == player.y);
            if clear {
                placed = true;
                break;
            }
        }
        if !placed {
            warn!("no clear spawn cell found after {SPAWN_ATTEMPTS} attempts, using ({x}, {y})");
        }
        let (dx, dy) = match rng.random_range(0..4) {
            0 => (speed, speed),
            1 => (-speed, speed),
            2 => (-speed, -speed),
            _ => (speed, -speed),
        };
        enemies.push(Enemy::new(EnemyKind::Bouncer, x, y, dx, dy, speed));
    }

    enemies
}
