//! The step function: advances the session by exactly one tick.
//!
//! Processing order:
//!   1. Player intent: bounds check, enemy occupancy, cell classification
//!      (complete a trail / extend a trail / die on own trail)
//!   2. Capture resolution + scoring + level-complete check
//!   3. Enemy fleet update (array order, collision checks interleaved)
//!
//! Player consequences fully resolve before any enemy moves. Early
//! returns are deliberate tick truncations (life loss, level complete),
//! not error paths.

use crate::domain::ai::{self, Contact};
use crate::domain::capture;
use crate::domain::cell::Cell;
use crate::domain::entity::{EnemyKind, Point};

use super::event::{DeathCause, GameEvent};
use super::session::GameSession;

/// Whether the rest of the tick still runs.
enum TickFlow {
    Continue,
    Halt,
}

pub(crate) fn step(session: &mut GameSession) -> Vec<GameEvent> {
    if !session.game_running || session.game_over {
        return vec![];
    }

    let mut events = Vec::new();
    session.tick += 1;

    if let TickFlow::Halt = resolve_player(session, &mut events) {
        return events;
    }

    if let Some(contact) = ai::update_enemies(
        &mut session.enemies,
        &session.grid,
        &session.player,
        &session.trail,
        session.is_drawing,
    ) {
        let cause = match contact {
            Contact::Trail => DeathCause::EnemyOnTrail,
            Contact::Player => DeathCause::EnemyContact,
        };
        resolve_life_loss(session, cause, &mut events);
    }

    events
}

// ── Player movement & trail ──

fn resolve_player(session: &mut GameSession, events: &mut Vec<GameEvent>) -> TickFlow {
    let (dx, dy) = (session.player.dx, session.player.dy);
    if dx == 0 && dy == 0 {
        return TickFlow::Continue;
    }

    let nx = session.player.x + dx;
    let ny = session.player.y + dy;

    let Some(target) = session.grid.cell(nx, ny) else {
        // Walking off the grid cancels the pending direction outright.
        session.player.halt();
        return TickFlow::Continue;
    };

    // An enemy on the target cell resolves before the move: patrollers
    // are always lethal, bouncers only threaten a player mid-trail;
    // otherwise the bump just blocks the move.
    if let Some(kind) = session
        .enemies
        .iter()
        .find(|e| e.x == nx && e.y == ny)
        .map(|e| e.kind)
    {
        if kind == EnemyKind::Patroller || session.is_drawing {
            resolve_life_loss(session, DeathCause::EnemyContact, events);
            return TickFlow::Halt;
        }
        return TickFlow::Continue;
    }

    match target {
        Cell::Captured => {
            if session.is_drawing {
                return resolve_trail_completion(session, nx, ny, events);
            }
            session.player.x = nx;
            session.player.y = ny;
            TickFlow::Continue
        }
        Cell::Uncaptured => {
            if !session.is_drawing {
                session.is_drawing = true;
                session.trail.clear();
                events.push(GameEvent::TrailStarted { x: nx, y: ny });
            }
            session.trail.push(Point::new(nx, ny));
            session.grid.set(nx, ny, Cell::Trail);
            session.player.x = nx;
            session.player.y = ny;
            TickFlow::Continue
        }
        Cell::Trail => {
            resolve_life_loss(session, DeathCause::OwnTrail, events);
            TickFlow::Halt
        }
    }
}

/// The player stepped back onto claimed ground with a live trail: close
/// it, claim what it enclosed, score it, and check the level target.
fn resolve_trail_completion(
    session: &mut GameSession,
    nx: i32,
    ny: i32,
    events: &mut Vec<GameEvent>,
) -> TickFlow {
    session.is_drawing = false;
    session.trail.push(Point::new(nx, ny));

    let trail = std::mem::take(&mut session.trail);
    let claimed = capture::resolve(&mut session.grid, &trail, &session.enemies);

    if claimed > 0 {
        session.score += claimed as u32 * session.config.cell_points;
        events.push(GameEvent::CellsCaptured { count: claimed });
        award_milestone_lives(session, events);
    }
    session.captured_percentage = session.grid.captured_percentage();

    session.player.x = nx;
    session.player.y = ny;

    if session.captured_percentage >= session.config.target_percentage {
        let bonus = session.config.level_bonus * session.level;
        session.score += bonus;
        session.level_complete = true;
        session.game_running = false;
        events.push(GameEvent::LevelComplete {
            level: session.level,
            bonus,
        });
        return TickFlow::Halt;
    }
    TickFlow::Continue
}

/// Award one life per crossed score milestone; a big capture can cross
/// several at once.
fn award_milestone_lives(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let interval = session.config.extra_life_interval;
    if interval == 0 {
        return;
    }
    let mut gained = 0;
    while session.score >= session.last_score_milestone + interval {
        session.lives += 1;
        session.last_score_milestone += interval;
        gained += 1;
    }
    if gained > 0 {
        events.push(GameEvent::ExtraLives {
            gained,
            lives: session.lives,
        });
    }
}

fn resolve_life_loss(session: &mut GameSession, cause: DeathCause, events: &mut Vec<GameEvent>) {
    session.lose_life();
    events.push(GameEvent::LifeLost {
        cause,
        lives: session.lives,
    });
    if session.game_over {
        events.push(GameEvent::GameOver {
            score: session.score,
        });
    }
}
