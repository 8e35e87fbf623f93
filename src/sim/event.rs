//! Events emitted during a simulation step.
//! The presentation layer consumes these for animation/sound/HUD cues.

/// Why a life was lost.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeathCause {
    /// The player ran into their own live trail.
    OwnTrail,
    /// An enemy stepped into the live trail.
    EnemyOnTrail,
    /// An enemy and the player met on the same cell.
    EnemyContact,
}

#[derive(Clone, Debug)]
pub enum GameEvent {
    TrailStarted { x: i32, y: i32 },
    CellsCaptured { count: usize },
    ExtraLives { gained: u32, lives: u32 },
    LifeLost { cause: DeathCause, lives: u32 },
    LevelComplete { level: u32, bonus: u32 },
    GameOver { score: u32 },
}
