//! Entities: the player and the two enemy variants.
//!
//! Enemies share one payload (position, direction, speed, stuck-detection
//! bookkeeping) and differ only in their `EnemyKind` tag; the behavior
//! split lives in `ai`.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Pending movement direction (set by input, held until changed).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
        }
    }

    /// Map a DOM-style arrow key name, for shells that forward raw
    /// keyboard events.
    pub fn from_arrow_key(key: &str) -> Option<MoveDir> {
        match key {
            "ArrowUp" => Some(MoveDir::Up),
            "ArrowDown" => Some(MoveDir::Down),
            "ArrowLeft" => Some(MoveDir::Left),
            "ArrowRight" => Some(MoveDir::Right),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Player { x, y, dx: 0, dy: 0 }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Drop the pending direction.
    pub fn halt(&mut self) {
        self.dx = 0;
        self.dy = 0;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyKind {
    /// Free-roaming reflector: ricochets off claimed ground and grid edges.
    Bouncer,
    /// Border-walker: hugs the boundary of claimed ground.
    Patroller,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub speed: i32,
    /// Recent positions, bounded to `ai::HISTORY_LEN`. Drives stuck
    /// detection and the safety-net rollback.
    pub history: Vec<Point>,
    pub stuck: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: i32, y: i32, dx: i32, dy: i32, speed: i32) -> Self {
        Enemy {
            kind,
            x,
            y,
            dx,
            dy,
            speed,
            history: Vec::new(),
            stuck: 0,
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_key_names_map_to_directions() {
        assert_eq!(MoveDir::from_arrow_key("ArrowUp"), Some(MoveDir::Up));
        assert_eq!(MoveDir::from_arrow_key("ArrowDown"), Some(MoveDir::Down));
        assert_eq!(MoveDir::from_arrow_key("ArrowLeft"), Some(MoveDir::Left));
        assert_eq!(MoveDir::from_arrow_key("ArrowRight"), Some(MoveDir::Right));
        assert_eq!(MoveDir::from_arrow_key("Space"), None);
    }

    #[test]
    fn deltas_are_unit_vectors() {
        for dir in [MoveDir::Up, MoveDir::Down, MoveDir::Left, MoveDir::Right] {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
    }
}
