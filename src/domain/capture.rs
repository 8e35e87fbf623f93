//! Enclosure capture: converts a just-completed trail into claimed ground.
//!
//! The trail is marked as boundary on a scratch copy of the grid, then
//! every open-field region touching the trail is discovered by 4-connected
//! flood fill. Regions holding an enemy are never claimed: enclosing an
//! enemy does not win that land. Every enemy-free region is claimed, and a
//! single trail can close off several disjoint regions at once (a diagonal
//! cut claims both sides).
//!
//! The engine also owns trail cleanup: after `resolve` returns, no cell
//! on the trail is left in `Trail` state, capture or not.

use std::collections::VecDeque;

use super::cell::Cell;
use super::entity::{Enemy, Point};
use super::grid::Grid;

const DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One flood-filled open-field region.
struct FillRegion {
    cells: Vec<Point>,
    contains_enemy: bool,
}

/// Resolve a completed trail against the authoritative grid.
///
/// Returns the number of newly claimed cells, counting only cells that
/// were open field before this call (the trail's own cells are promoted
/// to `Captured` but not counted). Trails shorter than two points cannot
/// enclose anything and resolve to 0.
pub fn resolve(grid: &mut Grid, trail: &[Point], enemies: &[Enemy]) -> usize {
    if trail.len() < 2 {
        flush_trail(grid, trail);
        return 0;
    }

    // Boundary marking happens on a scratch copy; the authoritative grid
    // is only touched in the apply phase below.
    let mut scratch = grid.clone();
    for p in trail {
        if scratch.cell(p.x, p.y).is_some() {
            scratch.set(p.x, p.y, Cell::Captured);
        }
    }

    // One visited bitmap for the whole pass: a region reachable from
    // several trail points is filled exactly once.
    let mut visited = vec![vec![false; scratch.cols().max(0) as usize]; scratch.rows().max(0) as usize];
    let mut regions: Vec<FillRegion> = Vec::new();

    for p in trail {
        for (dx, dy) in DIRS {
            let seed = Point::new(p.x + dx, p.y + dy);
            if scratch.cell(seed.x, seed.y) == Some(Cell::Uncaptured)
                && !visited[seed.y as usize][seed.x as usize]
            {
                regions.push(flood_fill(&scratch, enemies, &mut visited, seed));
            }
        }
    }

    let mut captured = 0;
    for region in regions.iter().filter(|r| !r.contains_enemy) {
        for p in &region.cells {
            if grid.cell(p.x, p.y) == Some(Cell::Uncaptured) {
                grid.set(p.x, p.y, Cell::Captured);
                captured += 1;
            }
        }
    }

    flush_trail(grid, trail);
    captured
}

/// 4-connected fill over open field from `seed`, bounded by claimed
/// ground, trail boundary and the grid edge. Records whether any enemy
/// currently stands inside.
fn flood_fill(
    scratch: &Grid,
    enemies: &[Enemy],
    visited: &mut [Vec<bool>],
    seed: Point,
) -> FillRegion {
    let mut queue: VecDeque<Point> = VecDeque::new();
    let mut cells = Vec::new();
    let mut contains_enemy = false;

    visited[seed.y as usize][seed.x as usize] = true;
    queue.push_back(seed);

    while let Some(p) = queue.pop_front() {
        if enemies.iter().any(|e| e.x == p.x && e.y == p.y) {
            contains_enemy = true;
        }
        cells.push(p);

        for (dx, dy) in DIRS {
            let n = Point::new(p.x + dx, p.y + dy);
            if scratch.cell(n.x, n.y) == Some(Cell::Uncaptured)
                && !visited[n.y as usize][n.x as usize]
            {
                visited[n.y as usize][n.x as usize] = true;
                queue.push_back(n);
            }
        }
    }

    FillRegion { cells, contains_enemy }
}

/// The trail itself always resolves to claimed ground. Points whose cell
/// is not `Trail` (the completing cell on the border, cells already
/// claimed by the fill) are left alone.
fn flush_trail(grid: &mut Grid, trail: &[Point]) {
    for p in trail {
        if grid.cell(p.x, p.y) == Some(Cell::Trail) {
            grid.set(p.x, p.y, Cell::Captured);
        }
    }
}
