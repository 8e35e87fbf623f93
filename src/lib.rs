//! Core simulation of a territory-capture arcade game.
//!
//! A player moves across a rectangular grid, carving a trail through open
//! field. Returning to claimed ground closes the trail and every enclosed,
//! enemy-free pocket of field is converted to claimed territory by flood
//! fill. Two kinds of hostile entities threaten the run: bouncers ricochet
//! through the open field, patrollers walk the border of claimed ground.
//! Touching either the player's live trail or (in the wrong situation) the
//! player costs a life.
//!
//! This crate is the simulation only. A presentation shell owns the clock,
//! the input devices and the screen: it forwards directional input via
//! [`GameSession::handle_input`], advances one fixed logic tick at a time
//! with [`GameSession::step`], and renders from [`GameSession::snapshot`].
//!
//! ```no_run
//! use gridclaim::{GameConfig, GameSession, MoveDir};
//!
//! let mut session = GameSession::new(1, GameConfig::default());
//! session.handle_input(MoveDir::Up);
//! let events = session.step();
//! let view = session.snapshot();
//! # let _ = (events, view);
//! ```

pub mod config;
pub mod domain;
pub mod sim;

pub use config::GameConfig;
pub use domain::cell::Cell;
pub use domain::entity::{Enemy, EnemyKind, MoveDir, Player, Point};
pub use domain::grid::Grid;
pub use sim::event::{DeathCause, GameEvent};
pub use sim::session::{GameSession, Snapshot};
