//! Simulation core of a fixed-viewport, Galaga-style arcade shooter.
//!
//! The library holds everything that runs inside a tick; the binary adds a
//! terminal renderer, keyboard capture and the wall-clock scheduler.

pub mod collision;
pub mod compute;
pub mod config;
pub mod difficulty;
pub mod entities;
pub mod error;
pub mod input;
pub mod math;
pub mod persistence;
pub mod state;
pub mod store;
