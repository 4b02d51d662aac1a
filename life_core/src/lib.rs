//! Life core: Conway's Game of Life on a toroidal grid, safe to edit while a
//! background loop keeps stepping it.
//!
//! [`GridState`] holds two generation buffers and is not thread-safe on its
//! own. [`Guard`] serializes every access to one grid, and [`TickLoop`] steps
//! it through the Guard on a timer.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod guard;
pub mod patterns;
pub mod tick;

pub use config::SimConfig;
pub use error::{LifeError, Result};
pub use grid::{ALIVE, DEAD, GridState};
pub use guard::Guard;
pub use patterns::{PATTERNS, Pattern};
pub use tick::{TickLoop, TickState};
