// guard.rs - Shared, mutually exclusive access to one GridState
//
// Every read or write takes the lock for exactly one logical operation. The
// editor, the renderer and the tick loop all hold a clone of the same Guard.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::codec;
use crate::engine;
use crate::error::Result;
use crate::grid::GridState;
use crate::patterns::{self, Pattern};

#[derive(Debug, Clone)]
pub struct Guard {
    grid: Arc<Mutex<GridState>>,
}

impl Guard {
    pub fn new(grid: GridState) -> Self {
        Self { grid: Arc::new(Mutex::new(grid)) }
    }

    /// Convenience for `Guard::new(GridState::new(width, height)?)`.
    pub fn create(width: i32, height: i32) -> Result<Self> {
        Ok(Self::new(GridState::new(width, height)?))
    }

    // A holder can only panic before `current` is touched or after a complete
    // mutation, so the grid behind a poisoned lock is still well formed.
    fn lock(&self) -> MutexGuard<'_, GridState> {
        self.grid.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("grid lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Result<u8> {
        self.lock().get_cell(x, y)
    }

    pub fn set_cell(&self, x: i32, y: i32, value: u8) -> Result<()> {
        self.lock().set_cell(x, y, value)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn width(&self) -> usize {
        self.lock().width()
    }

    pub fn height(&self) -> usize {
        self.lock().height()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }

    pub fn live_count(&self) -> usize {
        self.lock().live_count()
    }

    /// Computes one whole generation while holding the lock.
    pub fn step(&self) {
        engine::step(&mut self.lock());
    }

    /// Runs `f` against the grid under a single lock acquisition, e.g. to
    /// draw a whole frame.
    pub fn with_grid<R>(&self, f: impl FnOnce(&GridState) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> GridState {
        self.lock().clone()
    }

    /// Installs a different grid in place of the current one, returning the
    /// old grid. Any tick loop on this guard keeps running on the new grid;
    /// callers resizing should stop the loop first.
    pub fn replace(&self, grid: GridState) -> GridState {
        let mut guard = self.lock();
        debug!(width = grid.width(), height = grid.height(), "replacing grid");
        std::mem::replace(&mut *guard, grid)
    }

    /// Writes the grid as it is at one instant to a `.glconf` file. The lock
    /// is held only for the copy, not for the file write.
    pub fn save_file(&self, path: &Path) -> Result<PathBuf> {
        let snapshot = self.snapshot();
        codec::save_file(&snapshot, path)
    }

    pub fn seed_pattern(&self, pattern: &Pattern) {
        patterns::apply_pattern(&mut self.lock(), pattern);
    }

    pub fn seed_random(&self, seed: u64) {
        patterns::apply_random(&mut self.lock(), seed);
    }
}
