// grid.rs - Double-buffered toroidal grid for Conway's Game of Life

use crate::error::{LifeError, Result};

pub const DEAD: u8 = 0;
pub const ALIVE: u8 = 1;

/// One Life generation plus its scratch buffer.
///
/// Cells are stored row-major, `(x, y)` lives at `y * width + x`. The grid
/// does no locking of its own; share it through [`crate::Guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    width: usize,
    height: usize,
    pub(crate) current: Vec<u8>,    // Generation being read/edited
    pub(crate) next: Vec<u8>,       // Scratch written by `step`, then swapped in
    pub(crate) generation: u64,
}

impl GridState {
    /// Zero-filled grid of the given size.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let invalid = || LifeError::InvalidDimensions {
            width: width as i64,
            height: height as i64,
        };
        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let (w, h) = (width as usize, height as usize);
        let size = w.checked_mul(h).ok_or_else(invalid)?;

        Ok(Self {
            width: w,
            height: h,
            current: zeroed(size).ok_or_else(invalid)?,
            next: zeroed(size).ok_or_else(invalid)?,
            generation: 0,
        })
    }

    /// Builds a grid around an already validated row-major cell buffer.
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        let next = vec![DEAD; cells.len()];
        Self {
            width,
            height,
            current: cells,
            next,
            generation: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of completed steps since creation, load or the last clear.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Row-major view of the current generation.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.current
    }

    pub fn live_count(&self) -> usize {
        self.current.iter().filter(|&&c| c == ALIVE).count()
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Result<u8> {
        let index = self.index(x, y)?;
        Ok(self.current[index])
    }

    pub fn set_cell(&mut self, x: i32, y: i32, value: u8) -> Result<()> {
        let index = self.index(x, y)?;
        if value > ALIVE {
            return Err(LifeError::InvalidCellValue(value));
        }
        self.current[index] = value;
        Ok(())
    }

    /// Kills every cell of the current generation. `next` is scratch and is
    /// left as is.
    pub fn clear(&mut self) {
        self.current.fill(DEAD);
        self.generation = 0;
    }

    /// Sets a cell, wrapping the coordinates onto the torus.
    pub(crate) fn set_wrapped(&mut self, x: i64, y: i64, value: u8) {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.current[y * self.width + x] = value;
    }

    fn index(&self, x: i32, y: i32) -> Result<usize> {
        let in_bounds = x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height;
        if !in_bounds {
            return Err(LifeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }
}

/// Dead-filled buffer, or `None` when the allocator cannot provide it.
fn zeroed(size: usize) -> Option<Vec<u8>> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(size).ok()?;
    cells.resize(size, DEAD);
    Some(cells)
}
