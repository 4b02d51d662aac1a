// engine.rs - Generation step for the toroidal Life grid

use crate::error::Result;
use crate::grid::{ALIVE, DEAD, GridState};

/// (dx, dy) of the 8 neighbours, row by row.
#[rustfmt::skip]
const NEIGHBOR_DELTAS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Conway's fixed rule: birth on 3, survival on 2 or 3.
#[inline]
#[rustfmt::skip]
pub fn next_state(cell: u8, neighbors: u8) -> u8 {
    match (cell, neighbors) {
        (ALIVE, 2) | (ALIVE, 3) => ALIVE,   // Survival
        (DEAD, 3)               => ALIVE,   // Birth
        _                       => DEAD,    // Death or stays dead
    }
}

/// Advances `state` by one generation.
///
/// Every successor is written into the scratch buffer from the untouched
/// current generation, then the two buffers trade places. Cells off the
/// border use precomputed flat offsets; the border ring wraps with modulo
/// arithmetic. Both paths count the same neighbours.
pub fn step(state: &mut GridState) {
    let (width, height) = (state.width(), state.height());
    let current = &state.current;
    let next = &mut state.next;

    // Interior: every neighbour is a fixed flat offset away
    if width >= 3 && height >= 3 {
        let offsets = flat_offsets(width);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let i = y * width + x;
                next[i] = next_state(current[i], count_interior(current, i, &offsets));
            }
        }
    }

    // Top and bottom rows (the same row when height == 1)
    let last_row = width * (height - 1);
    for x in 0..width {
        next[x] = next_state(current[x], count_wrapped(current, width, height, x, 0));
        let i = last_row + x;
        next[i] = next_state(current[i], count_wrapped(current, width, height, x, height - 1));
    }

    // Left and right columns, corners already done
    for y in 1..height.saturating_sub(1) {
        let row = y * width;
        next[row] = next_state(current[row], count_wrapped(current, width, height, 0, y));
        let i = row + width - 1;
        next[i] = next_state(current[i], count_wrapped(current, width, height, width - 1, y));
    }

    std::mem::swap(&mut state.current, &mut state.next);
    state.generation += 1;
}

/// Live toroidal neighbours of an in-bounds cell.
pub fn neighbor_count(state: &GridState, x: i32, y: i32) -> Result<u8> {
    state.get_cell(x, y)?;
    Ok(count_wrapped(
        state.cells(),
        state.width(),
        state.height(),
        x as usize,
        y as usize,
    ))
}

fn flat_offsets(width: usize) -> [isize; 8] {
    NEIGHBOR_DELTAS.map(|(dx, dy)| dy * width as isize + dx)
}

#[inline]
fn count_interior(cells: &[u8], i: usize, offsets: &[isize; 8]) -> u8 {
    offsets.iter().map(|&o| cells[i.wrapping_add_signed(o)]).sum()
}

#[inline]
fn count_wrapped(cells: &[u8], width: usize, height: usize, x: usize, y: usize) -> u8 {
    let (w, h) = (width as isize, height as isize);
    NEIGHBOR_DELTAS
        .iter()
        .map(|&(dx, dy)| {
            let bx = (x as isize + dx).rem_euclid(w) as usize;
            let by = (y as isize + dy).rem_euclid(h) as usize;
            cells[by * width + bx]
        })
        .sum()
}
