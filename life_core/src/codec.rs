// codec.rs - Fixed-layout persistence for a grid
//
// Layout: width (i32 LE), height (i32 LE), then width*height cell bytes in
// row-major order, each 0 or 1. Nothing else is stored.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{LifeError, Result};
use crate::grid::{ALIVE, GridState};

pub const HEADER_LEN: usize = 8;
pub const FILE_EXTENSION: &str = "glconf";

pub fn encode(grid: &GridState) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + grid.cells().len());
    out.extend_from_slice(&(grid.width() as i32).to_le_bytes());
    out.extend_from_slice(&(grid.height() as i32).to_le_bytes());
    out.extend_from_slice(grid.cells());
    out
}

/// Rebuilds a grid, rejecting anything that is not exactly one well-formed
/// record.
pub fn decode(bytes: &[u8]) -> Result<GridState> {
    if bytes.len() < HEADER_LEN {
        return Err(LifeError::CorruptState(format!(
            "record is {} bytes, shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    let width = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let height = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if width <= 0 || height <= 0 {
        return Err(LifeError::CorruptState(format!(
            "stored dimensions {width}x{height} are not positive"
        )));
    }

    let cells = &bytes[HEADER_LEN..];
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| LifeError::CorruptState(format!("{width}x{height} overflows")))?;
    if cells.len() != expected {
        return Err(LifeError::CorruptState(format!(
            "{width}x{height} grid needs {expected} cell bytes, found {}",
            cells.len()
        )));
    }
    if let Some(pos) = cells.iter().position(|&c| c > ALIVE) {
        return Err(LifeError::CorruptState(format!(
            "cell {pos} holds {}, expected 0 or 1",
            cells[pos]
        )));
    }

    Ok(GridState::from_cells(width as usize, height as usize, cells.to_vec()))
}

pub fn write_to<W: Write>(grid: &GridState, mut writer: W) -> Result<()> {
    writer.write_all(&encode(grid))?;
    writer.flush()?;
    Ok(())
}

/// Reads the reader to its end and decodes one record.
pub fn read_from<R: Read>(mut reader: R) -> Result<GridState> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

/// `path` with the `.glconf` extension appended when it is missing.
pub fn config_path(path: &Path) -> PathBuf {
    if has_config_extension(path) {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(FILE_EXTENSION);
        PathBuf::from(name)
    }
}

fn has_config_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == FILE_EXTENSION)
}

/// Saves to `path`, adding `.glconf` if needed. Returns the path written.
pub fn save_file(grid: &GridState, path: &Path) -> Result<PathBuf> {
    let path = config_path(path);
    fs::write(&path, encode(grid))?;
    info!(path = %path.display(), width = grid.width(), height = grid.height(), "saved grid");
    Ok(path)
}

pub fn load_file(path: &Path) -> Result<GridState> {
    if !has_config_extension(path) {
        return Err(LifeError::NotConfigFile(path.to_path_buf()));
    }
    let grid = decode(&fs::read(path)?)?;
    info!(path = %path.display(), width = grid.width(), height = grid.height(), "loaded grid");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    fn sample() -> GridState {
        let mut grid = GridState::new(3, 2).unwrap();
        grid.set_cell(0, 0, ALIVE).unwrap();
        grid.set_cell(2, 1, ALIVE).unwrap();
        grid
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("life_core_{}_{name}", std::process::id()))
    }

    #[test]
    fn encodes_exact_layout() {
        let bytes = encode(&sample());
        assert_eq!(bytes, vec![3, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn decode_restores_cells_and_resets_generation() {
        let mut grid = sample();
        engine::step(&mut grid);
        let restored = decode(&encode(&grid)).unwrap();
        assert_eq!(restored.cells(), grid.cells());
        assert_eq!(restored.generation(), 0);
        assert_eq!((restored.width(), restored.height()), (3, 2));
    }

    #[test]
    fn rejects_short_header() {
        assert!(matches!(decode(&[3, 0, 0]), Err(LifeError::CorruptState(_))));
        assert!(matches!(decode(&[]), Err(LifeError::CorruptState(_))));
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut bytes = encode(&sample());
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(LifeError::CorruptState(_))));
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(decode(&bytes), Err(LifeError::CorruptState(_))));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let mut bytes = encode(&sample());
        bytes[0..4].copy_from_slice(&(-3i32).to_le_bytes());
        assert!(matches!(decode(&bytes), Err(LifeError::CorruptState(_))));
        assert!(matches!(decode(&[0; HEADER_LEN]), Err(LifeError::CorruptState(_))));
    }

    #[test]
    fn rejects_non_binary_cells() {
        let mut bytes = encode(&sample());
        bytes[HEADER_LEN + 1] = 2;
        assert!(matches!(decode(&bytes), Err(LifeError::CorruptState(_))));
    }

    #[test]
    fn reader_and_writer_agree() {
        let mut buf = Vec::new();
        write_to(&sample(), &mut buf).unwrap();
        let back = read_from(buf.as_slice()).unwrap();
        assert_eq!(back.cells(), sample().cells());
    }

    #[test]
    fn config_path_appends_extension_once() {
        assert_eq!(config_path(Path::new("saves/glider")), PathBuf::from("saves/glider.glconf"));
        assert_eq!(config_path(Path::new("glider.glconf")), PathBuf::from("glider.glconf"));
        assert_eq!(config_path(Path::new("glider.txt")), PathBuf::from("glider.txt.glconf"));
    }

    #[test]
    fn file_save_and_load() {
        let written = save_file(&sample(), &temp_path("file_save_and_load")).unwrap();
        assert_eq!(written.extension().unwrap(), FILE_EXTENSION);

        let loaded = load_file(&written).unwrap();
        assert_eq!(loaded.cells(), sample().cells());
        fs::remove_file(written).unwrap();
    }

    #[test]
    fn load_requires_config_extension() {
        let err = load_file(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, LifeError::NotConfigFile(_)));
    }

    #[test]
    fn load_of_missing_file_is_io_error() {
        let err = load_file(&temp_path("missing.glconf")).unwrap_err();
        assert!(matches!(err, LifeError::Io(_)));
    }
}
