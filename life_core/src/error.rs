// error.rs - Error taxonomy for the Life core

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Debug, Error)]
pub enum LifeError {
    /// Construction with a non-positive (or unaddressable) width/height.
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: i64, height: i64 },

    /// Coordinate outside `[0,width) x [0,height)`. Never touches state.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: usize, height: usize },

    #[error("cell value {0} is not binary (expected 0 or 1)")]
    InvalidCellValue(u8),

    /// Persisted record failed validation; nothing was installed.
    #[error("corrupt grid state: {0}")]
    CorruptState(String),

    #[error("{} is not a Game of Life configuration file (.glconf)", .0.display())]
    NotConfigFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
