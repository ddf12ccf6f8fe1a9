use thiserror::Error;

/// Domain faults raised by the grid and search kernels.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i64, y: i64, width: usize, height: usize },

    #[error("transition from ({fx}, {fy}) to ({tx}, {ty}) is not a legal step")]
    IllegalTransition { fx: i64, fy: i64, tx: i64, ty: i64 },

    #[error("malformed map data: {0}")]
    MalformedMap(String),

    #[error("bad terrain weights file: {0}")]
    BadWeightsFile(String),
}

pub type GridResult<T> = Result<T, GridError>;
