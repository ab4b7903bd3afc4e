use thiserror::Error;

/// A color token that could not be interpreted as a hex string,
/// packed value or CSS color keyword.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognized color specification {0:?}")]
pub struct ColorParseError(pub String);

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid color at row {row}, column {col}: {source}")]
    InvalidColor {
        row: usize,
        col: usize,
        source: ColorParseError,
    },
}
