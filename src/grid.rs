use std::str::FromStr;

use crate::color::Color;
use crate::error::GeometryError;

/// A validated rectangular grid of pixel colors, row-major, row 0 at the
/// top of the image. Rows are checked for equal length at construction so
/// the mesh builder never has to consider ragged input.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelGrid {
    colors: Vec<Color>,
    rows: usize,
    columns: usize,
}

impl PixelGrid {
    /// Grid with no rows. Builds an empty mesh.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a grid from rows of colors. Every row must have the same
    /// length as the first; a ragged grid is rejected.
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, GeometryError> {
        let row_count = rows.len();
        let columns = rows.first().map_or(0, Vec::len);

        let mut colors = Vec::with_capacity(row_count * columns);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != columns {
                return Err(GeometryError::RaggedGrid {
                    row,
                    expected: columns,
                    found: cells.len(),
                });
            }
            colors.extend(cells);
        }

        Ok(Self {
            colors,
            rows: row_count,
            columns,
        })
    }

    /// Builds a grid from text rows of whitespace-separated color tokens,
    /// e.g. `&["red green", "#00f white"]`.
    pub fn parse_rows(rows: &[&str]) -> Result<Self, GeometryError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let mut cells = Vec::new();
            for (col, token) in line.split_whitespace().enumerate() {
                let color = Color::from_str(token)
                    .map_err(|source| GeometryError::InvalidColor { row, col, source })?;
                cells.push(color);
            }
            parsed.push(cells);
        }
        Self::from_rows(parsed)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `(row, col)`. Panics if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Color {
        assert!(row < self.rows && col < self.columns);
        self.colors[row * self.columns + col]
    }
}
