//! Shape catalog - tetromino matrices and clockwise rotation
//!
//! A [`Shape`] is a small occupancy matrix (at most 4x4) stored as one
//! bitmask per row. Shapes are plain `Copy` values: rotating produces a new
//! matrix and never touches the original, and identity lookups compare
//! matrices structurally.
//!
//! The seven canonical orientations are fixed; [`identify`] recognizes a
//! shape in any of its four rotation states.

use std::fmt;

use crate::types::ShapeId;

/// Largest matrix side supported by [`Shape`]
pub const MAX_SHAPE_SIDE: u8 = 4;

/// Occupancy matrix of a piece in one rotation state
///
/// Bit `c` of `rows[r]` is set when column `c` of row `r` is occupied.
/// Bits and rows outside `width x height` are always zero, so the derived
/// equality is structural equality of the matrices.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: [u8; MAX_SHAPE_SIDE as usize],
    width: u8,
    height: u8,
}

/// Errors for shapes that cannot be represented or recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Matrix is empty, ragged, or larger than 4x4
    Malformed,
    /// Matrix is valid but matches no canonical shape in any rotation
    Unrecognized,
}

impl ShapeError {
    pub fn code(self) -> &'static str {
        match self {
            ShapeError::Malformed => "malformed_shape",
            ShapeError::Unrecognized => "unrecognized_shape",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ShapeError::Malformed => "shape matrix must be rectangular, non-empty and at most 4x4",
            ShapeError::Unrecognized => "shape matches no catalog tetromino in any rotation",
        }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ShapeError {}

impl Shape {
    /// Build from a row-major 0/1 matrix (any non-zero value counts as occupied)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::shape::Shape;
    ///
    /// let t = Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]).unwrap();
    /// assert_eq!((t.width(), t.height()), (3, 2));
    /// assert!(t.is_occupied(1, 1));
    /// assert!(!t.is_occupied(0, 1));
    /// ```
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, ShapeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0
            || width == 0
            || height > MAX_SHAPE_SIDE as usize
            || width > MAX_SHAPE_SIDE as usize
            || rows.iter().any(|r| r.len() != width)
        {
            return Err(ShapeError::Malformed);
        }

        let mut bits = [0u8; MAX_SHAPE_SIDE as usize];
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    bits[y] |= 1 << x;
                }
            }
        }

        Ok(Self {
            rows: bits,
            width: width as u8,
            height: height as u8,
        })
    }

    const fn from_bits(rows: [u8; 4], width: u8, height: u8) -> Self {
        Self {
            rows,
            width,
            height,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline(always)]
    pub fn is_occupied(&self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height && self.rows[y as usize] & (1 << x) != 0
    }

    /// Offsets `(dx, dy)` of occupied cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .filter(move |&x| self.is_occupied(x, y))
                .map(move |x| (x as i16, y as i16))
        })
    }

    pub fn cell_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    /// Rotate 90° clockwise (reverse rows, then transpose)
    ///
    /// Cell `(x, y)` of the result is cell `(y, height - 1 - x)` of `self`.
    pub fn rotate_cw(&self) -> Self {
        let mut rows = [0u8; MAX_SHAPE_SIDE as usize];
        // Result is `height` wide and `width` tall.
        for ny in 0..self.width {
            for nx in 0..self.height {
                if self.is_occupied(ny, self.height - 1 - nx) {
                    rows[ny as usize] |= 1 << nx;
                }
            }
        }
        Self {
            rows,
            width: self.height,
            height: self.width,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape[")?;
        for y in 0..self.height {
            if y > 0 {
                write!(f, "/")?;
            }
            for x in 0..self.width {
                write!(f, "{}", if self.is_occupied(x, y) { '#' } else { '.' })?;
            }
        }
        write!(f, "]")
    }
}

// Canonical orientations. Row bit 0 is the leftmost column.
const T_SHAPE: Shape = Shape::from_bits([0b111, 0b010, 0, 0], 3, 2);
const O_SHAPE: Shape = Shape::from_bits([0b11, 0b11, 0, 0], 2, 2);
const Z_SHAPE: Shape = Shape::from_bits([0b011, 0b110, 0, 0], 3, 2);
const S_SHAPE: Shape = Shape::from_bits([0b110, 0b011, 0, 0], 3, 2);
const I_SHAPE: Shape = Shape::from_bits([0b1111, 0, 0, 0], 4, 1);
const J_SHAPE: Shape = Shape::from_bits([0b001, 0b111, 0, 0], 3, 2);
const L_SHAPE: Shape = Shape::from_bits([0b100, 0b111, 0, 0], 3, 2);

/// Canonical (spawn) orientation of a catalog shape
pub fn canonical(id: ShapeId) -> Shape {
    match id {
        ShapeId::T => T_SHAPE,
        ShapeId::O => O_SHAPE,
        ShapeId::Z => Z_SHAPE,
        ShapeId::S => S_SHAPE,
        ShapeId::I => I_SHAPE,
        ShapeId::J => J_SHAPE,
        ShapeId::L => L_SHAPE,
    }
}

/// Find the catalog shape that `shape` is a rotation of
///
/// Checks catalog order first, then rotation states, so the result does not
/// depend on which of the four rotations is passed in.
pub fn identify(shape: &Shape) -> Result<ShapeId, ShapeError> {
    ShapeId::ALL
        .into_iter()
        .find(|&id| {
            let mut candidate = *shape;
            for _ in 0..4 {
                if candidate == canonical(id) {
                    return true;
                }
                candidate = candidate.rotate_cw();
            }
            false
        })
        .ok_or(ShapeError::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_matches_const_catalog() {
        let t = Shape::from_rows(&[&[1, 1, 1], &[0, 1, 0]]).unwrap();
        assert_eq!(t, canonical(ShapeId::T));

        let l = Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]).unwrap();
        assert_eq!(l, canonical(ShapeId::L));

        let i = Shape::from_rows(&[&[1, 1, 1, 1]]).unwrap();
        assert_eq!(i, canonical(ShapeId::I));
    }

    #[test]
    fn from_rows_rejects_malformed() {
        assert_eq!(Shape::from_rows(&[]), Err(ShapeError::Malformed));
        assert_eq!(Shape::from_rows(&[&[]]), Err(ShapeError::Malformed));
        assert_eq!(
            Shape::from_rows(&[&[1, 1], &[1]]),
            Err(ShapeError::Malformed)
        );
        assert_eq!(
            Shape::from_rows(&[&[1, 1, 1, 1, 1]]),
            Err(ShapeError::Malformed)
        );
    }

    #[test]
    fn rotate_t_clockwise() {
        // ###      #.
        // .#.  ->  ##
        //          #.   (reversed rows, transposed)
        let r = canonical(ShapeId::T).rotate_cw();
        let expected = Shape::from_rows(&[&[0, 1], &[1, 1], &[0, 1]]).unwrap();
        assert_eq!(r, expected);
    }

    #[test]
    fn rotate_i_swaps_dimensions() {
        let r = canonical(ShapeId::I).rotate_cw();
        assert_eq!((r.width(), r.height()), (1, 4));
        assert_eq!(r.cell_count(), 4);
    }

    #[test]
    fn rotation_does_not_mutate_original() {
        let s = canonical(ShapeId::S);
        let _ = s.rotate_cw();
        assert_eq!(s, canonical(ShapeId::S));
    }

    #[test]
    fn cells_are_row_major_offsets() {
        let cells: Vec<_> = canonical(ShapeId::J).cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn identify_rejects_non_tetromino() {
        let dot = Shape::from_rows(&[&[1]]).unwrap();
        assert_eq!(identify(&dot), Err(ShapeError::Unrecognized));
        assert_eq!(ShapeError::Unrecognized.code(), "unrecognized_shape");
    }

    #[test]
    fn debug_renders_matrix() {
        assert_eq!(format!("{:?}", canonical(ShapeId::T)), "Shape[###/.#.]");
    }
}
