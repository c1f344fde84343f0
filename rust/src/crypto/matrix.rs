//! 2x2 key matrices over Z/26Z. Construction validates invertibility up front
//! so every `KeyMatrix` that exists can also be inverted.

use thiserror::Error;
use zeroize::Zeroize;

/// Size of the A-Z alphabet the cipher works over.
pub const MODULUS: u32 = 26;

/// Key used when no configuration overrides it.
pub const DEFAULT_KEY: [[i64; 2]; 2] = [[5, 4], [21, 25]];

/// Modular inverse of `DEFAULT_KEY` (inverse determinant 7 times the adjugate).
pub(crate) const DEFAULT_INVERSE: [[u32; 2]; 2] = [[19, 24], [9, 9]];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("key matrix is not invertible modulo 26 (determinant {det})")]
    NotInvertible { det: u32 },
    #[error("block processing needs an even number of letters, got {len}")]
    InvalidBlockLength { len: usize },
}

/// A 2x2 matrix with entries reduced modulo 26.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatrix {
    cells: [[u32; 2]; 2],
}

impl KeyMatrix {
    /// Builds a key matrix from integer rows. Entries are reduced modulo 26
    /// (negative values included) and the determinant must be a unit mod 26.
    pub fn new(rows: [[i64; 2]; 2]) -> Result<Self, CipherError> {
        let matrix = Self::reduced(rows);
        matrix.determinant_inverse()?;
        Ok(matrix)
    }

    pub fn identity() -> Self {
        Self::from_cells([[1, 0], [0, 1]])
    }

    pub(crate) fn from_cells(cells: [[u32; 2]; 2]) -> Self {
        Self { cells }
    }

    fn reduced(rows: [[i64; 2]; 2]) -> Self {
        let modulus = i64::from(MODULUS);
        let mut cells = [[0u32; 2]; 2];
        for (row, source) in cells.iter_mut().zip(rows.iter()) {
            for (cell, value) in row.iter_mut().zip(source.iter()) {
                *cell = value.rem_euclid(modulus) as u32;
            }
        }
        Self { cells }
    }

    pub fn cells(&self) -> [[u32; 2]; 2] {
        self.cells
    }

    /// `(a*d - b*c) mod 26`, always in `0..26`.
    pub fn determinant(&self) -> u32 {
        let [[a, b], [c, d]] = self.cells;
        let det = i64::from(a * d) - i64::from(b * c);
        det.rem_euclid(i64::from(MODULUS)) as u32
    }

    fn determinant_inverse(&self) -> Result<u32, CipherError> {
        let det = self.determinant();
        modular_inverse(det, MODULUS).ok_or(CipherError::NotInvertible { det })
    }

    /// Inverse via the adjugate: swap the diagonal, negate the off-diagonal,
    /// then scale by the inverse determinant.
    pub fn inverse(&self) -> Result<KeyMatrix, CipherError> {
        let inv_det = i64::from(self.determinant_inverse()?);
        let [[a, b], [c, d]] = self.cells;
        let adjugate = [
            [i64::from(d), -i64::from(b)],
            [-i64::from(c), i64::from(a)],
        ];
        let scaled = adjugate.map(|row| row.map(|value| inv_det * value));
        Ok(Self::reduced(scaled))
    }

    /// Multiplies a two-letter block `[x0, x1]` by this matrix, mod 26.
    pub fn apply(&self, x0: u8, x1: u8) -> [u8; 2] {
        let [[a, b], [c, d]] = self.cells;
        let (x0, x1) = (u32::from(x0), u32::from(x1));
        [
            ((a * x0 + b * x1) % MODULUS) as u8,
            ((c * x0 + d * x1) % MODULUS) as u8,
        ]
    }

    /// Matrix product `self × other` reduced mod 26.
    pub fn multiply(&self, other: &KeyMatrix) -> KeyMatrix {
        let lhs = self.cells;
        let rhs = other.cells;
        let mut cells = [[0u32; 2]; 2];
        for (i, row) in cells.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (lhs[i][0] * rhs[0][j] + lhs[i][1] * rhs[1][j]) % MODULUS;
            }
        }
        Self { cells }
    }
}

impl Drop for KeyMatrix {
    fn drop(&mut self) {
        self.cells.zeroize();
    }
}

/// Finds `i` in `0..modulus` with `(value * i) % modulus == 1`. A linear scan
/// is plenty for a 26-letter alphabet.
pub fn modular_inverse(value: u32, modulus: u32) -> Option<u32> {
    let value = value % modulus;
    (0..modulus).find(|candidate| (value * candidate) % modulus == 1)
}
