//! 8x8 feedback matrices
//!
//! Matrices are plain values: blending and orthonormalizing return new
//! matrices, so a frozen snapshot can never be altered by later warp moves.

use super::NUM_LINES;

const INV_SQRT_8: f32 = 0.353_553_4;

/// Householder reflection `I - (2/N) * 1 * 1^T` for N = 8
const HOUSEHOLDER_DIAG: f32 = 0.75;
const HOUSEHOLDER_OFF: f32 = -0.25;

/// Gram-Schmidt residuals shorter than this count as linearly dependent
const DEPENDENT_COLUMN_NORM: f64 = 1.0e-4;

type Column = [f64; NUM_LINES];

/// Row-major 8x8 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix8x8(pub [[f32; NUM_LINES]; NUM_LINES]);

impl Matrix8x8 {
    /// Normalized Sylvester-Hadamard matrix (maximally diffusive)
    pub fn hadamard() -> Self {
        let mut m = [[0.0; NUM_LINES]; NUM_LINES];
        for (row, values) in m.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                // Sign is the parity of the shared bits of row and col
                let negative = (row & col).count_ones() % 2 == 1;
                *value = if negative { -INV_SQRT_8 } else { INV_SQRT_8 };
            }
        }
        Self(m)
    }

    /// Householder reflection (near-diagonal, directional)
    pub fn householder() -> Self {
        let mut m = [[HOUSEHOLDER_OFF; NUM_LINES]; NUM_LINES];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = HOUSEHOLDER_DIAG;
        }
        Self(m)
    }

    /// Matrix for a warp position: Hadamard at 0, Householder at 1
    ///
    /// The two bases have opposite determinants, so the orthogonal path
    /// between them jumps once, at warp 0.5 where the blend is singular.
    pub fn warp(warp: f32) -> Self {
        Self::blend(&Self::hadamard(), &Self::householder(), warp.clamp(0.0, 1.0)).orthonormalize()
    }

    /// Linear blend `a * (1 - t) + b * t`
    pub fn blend(a: &Self, b: &Self, t: f32) -> Self {
        let inv = 1.0 - t;
        let mut m = [[0.0; NUM_LINES]; NUM_LINES];
        for (row, values) in m.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = a.0[row][col] * inv + b.0[row][col] * t;
            }
        }
        Self(m)
    }

    /// Nearest orthogonal matrix by column order (modified Gram-Schmidt)
    ///
    /// Columns keep their direction relative to the earlier ones, so an
    /// already orthogonal matrix comes back unchanged. A column that is
    /// dependent on the earlier ones is replaced by the unit axis that
    /// leaves the largest residual.
    pub fn orthonormalize(self) -> Self {
        let mut basis: [Column; NUM_LINES] = [[0.0; NUM_LINES]; NUM_LINES];

        for col in 0..NUM_LINES {
            let mut v: Column = [0.0; NUM_LINES];
            for (row, x) in v.iter_mut().enumerate() {
                *x = f64::from(self.0[row][col]);
            }
            let (mut residual, mut norm) = project_out(v, &basis[..col]);

            if norm < DEPENDENT_COLUMN_NORM {
                for axis in 0..NUM_LINES {
                    let mut e: Column = [0.0; NUM_LINES];
                    e[axis] = 1.0;
                    let (candidate, candidate_norm) = project_out(e, &basis[..col]);
                    if candidate_norm > norm {
                        residual = candidate;
                        norm = candidate_norm;
                    }
                }
            }

            for (b, r) in basis[col].iter_mut().zip(residual.iter()) {
                *b = r / norm;
            }
        }

        let mut m = [[0.0; NUM_LINES]; NUM_LINES];
        for (col, column) in basis.iter().enumerate() {
            for (row, value) in column.iter().enumerate() {
                m[row][col] = *value as f32;
            }
        }
        Self(m)
    }

    /// `out = M * input`
    #[inline]
    pub fn apply(&self, input: &[f32; NUM_LINES]) -> [f32; NUM_LINES] {
        let mut out = [0.0; NUM_LINES];
        for (o, row) in out.iter_mut().zip(self.0.iter()) {
            *o = row.iter().zip(input.iter()).map(|(m, x)| m * x).sum();
        }
        out
    }
}

impl Default for Matrix8x8 {
    fn default() -> Self {
        Self::hadamard()
    }
}

/// Remove the components along `basis` (two passes) and return the residual with its norm
fn project_out(mut v: Column, basis: &[Column]) -> (Column, f64) {
    for _ in 0..2 {
        for q in basis {
            let dot: f64 = v.iter().zip(q.iter()).map(|(a, b)| a * b).sum();
            for (x, b) in v.iter_mut().zip(q.iter()) {
                *x -= dot * b;
            }
        }
    }
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    (v, norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_energy(m: &Matrix8x8, col: usize) -> f32 {
        m.0.iter().map(|row| row[col] * row[col]).sum()
    }

    /// Frobenius norm of `M^T M - I`
    fn orthogonality_error(m: &Matrix8x8) -> f32 {
        let mut error = 0.0;
        for i in 0..NUM_LINES {
            for j in 0..NUM_LINES {
                let dot: f32 = (0..NUM_LINES).map(|k| m.0[k][i] * m.0[k][j]).sum();
                let target = if i == j { 1.0 } else { 0.0 };
                error += (dot - target) * (dot - target);
            }
        }
        error.sqrt()
    }

    fn energy(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum()
    }

    #[test]
    fn test_bases_are_orthogonal() {
        assert!(orthogonality_error(&Matrix8x8::hadamard()) < 1e-5);
        assert!(orthogonality_error(&Matrix8x8::householder()) < 1e-5);
    }

    #[test]
    fn test_hadamard_first_row_and_column_positive() {
        let h = Matrix8x8::hadamard();
        for i in 0..NUM_LINES {
            assert!(h.0[0][i] > 0.0);
            assert!(h.0[i][0] > 0.0);
        }
        // Each other row sums to zero
        for row in 1..NUM_LINES {
            let sum: f32 = h.0[row].iter().sum();
            assert!(sum.abs() < 1e-6);
        }
    }

    #[test]
    fn test_column_energy_after_any_warp() {
        for step in 0..=100 {
            let warp = step as f32 / 100.0;
            let m = Matrix8x8::warp(warp);
            for col in 0..NUM_LINES {
                let energy = column_energy(&m, col);
                assert!(
                    (energy - 1.0).abs() < 1e-4,
                    "warp {warp} column {col}: energy {energy}"
                );
            }
        }
    }

    #[test]
    fn test_every_warp_is_orthogonal() {
        for step in 0..=200 {
            let warp = step as f32 / 200.0;
            let error = orthogonality_error(&Matrix8x8::warp(warp));
            assert!(error < 1e-4, "warp {warp}: orthogonality error {error}");
        }
    }

    #[test]
    fn test_mid_warp_preserves_energy() {
        let input = [0.3, -0.1, 0.8, 0.0, -0.5, 0.2, 0.05, -0.9];
        for warp in [0.1, 0.25, 0.4, 0.5, 0.6, 0.75, 0.9] {
            let out = Matrix8x8::warp(warp).apply(&input);
            let ratio = energy(&out) / energy(&input);
            assert!((ratio - 1.0).abs() < 1e-4, "warp {warp}: energy ratio {ratio}");
        }
    }

    #[test]
    fn test_warp_endpoints_match_bases() {
        let at_zero = Matrix8x8::warp(0.0);
        let at_one = Matrix8x8::warp(1.0);
        let h = Matrix8x8::hadamard();
        let q = Matrix8x8::householder();
        for r in 0..NUM_LINES {
            for c in 0..NUM_LINES {
                assert!((at_zero.0[r][c] - h.0[r][c]).abs() < 1e-6);
                assert!((at_one.0[r][c] - q.0[r][c]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_small_warp_steps_move_the_matrix_smoothly() {
        let mut previous = Matrix8x8::warp(0.0);
        for step in 1..=100 {
            let warp = step as f32 / 100.0;
            let m = Matrix8x8::warp(warp);
            // The determinant flip at 0.5 is steep in its neighbourhood
            if (0.4..=0.6).contains(&warp) {
                previous = m;
                continue;
            }
            for r in 0..NUM_LINES {
                for c in 0..NUM_LINES {
                    assert!(
                        (m.0[r][c] - previous.0[r][c]).abs() < 0.05,
                        "warp {warp}: entry ({r}, {c}) jumped"
                    );
                }
            }
            previous = m;
        }
    }

    #[test]
    fn test_dependent_columns_are_replaced() {
        // Columns 0 and 1 equal, column 2 zero
        let mut m = Matrix8x8::hadamard();
        for row in 0..NUM_LINES {
            m.0[row][1] = m.0[row][0];
            m.0[row][2] = 0.0;
        }
        let q = m.orthonormalize();
        assert!(orthogonality_error(&q) < 1e-4);
        assert!(q.0.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn test_blend_does_not_mutate_inputs() {
        let a = Matrix8x8::hadamard();
        let b = Matrix8x8::householder();
        let snapshot = a;
        let _ = Matrix8x8::blend(&a, &b, 0.5).orthonormalize();
        assert_eq!(a, snapshot);
    }

    #[test]
    fn test_apply_preserves_energy_for_hadamard() {
        let h = Matrix8x8::hadamard();
        let input = [0.3, -0.1, 0.8, 0.0, -0.5, 0.2, 0.05, -0.9];
        let out = h.apply(&input);
        assert!((energy(&input) - energy(&out)).abs() < 1e-5);
    }
}
