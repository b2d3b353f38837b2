//! 3x3 rotation matrices for orbital frame conversions.
//!
//! The orbital resolver works in the perifocal frame (x toward periapsis,
//! z along the orbit normal) and rotates into the reference frame with
//!
//! ```text
//! R = Rz(-Ω) · Rx(-i) · Rz(-ω)
//! ```
//!
//! Elementary rotations are passive (they rotate the frame, not the vector):
//! `about_z(90°)` takes `[1, 0, 0]` to `[0, -1, 0]`. Under that convention the
//! product above is the usual perifocal-to-inertial matrix. `B * A` applies
//! `A` first.
//!
//! ```
//! use impact_core::RotationMatrix3;
//!
//! let r = RotationMatrix3::about_z(-0.3)
//!     * RotationMatrix3::about_x(-0.5)
//!     * RotationMatrix3::about_z(-1.1);
//! assert!(r.is_rotation_matrix(1e-14));
//! ```

use std::ops::{Index, Mul};

use super::Vector3;

/// Row-major 3x3 matrix; `m[(row, col)]`. Angles are radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationMatrix3 {
    rows: [[f64; 3]; 3],
}

impl RotationMatrix3 {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Unchecked; see [`is_rotation_matrix`](Self::is_rotation_matrix).
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// `Rx(phi)`. Carries the inclination.
    pub fn about_x(phi: f64) -> Self {
        let (s, c) = phi.sin_cos();
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]])
    }

    /// `Rz(psi)`. Carries the ascending node and the argument of periapsis.
    pub fn about_z(psi: f64) -> Self {
        let (s, c) = psi.sin_cos();
        Self::from_rows([[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Inverse of a rotation.
    pub fn transpose(&self) -> Self {
        let m = &self.rows;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Proper rotation: `det = +1` and `M·Mᵀ = I`, both within `tolerance`.
    pub fn is_rotation_matrix(&self, tolerance: f64) -> bool {
        (self.determinant() - 1.0).abs() <= tolerance
            && (*self * self.transpose()).max_abs_diff(&Self::IDENTITY) <= tolerance
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .fold(0.0, |acc, (a, b)| acc.max((a - b).abs()))
    }
}

impl Mul for RotationMatrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Self::from_rows(out)
    }
}

impl Mul<Vector3> for RotationMatrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        let row = |r: &[f64; 3]| r[0] * v.x + r[1] * v.y + r[2] * v.z;
        Vector3::new(row(&self.rows[0]), row(&self.rows[1]), row(&self.rows[2]))
    }
}

impl Index<(usize, usize)> for RotationMatrix3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.rows[row][col]
    }
}
