//! Savitzky-Golay smoothing with mirror boundary conditions.
//!
//! Useful as a preprocessing step before contouring noisy fields: the
//! smoother fits a bivariate polynomial over a sliding window by least
//! squares and replaces each node by the fitted value at the window
//! centre. Polynomial structure in the data survives (a linear field
//! passes through unchanged) while uncorrelated noise is damped.

use crate::grid::{Grid, GridPoint, PointGrid};

/// Matrix adapter with mirror boundary conditions.
///
/// The data is mirrored at the borders so that the trend in the data
/// is preserved. In the 1D case: `f(-i) = 2 f(0) - f(i)` and
/// `f(w-1+i) = 2 f(w-1) - f(w-1-i)`; the 2D case applies the formulas
/// first for i, then for j. The mirroring does not extend beyond one
/// grid width.
pub struct MirrorGrid<'a, G: Grid> {
    grid: &'a G,
    width: i64,
    height: i64,
}

impl<'a, G: Grid> MirrorGrid<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        Self { grid, width: grid.width() as i64, height: grid.height() as i64 }
    }

    fn m(&self, i: i64, j: i64) -> f64 {
        self.grid.z(i as usize, j as usize)
    }

    /// Value at (i,j), with i in (-W, 2W-1) and j in (-H, 2H-1).
    pub fn value(&self, i: i64, j: i64) -> f64 {
        let w = self.width;
        let h = self.height;
        debug_assert!(i > -w && i < 2 * w - 1);
        debug_assert!(j > -h && j < 2 * h - 1);

        if i < 0 {
            if j < 0 {
                2.0 * (2.0 * self.m(0, 0) - self.m(0, -j)) - (2.0 * self.m(-i, 0) - self.m(-i, -j))
            } else if j >= h {
                2.0 * (2.0 * self.m(0, h - 1) - self.m(0, 2 * h - j - 2))
                    - (2.0 * self.m(-i, h - 1) - self.m(-i, 2 * h - j - 2))
            } else {
                2.0 * self.m(0, j) - self.m(-i, j)
            }
        } else if i >= w {
            if j < 0 {
                2.0 * (2.0 * self.m(w - 1, 0) - self.m(w - 1, -j))
                    - (2.0 * self.m(2 * w - i - 2, 0) - self.m(2 * w - i - 2, -j))
            } else if j >= h {
                2.0 * (2.0 * self.m(w - 1, h - 1) - self.m(w - 1, 2 * h - j - 2))
                    - (2.0 * self.m(2 * w - i - 2, h - 1) - self.m(2 * w - i - 2, 2 * h - j - 2))
            } else {
                2.0 * self.m(w - 1, j) - self.m(2 * w - i - 2, j)
            }
        } else if j < 0 {
            2.0 * self.m(i, 0) - self.m(i, -j)
        } else if j >= h {
            2.0 * self.m(i, h - 1) - self.m(i, 2 * h - j - 2)
        } else {
            self.m(i, j)
        }
    }
}

/// Bivariate monomial exponents (p,q) with p+q <= degree.
fn basis(degree: usize) -> Vec<(i32, i32)> {
    let mut exps = Vec::new();
    for total in 0..=degree as i32 {
        for p in 0..=total {
            exps.push((p, total - p));
        }
    }
    exps
}

/// Solve `n x = e0` by Gauss-Jordan elimination with partial
/// pivoting. The solution is the first row of the inverse, which is
/// all the filter needs.
fn solve_unit(mut n: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    let m = n.len();
    let mut b = vec![0.0; m];
    b[0] = 1.0;

    for col in 0..m {
        let mut pivot = col;
        for row in col + 1..m {
            if n[row][col].abs() > n[pivot][col].abs() {
                pivot = row;
            }
        }
        if n[pivot][col].abs() < 1e-12 {
            return None;
        }
        n.swap(col, pivot);
        b.swap(col, pivot);

        let diag = n[col][col];
        for row in 0..m {
            if row == col {
                continue;
            }
            let factor = n[row][col] / diag;
            if factor == 0.0 {
                continue;
            }
            for c in col..m {
                let v = n[col][c];
                n[row][c] -= factor * v;
            }
            b[row] -= factor * b[col];
        }
    }

    Some((0..m).map(|i| b[i] / n[i][i]).collect())
}

/// Least-squares stencil weights for a (2*length+1)^2 window and the
/// given polynomial degree, evaluated at the window centre.
fn stencil(length: usize, degree: usize) -> Option<Vec<f64>> {
    let exps = basis(degree);
    let m = exps.len();
    let l = length as i32;

    let mut normal = vec![vec![0.0; m]; m];
    for v in -l..=l {
        for u in -l..=l {
            for (a, &(pa, qa)) in exps.iter().enumerate() {
                for (b, &(pb, qb)) in exps.iter().enumerate() {
                    normal[a][b] +=
                        (u as f64).powi(pa + pb) * (v as f64).powi(qa + qb);
                }
            }
        }
    }

    let inv_row = solve_unit(normal)?;

    let mut weights = Vec::with_capacity((2 * length + 1) * (2 * length + 1));
    for v in -l..=l {
        for u in -l..=l {
            let mut w = 0.0;
            for (a, &(p, q)) in exps.iter().enumerate() {
                w += inv_row[a] * (u as f64).powi(p) * (v as f64).powi(q);
            }
            weights.push(w);
        }
    }
    Some(weights)
}

/// Smooth a grid's values with a 2D Savitzky-Golay filter, using
/// mirror boundary conditions. `length` is the window half-width
/// (clamped to 0..=6) and `degree` the polynomial degree (clamped to
/// 0..=5). Length 0, degree 0, or an under-determined combination
/// return the input unchanged; window applications that produce NaN
/// keep the original value. Coordinates pass through untouched.
pub fn savitzky_golay_2d<G: Grid>(input: &G, length: usize, degree: usize) -> PointGrid {
    let copy = |input: &G| {
        PointGrid::from_fn(input.width(), input.height(), |i, j| {
            GridPoint::new(input.x(i, j), input.y(i, j), input.z(i, j))
        })
    };

    if length == 0 || degree == 0 {
        return copy(input);
    }
    let length = length.min(6);
    let degree = degree.min(5);
    if degree > 2 * length {
        return copy(input);
    }

    let Some(weights) = stencil(length, degree) else {
        return copy(input);
    };

    let mirror = MirrorGrid::new(input);
    let n = 2 * length as i64 + 1;
    let l = length as i64;

    PointGrid::from_fn(input.width(), input.height(), |i, j| {
        let mut sum = 0.0;
        let mut k = 0;
        for dj in 0..n {
            for di in 0..n {
                sum += weights[k] * mirror.value(i as i64 + di - l, j as i64 + dj - l);
                k += 1;
            }
        }
        let value = if sum.is_nan() { input.z(i, j) } else { sum };
        GridPoint::new(input.x(i, j), input.y(i, j), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_of<F: FnMut(usize, usize) -> f64>(w: usize, h: usize, mut f: F) -> PointGrid {
        PointGrid::from_fn(w, h, |i, j| GridPoint::new(i as f64, j as f64, f(i, j)))
    }

    #[test]
    fn test_mirror_extends_linear_trend() {
        let grid = grid_of(5, 4, |i, j| (3 * i + 7 * j) as f64);
        let mirror = MirrorGrid::new(&grid);
        assert_eq!(mirror.value(2, 1), 13.0);
        // f(-1) = 2 f(0) - f(1) keeps the slope.
        assert_eq!(mirror.value(-1, 0), -3.0);
        assert_eq!(mirror.value(0, -2), -14.0);
        assert_eq!(mirror.value(5, 0), 15.0);
        assert_eq!(mirror.value(-1, -1), -10.0);
        assert_eq!(mirror.value(5, 4), 43.0);
    }

    #[test]
    fn test_length_zero_is_identity() {
        let grid = grid_of(6, 6, |i, j| ((i * j) % 5) as f64);
        let smoothed = savitzky_golay_2d(&grid, 0, 2);
        for j in 0..6 {
            for i in 0..6 {
                assert_eq!(smoothed.z(i, j), grid.z(i, j));
            }
        }
    }

    #[test]
    fn test_underdetermined_combination_is_identity() {
        let grid = grid_of(6, 6, |i, j| (i + j) as f64);
        // Degree 5 cannot be fitted in a 3x3 window.
        let smoothed = savitzky_golay_2d(&grid, 1, 5);
        for j in 0..6 {
            for i in 0..6 {
                assert_eq!(smoothed.z(i, j), grid.z(i, j));
            }
        }
    }

    #[test]
    fn test_linear_field_is_reproduced_exactly() {
        let grid = grid_of(10, 8, |i, j| 2.5 * i as f64 - 1.25 * j as f64 + 4.0);
        for degree in 1..=3 {
            let smoothed = savitzky_golay_2d(&grid, 2, degree);
            for j in 0..8 {
                for i in 0..10 {
                    assert!(
                        (smoothed.z(i, j) - grid.z(i, j)).abs() < 1e-9,
                        "degree {degree} at ({i},{j}): {} vs {}",
                        smoothed.z(i, j),
                        grid.z(i, j)
                    );
                }
            }
        }
    }

    #[test]
    fn test_noise_is_damped() {
        // Deterministic pseudo-noise on top of a smooth wave.
        let mut state = 123456_u64;
        let mut noise = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5
        };
        let smooth_field =
            grid_of(20, 20, |i, j| (2.0 * i as f64 / 20.0 + 3.0 * j as f64 / 20.0).sin());
        let noisy = grid_of(20, 20, |i, j| smooth_field.z(i, j) + 0.3 * noise());

        let smoothed = savitzky_golay_2d(&noisy, 2, 2);

        let error = |g: &PointGrid| {
            let mut sum = 0.0;
            for j in 0..20 {
                for i in 0..20 {
                    let d: f64 = g.z(i, j) - smooth_field.z(i, j);
                    sum += d * d;
                }
            }
            sum / 400.0
        };
        assert!(error(&smoothed) < error(&noisy) / 2.0);
    }

    #[test]
    fn test_nan_keeps_original_value() {
        let grid = grid_of(6, 6, |i, j| if (i, j) == (2, 2) { f64::NAN } else { 1.0 });
        let smoothed = savitzky_golay_2d(&grid, 1, 1);
        // Windows touching the NaN keep their input; (2,2) stays NaN.
        assert!(smoothed.z(2, 2).is_nan());
        assert!((smoothed.z(5, 5) - 1.0).abs() < 1e-12);
    }
}
