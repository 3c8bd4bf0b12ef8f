//! Natural cubic spline interpolation over uniformly spaced knots.
//!
//! Knots sit at integer parameters `t = 0..=n`; the fit solves the standard
//! tridiagonal system for interior second derivatives with natural boundary
//! conditions (zero curvature at both ends).

pub(crate) struct CubicSpline {
    /// Piece coefficients `(a, b, c, d)` for `t` in `[i, i + 1)`, evaluated as
    /// `a + b*s + c*s^2 + d*s^3` with `s = t - i`.
    coeffs: Vec<[f64; 4]>,
}

impl CubicSpline {
    /// Fit through `values[i]` at knot `t = i`. Requires at least two values.
    pub(crate) fn fit(values: &[f64]) -> Self {
        debug_assert!(values.len() >= 2, "spline needs at least two knots");
        let n = values.len() - 1;

        // Second derivatives at the knots; natural ends stay zero.
        let mut m = vec![0.0; n + 1];
        if n >= 2 {
            let mut diag = vec![4.0; n - 1];
            let mut rhs: Vec<f64> = (1..n)
                .map(|i| 6.0 * (values[i + 1] - 2.0 * values[i] + values[i - 1]))
                .collect();

            // Thomas algorithm; sub- and super-diagonals are all ones.
            for i in 1..n - 1 {
                let w = 1.0 / diag[i - 1];
                diag[i] -= w;
                rhs[i] -= w * rhs[i - 1];
            }
            m[n - 1] = rhs[n - 2] / diag[n - 2];
            for i in (1..n - 1).rev() {
                m[i] = (rhs[i - 1] - m[i + 1]) / diag[i - 1];
            }
        }

        let coeffs = (0..n)
            .map(|i| {
                [
                    values[i],
                    (values[i + 1] - values[i]) - (2.0 * m[i] + m[i + 1]) / 6.0,
                    m[i] / 2.0,
                    (m[i + 1] - m[i]) / 6.0,
                ]
            })
            .collect();
        Self { coeffs }
    }

    /// Evaluate at parameter `t`; values past the last knot clamp to the final
    /// piece.
    pub(crate) fn value(&self, t: f64) -> f64 {
        let i = (t.max(0.0) as usize).min(self.coeffs.len() - 1);
        let s = t - i as f64;
        let [a, b, c, d] = self.coeffs[i];
        a + s * (b + s * (c + s * d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_every_knot() {
        let values = [0.0, 3.0, -1.0, 4.0, 4.0, 0.5];
        let spline = CubicSpline::fit(&values);
        for (i, &v) in values.iter().enumerate() {
            assert!((spline.value(i as f64) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn reproduces_a_straight_line_exactly() {
        let values: Vec<f64> = (0..8).map(|i| 2.5 * i as f64 - 1.0).collect();
        let spline = CubicSpline::fit(&values);
        for k in 0..70 {
            let t = k as f64 * 0.1;
            assert!((spline.value(t) - (2.5 * t - 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn two_knots_degenerate_to_linear() {
        let spline = CubicSpline::fit(&[1.0, 5.0]);
        assert!((spline.value(0.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn interpolant_is_continuous_across_pieces() {
        let spline = CubicSpline::fit(&[0.0, 1.0, 0.0, 1.0, 0.0]);
        let eps = 1e-8;
        for knot in 1..4 {
            let t = knot as f64;
            let left = spline.value(t - eps);
            let right = spline.value(t + eps);
            assert!((left - right).abs() < 1e-6);
        }
    }
}
