use serde::Serialize;

use crate::data::model::Spectrum;

/// Relative pivot size below which the normal equations count as singular.
const SINGULAR_PIVOT: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Curve
// ---------------------------------------------------------------------------

/// Smooth baseline evaluated at arbitrary axis values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Curve {
    /// Fallback when no fit could be computed.
    Zero,
    /// Polynomial in the normalised coordinate `t = (x - centre) / half_width`.
    Polynomial {
        /// Ascending powers of `t`.
        coefficients: Vec<f64>,
        centre: f64,
        half_width: f64,
    },
}

impl Curve {
    pub fn evaluate(&self, axis: f64) -> f64 {
        match self {
            Curve::Zero => 0.0,
            Curve::Polynomial {
                coefficients,
                centre,
                half_width,
            } => {
                let t = (axis - centre) / half_width;
                // Horner
                coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Curve::Zero)
    }
}

// ---------------------------------------------------------------------------
// BaselineEstimator
// ---------------------------------------------------------------------------

/// Least-squares polynomial fit over all but the trailing transient samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineEstimator {
    pub degree: usize,
    pub exclude_last_n: usize,
}

impl BaselineEstimator {
    pub fn new(degree: usize, exclude_last_n: usize) -> Self {
        Self {
            degree,
            exclude_last_n,
        }
    }

    pub fn fit(&self, spectrum: &Spectrum) -> Curve {
        fit(spectrum, self.degree, self.exclude_last_n)
    }
}

/// Fit a polynomial of `degree` to every sample but the last `exclude_last_n`.
///
/// Degenerate input (too few points, a zero-width axis, a singular system)
/// yields [`Curve::Zero`] instead of an error.
pub fn fit(spectrum: &Spectrum, degree: usize, exclude_last_n: usize) -> Curve {
    let used = spectrum.len().saturating_sub(exclude_last_n);
    let points: Vec<(f64, f64)> = spectrum.axis()[..used]
        .iter()
        .zip(&spectrum.intensity()[..used])
        .filter(|(_, y)| y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    if points.len() <= degree {
        log::warn!(
            "baseline fit needs more than {degree} points, got {}; using a zero baseline",
            points.len()
        );
        return Curve::Zero;
    }

    let lo = points[0].0;
    let hi = points[points.len() - 1].0;
    let centre = (lo + hi) / 2.0;
    let half_width = (hi - lo) / 2.0;
    if half_width <= 0.0 {
        log::warn!("baseline fit over a zero-width axis; using a zero baseline");
        return Curve::Zero;
    }

    let terms = degree + 1;
    let mut normal = vec![vec![0.0; terms]; terms];
    let mut rhs = vec![0.0; terms];
    let mut powers = vec![0.0; 2 * terms - 1];

    for &(x, y) in &points {
        let t = (x - centre) / half_width;
        let mut p = 1.0;
        for slot in powers.iter_mut() {
            *slot = p;
            p *= t;
        }
        for row in 0..terms {
            rhs[row] += powers[row] * y;
            for col in 0..terms {
                normal[row][col] += powers[row + col];
            }
        }
    }

    match solve(normal, rhs) {
        Some(coefficients) if coefficients.iter().all(|c| c.is_finite()) => Curve::Polynomial {
            coefficients,
            centre,
            half_width,
        },
        _ => {
            log::warn!("baseline normal equations are singular; using a zero baseline");
            Curve::Zero
        }
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < SINGULAR_PIVOT * scale {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_from(f: impl Fn(f64) -> f64, n: usize) -> Spectrum {
        let x: Vec<f64> = (0..n).map(|i| 600.0 + 4.0 * i as f64).collect();
        let y = x.iter().map(|&v| f(v)).collect();
        Spectrum::new(x, y).unwrap()
    }

    #[test]
    fn recovers_a_quadratic() {
        let f = |x: f64| 0.2 + 1e-4 * x - 2e-8 * x * x;
        let sp = spectrum_from(f, 200);
        let curve = fit(&sp, 5, 0);
        for x in [700.0, 1000.0, 1300.0] {
            assert!((curve.evaluate(x) - f(x)).abs() < 1e-9, "at {x}");
        }
    }

    #[test]
    fn trailing_transient_is_excluded() {
        let mut sp_y: Vec<f64> = vec![0.1; 120];
        for v in sp_y.iter_mut().skip(100) {
            *v = 5.0;
        }
        let x: Vec<f64> = (0..120).map(|i| i as f64).collect();
        let sp = Spectrum::new(x, sp_y).unwrap();
        let curve = fit(&sp, 5, 20);
        assert!((curve.evaluate(50.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn too_few_points_degrade_to_zero() {
        let sp = spectrum_from(|_| 1.0, 8);
        let curve = fit(&sp, 5, 3);
        assert!(curve.is_zero());
        assert_eq!(curve.evaluate(123.0), 0.0);
    }

    #[test]
    fn empty_spectrum_degrades_to_zero() {
        let sp = Spectrum::new(Vec::new(), Vec::new()).unwrap();
        assert!(fit(&sp, 5, 0).is_zero());
    }

    #[test]
    fn zero_signal_fits_flat_zero() {
        let sp = spectrum_from(|_| 0.0, 50);
        let curve = fit(&sp, 5, 0);
        assert!(curve.evaluate(800.0).abs() < 1e-12);
    }
}
