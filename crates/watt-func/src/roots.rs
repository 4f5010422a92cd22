//! Closed-form real-root solvers for polynomials of degree 1–4.
//!
//! Each solver degrades to the next lower degree when the leading
//! coefficient is zero, returns roots as `Option`s (ordering unspecified —
//! callers filter by domain), and treats non-finite input as "no roots"
//! while bumping the numeric-failure counter.  The quartic path carries two
//! numerical-safety branches: a biquadratic reduction when both odd
//! coefficients vanish after normalisation, and a depressed-quartic
//! reduction when the resolvent's `q` term underflows.
//!
//! `unique_*` variants collapse roots that agree within `1e-5` — the double
//! roots produced by tangential intersections.

use watt_core::{stats, StatsEvent};

const UNIQUE_EPSILON: f64 = 1e-5;

fn guard_finite(coefficients: &[f64]) -> bool {
    if coefficients.iter().all(|c| c.is_finite()) {
        return true;
    }
    stats::count(StatsEvent::NumericFailure);
    false
}

// ── unique filtering ──────────────────────────────────────────────────────────

fn unique2(z_0: &mut Option<f64>, z_1: &mut Option<f64>) {
    match (*z_0, *z_1) {
        (Some(a), Some(b)) if (a - b).abs() < UNIQUE_EPSILON => *z_1 = None,
        (None, _) => std::mem::swap(z_0, z_1),
        _ => {}
    }
}

fn unique3(z_0: &mut Option<f64>, z_1: &mut Option<f64>, z_2: &mut Option<f64>) {
    unique2(z_0, z_2);
    unique2(z_0, z_1);
    unique2(z_1, z_2);
}

fn unique4(
    z_0: &mut Option<f64>,
    z_1: &mut Option<f64>,
    z_2: &mut Option<f64>,
    z_3: &mut Option<f64>,
) {
    unique2(z_0, z_3);
    unique2(z_0, z_2);
    unique2(z_0, z_1);
    unique3(z_1, z_2, z_3);
}

// ── degree 1 ──────────────────────────────────────────────────────────────────

/// Root of `a·x + b = 0`.
pub fn linear_root(a: f64, b: f64) -> Option<f64> {
    if a == 0.0 || !guard_finite(&[a, b]) {
        return None;
    }
    Some(-b / a)
}

// ── degree 2 ──────────────────────────────────────────────────────────────────

/// Real roots of `a·x² + b·x + c = 0`.
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    if a == 0.0 {
        return [linear_root(b, c), None];
    }
    if !guard_finite(&[a, b, c]) {
        return [None, None];
    }

    let p = b / a;
    let q = c / a;

    let n = p * p / 4.0 - q;
    if n < 0.0 {
        [None, None]
    } else if n > 0.0 {
        let x_0 = -p / 2.0 + n.sqrt();
        let x_1 = -p / 2.0 - n.sqrt();
        [Some(x_0), Some(x_1)]
    } else {
        [Some(-p / 2.0), Some(-p / 2.0)]
    }
}

// ── degree 3 ──────────────────────────────────────────────────────────────────

/// Real roots of `a·x³ + b·x² + c·x + d = 0`.
///
/// Uses the trigonometric/hyperbolic solution of the depressed cubic, which
/// avoids complex intermediates entirely.
pub fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> [Option<f64>; 3] {
    if a == 0.0 {
        let [x_0, x_1] = quadratic_roots(b, c, d);
        return [x_0, x_1, None];
    }
    if !guard_finite(&[a, b, c, d]) {
        return [None, None, None];
    }

    let p = (3.0 * a * c - b * b) / (3.0 * a * a);
    let q = (2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a * a * a);
    let x = |t: f64| t - b / (3.0 * a);
    let s = 4.0 * p * p * p + 27.0 * q * q;

    if s > 0.0 {
        // One real root.
        if p > 0.0 {
            let t_0 = -2.0 * (p / 3.0).sqrt()
                * ((1.0 / 3.0) * (3.0 * q / (2.0 * p) * (3.0 / p).sqrt()).asinh()).sinh();
            [Some(x(t_0)), None, None]
        } else if p < 0.0 {
            let t_0 = -2.0 * q.signum() * (-p / 3.0).sqrt()
                * ((1.0 / 3.0) * (-3.0 * q.abs() / (2.0 * p) * (-3.0 / p).sqrt()).acosh()).cosh();
            [Some(x(t_0)), None, None]
        } else {
            [None, None, None]
        }
    } else if p < 0.0 {
        // Three real roots via the cosine parameterisation.
        let t_k = |k: f64| {
            2.0 * (-p / 3.0).sqrt()
                * ((1.0 / 3.0) * (3.0 * q / (2.0 * p) * (-3.0 / p).sqrt()).acos()
                    - 2.0 * k * std::f64::consts::PI / 3.0)
                    .cos()
        };
        [Some(x(t_k(0.0))), Some(x(t_k(1.0))), Some(x(t_k(2.0)))]
    } else if p > 0.0 {
        [None, None, None]
    } else {
        [Some(x(0.0)), None, None]
    }
}

// ── degree 4 ──────────────────────────────────────────────────────────────────

/// Real roots of `a·x⁴ + b·x³ + c·x² + d·x + e = 0`.
pub fn quartic_roots(a_0: f64, b_0: f64, c_0: f64, d_0: f64, e_0: f64) -> [Option<f64>; 4] {
    if a_0 == 0.0 {
        let [x_0, x_1, x_2] = cubic_roots(b_0, c_0, d_0, e_0);
        return [x_0, x_1, x_2, None];
    }
    if !guard_finite(&[a_0, b_0, c_0, d_0, e_0]) {
        return [None; 4];
    }

    let b = b_0 / a_0;
    let c = c_0 / a_0;
    let d = d_0 / a_0;
    let e = e_0 / a_0;

    // Both odd terms vanish: solving the general resolvent would underflow,
    // so reduce x⁴ + cx² + e = 0 to a quadratic in x².
    if (b * b).abs() < 1e-10 && (d * d).abs() < 1e-10 {
        let [y_0, y_1] = quadratic_roots(1.0, c, e);
        let (Some(y_0), Some(y_1)) = (y_0, y_1) else {
            return [None; 4];
        };

        let x_0 = y_0.sqrt();
        let x_1 = -y_0.sqrt();
        let x_2 = y_1.sqrt();
        let x_3 = -y_1.sqrt();

        return [Some(x_0), Some(x_1), Some(x_2), Some(x_3)];
    }

    let p = (8.0 * c - 3.0 * b * b) / 8.0;
    let q = (b * b * b - 4.0 * b * c + 8.0 * d) / 8.0;
    let r = (-3.0 * b * b * b * b + 256.0 * e - 64.0 * b * d + 16.0 * b * b * c) / 256.0;

    let y_to_x = -b / 4.0;

    // The depressed quartic is biquadratic: y⁴ + p·y² + r = 0, z = y².
    if (q * q).abs() < 1e-10 {
        let [z_0, z_1] = quadratic_roots(1.0, p, r);
        // The quadratic reports either zero or two (possibly equal) roots.
        let (Some(z_0), Some(z_1)) = (z_0, z_1) else {
            return [None; 4];
        };

        let y_0 = z_0.sqrt();
        let y_1 = -z_0.sqrt();
        let y_2 = z_1.sqrt();
        let y_3 = -z_1.sqrt();

        let x_0 = y_0 + y_to_x;
        let x_1 = y_1 + y_to_x;
        let x_2 = y_2 + y_to_x;
        let x_3 = y_3 + y_to_x;

        if z_0 < 0.0 && z_1 < 0.0 {
            return [None; 4];
        } else if z_1 < 0.0 {
            return [Some(x_0), Some(x_1), None, None];
        } else if z_0 < 0.0 {
            return [Some(x_2), Some(x_3), None, None];
        }

        return [Some(x_0), Some(x_1), Some(x_2), Some(x_3)];
    }

    // General case: factor through a root of the resolvent cubic.
    let a_1 = 8.0;
    let b_1 = 8.0 * p;
    let c_1 = 2.0 * p * p - 8.0 * r;
    let d_1 = -q * q;
    let [m_0, _, _] = cubic_roots(a_1, b_1, c_1, d_1);
    let Some(m) = m_0 else {
        return [None; 4];
    };

    let k_0 = (2.0 * m).sqrt();
    let k_1 = -(2.0 * m).sqrt();
    let n_0 = -2.0 * (p + m + q / k_0);
    let n_1 = -2.0 * (p + m + q / k_1);

    // NaN from a negative resolvent root fails both comparisons below, which
    // correctly reports no real roots.
    if n_0 >= 0.0 {
        let y_0 = (k_0 + n_0.sqrt()) / 2.0;
        let y_1 = (k_0 - n_0.sqrt()) / 2.0;
        let x_0 = y_0 + y_to_x;
        let x_1 = y_1 + y_to_x;

        if n_1 >= 0.0 {
            let y_2 = (k_1 + n_1.sqrt()) / 2.0;
            let y_3 = (k_1 - n_1.sqrt()) / 2.0;
            let x_2 = y_2 + y_to_x;
            let x_3 = y_3 + y_to_x;

            return [Some(x_0), Some(x_1), Some(x_2), Some(x_3)];
        }

        [Some(x_0), Some(x_1), None, None]
    } else if n_1 >= 0.0 {
        let y_0 = (k_1 + n_1.sqrt()) / 2.0;
        let y_1 = (k_1 - n_1.sqrt()) / 2.0;

        let x_0 = y_0 + y_to_x;
        let x_1 = y_1 + y_to_x;

        [Some(x_0), Some(x_1), None, None]
    } else {
        [None; 4]
    }
}

// ── unique variants ───────────────────────────────────────────────────────────

pub fn unique_quadratic_roots(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    let [mut z_0, mut z_1] = quadratic_roots(a, b, c);
    unique2(&mut z_0, &mut z_1);
    [z_0, z_1]
}

pub fn unique_cubic_roots(a: f64, b: f64, c: f64, d: f64) -> [Option<f64>; 3] {
    let [mut z_0, mut z_1, mut z_2] = cubic_roots(a, b, c, d);
    unique3(&mut z_0, &mut z_1, &mut z_2);
    [z_0, z_1, z_2]
}

pub fn unique_quartic_roots(a: f64, b: f64, c: f64, d: f64, e: f64) -> [Option<f64>; 4] {
    let [mut z_0, mut z_1, mut z_2, mut z_3] = quartic_roots(a, b, c, d, e);
    unique4(&mut z_0, &mut z_1, &mut z_2, &mut z_3);
    [z_0, z_1, z_2, z_3]
}
