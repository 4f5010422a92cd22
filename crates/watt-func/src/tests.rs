//! Unit tests for watt-func.

mod roots {
    use crate::roots::*;
    use approx::assert_relative_eq;

    fn sorted(roots: impl IntoIterator<Item = Option<f64>>) -> Vec<f64> {
        let mut v: Vec<f64> = roots.into_iter().flatten().collect();
        v.sort_by(f64::total_cmp);
        v
    }

    #[test]
    fn degree_3_roots_that_would_involve_complex_terms() {
        let [x_0, x_1, x_2] = cubic_roots(1.0, 0.0, -15.0, -4.0);
        assert_relative_eq!(x_0.unwrap(), 4.0, epsilon = 1e-9);
        assert_relative_eq!(x_1.unwrap(), -0.267_949_192_431_121_5, epsilon = 1e-9);
        assert_relative_eq!(x_2.unwrap(), -3.732_050_807_568_877, epsilon = 1e-9);
    }

    #[test]
    fn degree_3_single_root() {
        let [x_0, x_1, x_2] = cubic_roots(1.0, -9.0, 27.0, -27.0);
        assert_relative_eq!(x_0.unwrap(), 3.0, epsilon = 1e-6);
        assert!(x_1.is_none());
        assert!(x_2.is_none());
    }

    #[test]
    fn degree_3_double_root_collapses_in_unique() {
        let [x_0, x_1, x_2] = cubic_roots(1.0, 3.0, 0.0, 0.0);
        assert_relative_eq!(x_0.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(x_1.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(x_2.unwrap(), -3.0, epsilon = 1e-9);

        let [x_3, x_4, x_5] = unique_cubic_roots(1.0, 3.0, 0.0, 0.0);
        assert_relative_eq!(x_3.unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(x_4.unwrap(), -3.0, epsilon = 1e-9);
        assert!(x_5.is_none());
    }

    #[test]
    fn degree_4_quadruple_root() {
        // (x-3)^4
        let roots = sorted(quartic_roots(1.0, -12.0, 54.0, -108.0, 81.0));
        assert_eq!(roots.len(), 4);
        for root in roots {
            assert_relative_eq!(root, 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn degree_4_two_double_roots() {
        // (x-3)^2 (x+5)^2
        let roots = sorted(quartic_roots(1.0, 4.0, -26.0, -60.0, 225.0));
        assert_eq!(roots.len(), 4);
        assert_relative_eq!(roots[0], -5.0, epsilon = 1e-6);
        assert_relative_eq!(roots[1], -5.0, epsilon = 1e-6);
        assert_relative_eq!(roots[2], 3.0, epsilon = 1e-6);
        assert_relative_eq!(roots[3], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn degree_4_three_unique_roots() {
        // (x-3)^2 (x+5) (x-2)
        let roots = sorted(quartic_roots(1.0, -3.0, -19.0, 87.0, -90.0));
        assert_eq!(roots.len(), 4);
        assert_relative_eq!(roots[0], -5.0, epsilon = 1e-5);
        assert_relative_eq!(roots[1], 2.0, epsilon = 1e-5);
        assert_relative_eq!(roots[2], 3.0, epsilon = 1e-4);
        assert_relative_eq!(roots[3], 3.0, epsilon = 1e-4);
    }

    #[test]
    fn degree_4_two_real_two_imaginary() {
        // (x^2 + 1)(x+5)(x-2)
        let roots = sorted(quartic_roots(1.0, 3.0, -9.0, 3.0, -10.0));
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], -5.0, epsilon = 1e-5);
        assert_relative_eq!(roots[1], 2.0, epsilon = 1e-5);
    }

    #[test]
    fn degree_3_regression_1() {
        let roots = sorted(cubic_roots(1.0, 19.0, 99.0, 81.0));
        assert_eq!(roots.len(), 3);
        assert_relative_eq!(roots[0], -9.0, epsilon = 1e-4);
        assert_relative_eq!(roots[1], -9.0, epsilon = 1e-4);
        assert_relative_eq!(roots[2], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn degree_3_regression_2() {
        let roots = sorted(cubic_roots(
            8.0,
            -262.811_004_638_671_88,
            2_397.236_759_613_297_2,
            -6_675.339_547_058_625_6,
        ));
        assert_eq!(roots.len(), 3);
        assert_relative_eq!(roots[0], 6.473_780, epsilon = 1e-3);
        assert_relative_eq!(roots[1], 6.476_679, epsilon = 1e-3);
        assert_relative_eq!(roots[2], 19.900_917, epsilon = 1e-4);
    }

    #[test]
    fn degree_4_regression_1() {
        let roots = sorted(quartic_roots(
            1.0,
            -2_015.640_502_929_687_5,
            1_523_294.993_686_098_8,
            -511_562_841.940_507_83,
            64_412_731_711.830_521,
        ));
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], 487.863_469, epsilon = 1e-2);
        assert_relative_eq!(roots[1], 519.956_783, epsilon = 1e-2);
    }

    #[test]
    fn degenerate_leading_coefficients_fall_through() {
        assert_eq!(linear_root(0.0, 5.0), None);
        assert_eq!(linear_root(2.0, -4.0), Some(2.0));
        let [x_0, x_1] = quadratic_roots(0.0, 2.0, -4.0);
        assert_eq!(x_0, Some(2.0));
        assert!(x_1.is_none());
    }

    #[test]
    fn non_finite_input_yields_no_roots() {
        assert!(sorted(quartic_roots(1.0, f64::NAN, 0.0, 0.0, 1.0)).is_empty());
        assert!(sorted(cubic_roots(1.0, f64::INFINITY, 0.0, 1.0)).is_empty());
        assert_eq!(linear_root(f64::NAN, 1.0), None);
    }

    /// P1: every returned root actually solves the polynomial.
    #[test]
    fn root_roundtrip_property() {
        let polys: [[f64; 5]; 6] = [
            [1.0, 4.0, -26.0, -60.0, 225.0],
            [1.0, -3.0, -19.0, 87.0, -90.0],
            [2.0, 0.0, -8.0, 0.0, 6.0],
            [1.0, 0.0, -2.0, 0.0, 0.5],
            [3.0, -7.0, 1.0, 9.0, -2.0],
            [1.0, 1.0, 1.0, 1.0, -4.0],
        ];
        for [a, b, c, d, e] in polys {
            let norm: f64 = [a, b, c, d, e].iter().map(|v| v.abs()).sum();
            for root in quartic_roots(a, b, c, d, e).into_iter().flatten() {
                let scale = root.abs().max(1.0).powi(4);
                let value = a * root.powi(4) + b * root.powi(3) + c * root * root + d * root + e;
                assert!(
                    value.abs() <= 1e-4 * norm * scale,
                    "root {root} of {a}x^4+{b}x^3+{c}x^2+{d}x+{e} leaves residual {value}"
                );
            }
        }
    }
}

mod intersection {
    use crate::hyplin::{HypOrLin, HyperbolicFunction, LinearFunction};
    use crate::intersection::*;
    use crate::limited::LimitedFunction;
    use approx::assert_relative_eq;

    #[test]
    fn linear_linear_one_intersection() {
        let lhs = LinearFunction::new(-1.0, 0.0, 2.0);
        let rhs = LinearFunction::new(3.0, 0.0, -5.0);
        let mut out = Vec::new();
        linear_linear(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(lhs.eval(out[0]), rhs.eval(out[0]), epsilon = 1e-9);

        let rhs_shifted = LinearFunction::new(3.0, 4.0, -5.0);
        let lhs_shifted = LinearFunction::new(-1.0, 4.0, 2.0);
        out.clear();
        linear_linear(&lhs_shifted, &rhs_shifted, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(lhs_shifted.eval(out[0]), rhs_shifted.eval(out[0]), epsilon = 1e-9);
    }

    #[test]
    fn linear_linear_parallel_no_intersection() {
        let lhs = LinearFunction::new(-1.0, 0.0, 2.0);
        let rhs = LinearFunction::new(-1.0, 0.0, -5.0);
        let mut out = Vec::new();
        linear_linear(&lhs, &rhs, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn linear_linear_regression() {
        let lhs = LinearFunction::new(-2.5, 0.0, 7.25);
        let rhs = LinearFunction::new(-1.5, 0.0, 4.5);
        let mut out = Vec::new();
        linear_linear(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 2.75, epsilon = 1e-9);
    }

    #[test]
    fn linear_hyperbolic_one_intersection() {
        let lhs = LinearFunction::new(-1.0, 0.0, 3.0);
        let rhs = HyperbolicFunction::new(4.0, 0.0, 0.0);
        let mut out = Vec::new();
        linear_hyperbolic(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 2.0, epsilon = 1e-9);

        // Same intersection, both shifted right by 5.
        let lhs = LinearFunction::new(-1.0, 5.0, 3.0);
        let rhs = HyperbolicFunction::new(4.0, 5.0, 0.0);
        out.clear();
        linear_hyperbolic(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 7.0, epsilon = 1e-6);
    }

    #[test]
    fn linear_hyperbolic_two_intersections() {
        let lhs = LinearFunction::new(-1.0, 0.0, 5.0);
        let rhs = HyperbolicFunction::new(4.0, 0.0, 0.0);
        let mut out = Vec::new();
        linear_hyperbolic(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 2);
        out.sort_by(f64::total_cmp);
        assert_relative_eq!(out[0], 1.0, epsilon = 1e-5);
        assert_relative_eq!(out[1], 4.828_43, epsilon = 1e-5);
        for x in out {
            assert_relative_eq!(lhs.eval(x), rhs.eval(x), epsilon = 1e-6);
        }
    }

    #[test]
    fn constant_hyperbolic_intersection() {
        let constant = LinearFunction::new(0.0, 0.0, 1.0);
        let rhs = HyperbolicFunction::new(4.0, 0.0, 0.0);
        let mut out = Vec::new();
        linear_hyperbolic(&constant, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 2.0, epsilon = 1e-9);

        // Constant below the asymptote: no crossing on the positive branch.
        let below = LinearFunction::new(0.0, 0.0, -1.0);
        out.clear();
        linear_hyperbolic(&below, &rhs, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn hyperbolic_hyperbolic_one_intersection() {
        let lhs = HyperbolicFunction::new(8.0, 0.0, -1.0);
        let rhs = HyperbolicFunction::new(4.0, 0.0, 0.0);
        let mut out = Vec::new();
        hyperbolic_hyperbolic(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(lhs.eval(out[0]), rhs.eval(out[0]), epsilon = 1e-6);
    }

    #[test]
    fn hyperbolic_hyperbolic_two_intersections() {
        let lhs = HyperbolicFunction::new(1.0, 0.25, 1.0);
        let rhs = HyperbolicFunction::new(4.0, 0.0, 0.0);
        let mut out = Vec::new();
        hyperbolic_hyperbolic(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 2);
        out.sort_by(f64::total_cmp);
        assert_relative_eq!(out[0], 0.518_34, epsilon = 1e-4);
        assert_relative_eq!(out[1], 1.612_23, epsilon = 1e-4);
        for x in out {
            assert_relative_eq!(lhs.eval(x), rhs.eval(x), max_relative = 1e-4);
        }
    }

    #[test]
    fn hyperbolic_hyperbolic_regression() {
        let lhs = HyperbolicFunction::new(394_773_248.0, 19.078_821_2, 177_889.062);
        let rhs = HyperbolicFunction::new(34_161_468.0, 57.910_812_4, 222_909.203);
        let mut out = Vec::new();
        hyperbolic_hyperbolic(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 2);
        for x in out {
            assert_relative_eq!(lhs.eval(x), rhs.eval(x), max_relative = 1e-4);
        }
    }

    #[test]
    fn limited_intersection_in_valid_range() {
        let lhs =
            LimitedFunction::new(0.0, 3.0, LinearFunction::new(-2.5, 0.0, 7.25).into());
        let rhs =
            LimitedFunction::new(1.0, 4.0, LinearFunction::new(-1.5, 0.0, 4.5).into());

        let mut out = Vec::new();
        intersect_limited(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], 2.75, epsilon = 1e-9);
        assert_relative_eq!(out[1], 3.166_67, epsilon = 1e-4);

        let mut reversed = Vec::new();
        intersect_limited(&rhs, &lhs, &mut reversed);
        reversed.sort_by(f64::total_cmp);
        assert_eq!(out, reversed);
    }

    #[test]
    fn limited_intersection_on_clamped_region() {
        let lhs =
            LimitedFunction::new(0.0, 3.0, LinearFunction::new(-2.5, 0.0, 7.25).into());
        let rhs =
            LimitedFunction::new(1.0, 2.0, LinearFunction::new(-1.5, 0.0, 4.5).into());

        let mut out = Vec::new();
        intersect_limited(&lhs, &rhs, &mut out);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0], 2.3, epsilon = 1e-9);
    }

    #[test]
    fn limited_intersection_before_clamped_region() {
        let lhs =
            LimitedFunction::new(0.0, 2.0, LinearFunction::new(-2.5, 0.0, 7.25).into());
        let rhs =
            LimitedFunction::new(1.0, 4.0, LinearFunction::new(-1.5, 0.0, 4.5).into());

        let mut out = Vec::new();
        intersect_limited(&lhs, &rhs, &mut out);
        assert!(out.is_empty());
    }

    /// P2: returned crossings really are crossings.
    #[test]
    fn intersection_residual_property() {
        let pairs = [
            (
                HypOrLin::from(LinearFunction::new(-1.0, 0.0, 5.0)),
                HypOrLin::from(HyperbolicFunction::new(4.0, 0.0, 0.0)),
            ),
            (
                HypOrLin::from(HyperbolicFunction::new(1.0, 0.25, 1.0)),
                HypOrLin::from(HyperbolicFunction::new(4.0, 0.0, 0.0)),
            ),
            (
                HypOrLin::from(LinearFunction::new(-2.5, 0.0, 7.25)),
                HypOrLin::from(LinearFunction::new(-1.5, 0.0, 4.5)),
            ),
        ];
        for (lhs, rhs) in pairs {
            let mut out = Vec::new();
            intersect(&lhs, &rhs, &mut out);
            assert!(!out.is_empty());
            for x in out {
                let fx = lhs.eval(x);
                let gx = rhs.eval(x);
                assert!((fx - gx).abs() < 1e-5 * (1.0 + fx.abs()), "f({x})={fx}, g({x})={gx}");
            }
        }
    }
}

mod envelope {
    use crate::envelope::{lower_envelope, lower_envelope_indexed, pareto_retain};
    use crate::hyplin::{HyperbolicFunction, LinearFunction};
    use crate::limited::LimitedFunction;
    use approx::assert_relative_eq;
    use watt_core::Fixed;

    fn sample_xs(lo: f64, hi: f64, n: usize) -> impl Iterator<Item = f64> {
        let step = (hi - lo) / n as f64;
        (0..=n).map(move |i| lo + step * i as f64)
    }

    #[test]
    fn single_function_is_its_own_envelope() {
        let f = LimitedFunction::new(1.0, 3.0, HyperbolicFunction::new(4.0, 0.0, 0.0).into());
        let (env, sources) = lower_envelope_indexed(&[f]);
        assert_eq!(sources, vec![0]);
        assert_eq!(env.pieces.len(), 1);
        assert_relative_eq!(env.min_x(), 1.0);
        assert_relative_eq!(env.max_x(), 3.0);
        assert_relative_eq!(env.eval(2.0), 1.0);
    }

    #[test]
    fn crossing_linear_functions() {
        let a = LimitedFunction::new(0.0, 3.0, LinearFunction::new(-2.5, 0.0, 7.25).into());
        let b = LimitedFunction::new(1.0, 2.0, LinearFunction::new(-1.5, 0.0, 4.5).into());
        let env = lower_envelope(&[a, b]);

        // P3: pointwise minimum everywhere.
        for x in sample_xs(0.0, 4.0, 64) {
            let expected = a.eval(x).min(b.eval(x));
            if expected.is_finite() {
                assert_relative_eq!(env.eval(x), expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn switch_to_clamped_tail_and_back() {
        // b's tail (1.5 from x=2) undercuts a until a catches up at x=2.3.
        let a = LimitedFunction::new(0.0, 3.0, LinearFunction::new(-2.5, 0.0, 7.25).into());
        let b = LimitedFunction::new(1.0, 2.0, LinearFunction::new(-1.5, 0.0, 4.5).into());
        let (env, sources) = lower_envelope_indexed(&[a, b]);

        assert_relative_eq!(env.eval(2.1), 1.5, epsilon = 1e-6);
        assert_relative_eq!(env.eval(2.9), a.eval(2.9), epsilon = 1e-6);
        // a owns the first and last emitted pieces, b the middle.
        assert_eq!(sources.first(), Some(&0));
        assert_eq!(sources.last(), Some(&0));
        assert!(sources.contains(&1));
    }

    #[test]
    fn envelope_of_hyperbolics_is_monotone_decreasing() {
        let functions = [
            LimitedFunction::new(1.0, 4.0, HyperbolicFunction::new(8.0, 0.0, 0.5).into()),
            LimitedFunction::new(1.5, 5.0, HyperbolicFunction::new(4.0, 0.5, 0.0).into()),
            LimitedFunction::new(0.8, 2.0, HyperbolicFunction::new(2.0, 0.0, 1.0).into()),
        ];
        let env = lower_envelope(&functions);

        // P3 + P4.
        let mut prev = f64::INFINITY;
        for x in sample_xs(0.8, 6.0, 128) {
            let expected = functions.iter().map(|f| f.eval(x)).fold(f64::INFINITY, f64::min);
            let got = env.eval(x);
            // The sweep resolves ties a lookahead epsilon to the right, so
            // samples inside that window may sit on the neighbouring piece.
            assert_relative_eq!(got, expected, epsilon = 1e-2);
            assert!(got <= prev + 1e-6, "envelope increased at {x}");
            prev = got;
        }
    }

    #[test]
    fn empty_input() {
        let env = lower_envelope(&[]);
        assert!(env.is_empty());
    }

    #[test]
    fn pareto_retain_drops_dominated_pairs() {
        let mut values = vec![
            (Fixed(300), Fixed(100)),
            (Fixed(100), Fixed(300)),
            (Fixed(200), Fixed(200)),
            (Fixed(250), Fixed(250)), // dominated by (200, 200)
            (Fixed(100), Fixed(400)), // dominated by (100, 300)
        ];
        pareto_retain(&mut values, |v| *v);
        assert_eq!(
            values,
            vec![(Fixed(100), Fixed(300)), (Fixed(200), Fixed(200)), (Fixed(300), Fixed(100))]
        );
    }
}

mod piecewise {
    use crate::hyplin::{HypOrLin, HyperbolicFunction};
    use crate::limited::LimitedFunction;
    use crate::piecewise::PiecewiseFunction;
    use approx::assert_relative_eq;

    fn front() -> PiecewiseFunction {
        PiecewiseFunction::from_pieces(vec![
            LimitedFunction::new(1.0, 2.0, HyperbolicFunction::new(4.0, 0.0, 0.0).into()),
            LimitedFunction::new(2.0, 4.0, HypOrLin::Linear(crate::LinearFunction::new(
                -0.25, 2.0, 1.0,
            ))),
        ])
    }

    #[test]
    fn eval_honours_bounds() {
        let f = front();
        assert!(f.eval(0.5).is_infinite());
        assert_relative_eq!(f.eval(1.0), 4.0);
        assert_relative_eq!(f.eval(2.0), 1.0);
        assert_relative_eq!(f.eval(3.0), 0.75);
        // Clamped beyond the last piece.
        assert_relative_eq!(f.eval(10.0), 0.5);
    }

    #[test]
    fn inverse_finds_smallest_x() {
        let f = front();
        assert_relative_eq!(f.inverse(4.0).unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(f.inverse(1.0).unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(f.inverse(0.75).unwrap(), 3.0, epsilon = 1e-9);
        assert!(f.inverse(0.4).is_none());
    }

    #[test]
    fn limit_from_x_trims_pieces() {
        let mut f = front();
        f.limit_from_x(1.5, 3.0);
        assert_relative_eq!(f.min_x(), 1.5);
        assert_relative_eq!(f.max_x(), 3.0);
        assert_eq!(f.pieces.len(), 2);

        let mut g = front();
        g.limit_from_x(2.5, f64::INFINITY);
        assert_eq!(g.pieces.len(), 1);
        assert_relative_eq!(g.min_x(), 2.5);
    }

    #[test]
    fn limit_into_clamp_tail_leaves_constant_point() {
        let mut f = front();
        f.limit_from_x(6.0, f64::INFINITY);
        assert_eq!(f.pieces.len(), 1);
        assert_relative_eq!(f.min_x(), 6.0);
        assert_relative_eq!(f.eval(7.0), 0.5);
    }

    #[test]
    fn clip_above_capacity() {
        let mut f = front();
        // 4/x^2 crosses 2.0 at x = sqrt(2).
        assert!(!f.clip_above(2.0));
        assert_relative_eq!(f.min_x(), 2.0_f64.sqrt(), epsilon = 1e-9);

        let mut g = front();
        // Everything is below 10.
        assert!(!g.clip_above(10.0));
        assert_relative_eq!(g.min_x(), 1.0);

        let mut h = front();
        // Nothing is below 0.1.
        assert!(h.clip_above(0.1));
    }
}

mod interp {
    use crate::interp::InterpolatingFunction;
    use approx::assert_relative_eq;

    fn delta() -> InterpolatingFunction {
        let mut f = InterpolatingFunction::new();
        f.push(1.0, 0.5);
        f.push(2.0, 1.0);
        f.push(4.0, 1.5);
        f
    }

    #[test]
    fn eval_interpolates_and_clamps() {
        let f = delta();
        assert!(f.eval(0.5).is_infinite());
        assert_relative_eq!(f.eval(1.0), 0.5);
        assert_relative_eq!(f.eval(1.5), 0.75);
        assert_relative_eq!(f.eval(3.0), 1.25);
        assert_relative_eq!(f.eval(9.0), 1.5);
    }

    #[test]
    fn limit_from_x_resamples_boundaries() {
        let mut f = delta();
        f.limit_from_x(1.5, 3.0);
        assert_relative_eq!(f.min_x(), 1.5);
        assert_relative_eq!(f.max_x(), 3.0);
        assert_relative_eq!(f.eval(1.5), 0.75);
        assert_relative_eq!(f.eval(3.0), 1.25);
    }

    #[test]
    fn duplicate_x_keeps_first_sample() {
        let mut f = InterpolatingFunction::new();
        f.push(1.0, 0.5);
        f.push(1.0, 0.9);
        assert_eq!(f.points.len(), 1);
        assert_relative_eq!(f.eval(1.0), 0.5);
    }
}

mod link {
    use crate::hyplin::{HypOrLin, HyperbolicFunction, LinearFunction};
    use crate::limited::LimitedFunction;
    use crate::link::{link_pieces, link_tradeoff};
    use crate::piecewise::PiecewiseFunction;
    use approx::assert_relative_eq;

    /// Brute-force the optimal split to validate closed forms.
    fn brute_link(f: &LimitedFunction, g: &LimitedFunction, x: f64) -> f64 {
        let mut best = f64::INFINITY;
        let n = 2000;
        for i in 0..=n {
            let t1 = f.min_x + (f.max_x - f.min_x) * i as f64 / n as f64;
            let t2 = x - t1;
            if t2 < g.min_x {
                continue;
            }
            best = best.min(f.eval(t1) + g.eval(t2));
        }
        best
    }

    #[test]
    fn constants_link_to_a_constant() {
        let f = LimitedFunction::constant(0.3, 1.0);
        let g = LimitedFunction::constant(0.5, 1.0);
        let out = link_pieces(&f, &g);
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].function.min_x, 0.8);
        assert_relative_eq!(out[0].function.eval(0.8), 2.0);
        assert_relative_eq!(out[0].parent_time.eval(0.8), 0.3);
    }

    #[test]
    fn symmetric_hyperbolics_match_derivatives() {
        let f = LimitedFunction::new(1.0, 3.0, HyperbolicFunction::new(4.0, 0.0, 0.0).into());
        let g = f;
        let out = link_pieces(&f, &g);
        // One matched regime covering the whole Minkowski sum.
        assert_eq!(out.len(), 1);
        let piece = &out[0];
        assert_relative_eq!(piece.function.min_x, 2.0);
        assert_relative_eq!(piece.function.max_x, 6.0);
        // 32/x^2: the closed form with cbrt(a') = 2 cbrt(4).
        assert_relative_eq!(piece.function.eval(4.0), 2.0, epsilon = 1e-9);
        assert_relative_eq!(piece.parent_time.eval(4.0), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn asymmetric_hyperbolics_against_brute_force() {
        let f = LimitedFunction::new(1.0, 2.0, HyperbolicFunction::new(4.0, 0.0, 1.0).into());
        let g = LimitedFunction::new(0.5, 4.0, HyperbolicFunction::new(9.0, 0.0, 0.0).into());
        let out = link_pieces(&f, &g);
        for piece in &out {
            let xs = [piece.function.min_x, (piece.function.min_x + piece.function.max_x) / 2.0];
            for x in xs {
                if x <= f.min_x + g.min_x + 1e-6 {
                    continue;
                }
                assert_relative_eq!(
                    piece.function.eval(x),
                    brute_link(&f, &g, x),
                    max_relative = 1e-2
                );
            }
        }
    }

    #[test]
    fn linear_linear_steeper_first() {
        let f = LimitedFunction::new(1.0, 2.0, LinearFunction::new(-2.0, 1.0, 5.0).into());
        let g = LimitedFunction::new(1.0, 3.0, LinearFunction::new(-1.0, 1.0, 4.0).into());
        let out = link_pieces(&f, &g);
        assert_eq!(out.len(), 2);
        // First regime drains the steeper function f.
        assert_relative_eq!(out[0].function.min_x, 2.0);
        assert_relative_eq!(out[0].function.max_x, 3.0);
        assert_relative_eq!(out[0].function.eval(2.0), 9.0);
        assert_relative_eq!(out[0].function.eval(3.0), 7.0);
        assert_relative_eq!(out[0].parent_time.eval(2.5), 1.5);
        // Then g.
        assert_relative_eq!(out[1].function.eval(5.0), 5.0);
        assert_relative_eq!(out[1].parent_time.eval(4.0), 2.0);
    }

    #[test]
    fn linear_hyperbolic_against_brute_force() {
        let f = LimitedFunction::new(1.0, 3.0, LinearFunction::new(-0.5, 1.0, 3.0).into());
        let g = LimitedFunction::new(1.0, 5.0, HyperbolicFunction::new(8.0, 0.0, 0.0).into());
        for x in [2.5, 3.0, 4.0, 5.5, 7.0] {
            let out = link_pieces(&f, &g);
            let linked: f64 = out
                .iter()
                .map(|p| p.function.eval(x))
                .fold(f64::INFINITY, f64::min);
            assert_relative_eq!(linked, brute_link(&f, &g, x), max_relative = 1e-2);
        }
    }

    #[test]
    fn tradeoff_link_with_constant_edge_shifts() {
        let cost = PiecewiseFunction::constant(0.3, 1.0);
        let edge = LimitedFunction::constant(0.5, 1.0);
        let (linked, delta) = link_tradeoff(&cost, &edge);
        assert_relative_eq!(linked.min_x(), 0.8, epsilon = 1e-9);
        assert_relative_eq!(linked.eval(0.8), 2.0, epsilon = 1e-9);
        // Delta maps the total time back to the arrival time at the parent.
        assert_relative_eq!(delta.eval(0.8), 0.3, epsilon = 1e-9);
    }

    #[test]
    fn tradeoff_link_envelopes_piece_candidates() {
        let cost = PiecewiseFunction::single(LimitedFunction::new(
            1.0,
            3.0,
            HyperbolicFunction::new(4.0, 0.0, 0.0).into(),
        ));
        let edge = LimitedFunction::new(1.0, 3.0, HyperbolicFunction::new(4.0, 0.0, 0.0).into());
        let (linked, delta) = link_tradeoff(&cost, &edge);
        assert_relative_eq!(linked.min_x(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(linked.eval(4.0), 2.0, epsilon = 1e-6);
        // Symmetric split: half the time is spent before the edge.
        assert_relative_eq!(delta.eval(4.0), 2.0, epsilon = 1e-6);
        assert!(matches!(
            linked.pieces[0].function,
            HypOrLin::Hyperbolic(_)
        ));
    }
}
