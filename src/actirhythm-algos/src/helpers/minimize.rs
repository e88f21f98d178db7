/// Golden-section step constant, `2 - phi`.
const CGOLD: f64 = 0.381_966_011_250_105;

const TOL: f64 = 1e-8;
const ZEPS: f64 = 1e-11;
const MAX_ITER: usize = 100;

/// Bounded scalar minimization by Brent's method: golden-section search
/// with parabolic interpolation steps where the local quadratic fit is
/// trustworthy.
///
/// Returns the abscissa of the minimum of `f` on `[a, b]`. The objective
/// must be unimodal on the bracket for a guaranteed global answer;
/// otherwise a local minimum inside the bracket is returned.
pub fn brent_min<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> f64 {
    let (mut a, mut b) = if a < b { (a, b) } else { (b, a) };

    let mut x = a + CGOLD * (b - a);
    let mut w = x;
    let mut v = x;
    let mut fx = f(x);
    let mut fw = fx;
    let mut fv = fx;

    // d: last step, e: step before last
    let mut d = 0.0_f64;
    let mut e = 0.0_f64;

    for _ in 0..MAX_ITER {
        let mid = 0.5 * (a + b);
        let tol1 = TOL * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;

        if (x - mid).abs() <= tol2 - 0.5 * (b - a) {
            break;
        }

        let mut golden = true;
        if e.abs() > tol1 {
            // Parabola through (x, fx), (w, fw), (v, fv)
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_prev = e;
            e = d;

            if p.abs() < (0.5 * q * e_prev).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = tol1.copysign(mid - x);
                }
                golden = false;
            }
        }

        if golden {
            e = if x < mid { b - x } else { a - x };
            d = CGOLD * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + tol1.copysign(d)
        };
        let fu = f(u);

        if fu <= fx {
            if u < x {
                b = x;
            } else {
                a = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    x
}
