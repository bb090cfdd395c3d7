//! Ordinary-least-squares trend lines.

use mortality_map_analytics_models::TrendLine;

/// Fits an ordinary-least-squares line through `points` and evaluates it
/// at the smallest and largest x.
///
/// Returns `None` (no trend line) when:
///
/// * fewer than two points are supplied,
/// * any coordinate is non-finite,
/// * every point shares the same x (vertical regression, zero
///   denominator),
/// * the fit itself overflows to a non-finite value.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn trend_line(points: &[(f64, f64)]) -> Option<TrendLine> {
    if points.len() < 2 {
        log::debug!("No trend line: {} point(s) supplied", points.len());
        return None;
    }

    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        log::debug!("No trend line: input contains non-finite coordinates");
        return None;
    }

    let (x_min, x_max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (x, _)| {
        (lo.min(*x), hi.max(*x))
    });

    if x_min == x_max {
        log::debug!("No trend line: all {} points share x = {x_min}", points.len());
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    // Centred form of (n*Sxy - Sx*Sy) / (n*Sxx - Sx^2).
    let (sxx, sxy) = points.iter().fold((0.0_f64, 0.0_f64), |(sxx, sxy), (x, y)| {
        let dx = x - mean_x;
        (dx.mul_add(dx, sxx), dx.mul_add(y - mean_y, sxy))
    });

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);

    let line = TrendLine {
        x1: x_min,
        y1: slope.mul_add(x_min, intercept),
        x2: x_max,
        y2: slope.mul_add(x_max, intercept),
        slope,
        intercept,
    };

    if [line.y1, line.y2, slope, intercept]
        .iter()
        .all(|v| v.is_finite())
    {
        Some(line)
    } else {
        log::warn!("No trend line: fit over {} points is not finite", points.len());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn identity_line() {
        let t = trend_line(&[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        assert!((t.slope - 1.0).abs() < EPS);
        assert!(t.intercept.abs() < EPS);
        assert!(t.x1.abs() < EPS && t.y1.abs() < EPS);
        assert!((t.x2 - 10.0).abs() < EPS && (t.y2 - 10.0).abs() < EPS);
    }

    #[test]
    fn fits_noisy_points() {
        // Least-squares solution is y = 1.8x + 1.3.
        let points = [(0.0, 1.5), (1.0, 2.5), (2.0, 5.5), (3.0, 6.5)];
        let t = trend_line(&points).unwrap();
        assert!((t.slope - 1.8).abs() < EPS);
        assert!((t.intercept - 1.3).abs() < EPS);
        assert!((t.y_at(3.0) - t.y2).abs() < EPS);
    }

    #[test]
    fn endpoints_use_min_and_max_x_regardless_of_order() {
        let t = trend_line(&[(5.0, 1.0), (1.0, 2.0), (3.0, 1.5)]).unwrap();
        assert!((t.x1 - 1.0).abs() < EPS);
        assert!((t.x2 - 5.0).abs() < EPS);
        assert!(t.slope < 0.0);
    }

    #[test]
    fn fewer_than_two_points() {
        assert!(trend_line(&[]).is_none());
        assert!(trend_line(&[(1.0, 1.0)]).is_none());
    }

    #[test]
    fn vertical_input_has_no_trend() {
        assert!(trend_line(&[(0.1, 1.0), (0.1, 2.0), (0.1, 3.0)]).is_none());
    }

    #[test]
    fn non_finite_input_has_no_trend() {
        assert!(trend_line(&[(0.0, 1.0), (f64::NAN, 2.0)]).is_none());
        assert!(trend_line(&[(0.0, f64::INFINITY), (1.0, 2.0)]).is_none());
    }

    #[test]
    fn horizontal_input_has_zero_slope() {
        let t = trend_line(&[(1.0, 4.0), (2.0, 4.0), (9.0, 4.0)]).unwrap();
        assert!(t.slope.abs() < EPS);
        assert!((t.intercept - 4.0).abs() < EPS);
    }
}
