/// Trapezoidal approximation of the integral of `f` over `[a, b]` with `n`
/// partitions. Around `(b - a) * 100` partitions gives decent precision for
/// well-behaved functions.
pub fn integrate(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    assert!(n > 0, "Need at least one partition");

    let h = (b - a) / n as f64;
    let samples: Vec<f64> = (0..=n).map(|i| f(a + i as f64 * h)).collect();

    let mut integral = (samples[0] + samples[n]) / 2.0;
    for s in &samples[1..n] {
        integral += s;
    }
    integral * h
}

/// Slope of `f` at `a`, by symmetric difference quotient.
pub fn derive(f: impl Fn(f64) -> f64, a: f64) -> f64 {
    let h = 1e-3;
    (f(a + h) - f(a - h)) / (2.0 * h)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate() {
        // integral of x^2 over [0, 1] is 1/3
        let result = integrate(|x| x * x, 0.0, 1.0, 1000);
        assert!((result - 1.0 / 3.0).abs() < 1e-6);

        // integral of sin over [0, pi] is 2
        let result = integrate(f64::sin, 0.0, std::f64::consts::PI, 1000);
        assert!((result - 2.0).abs() < 1e-5);

        // constant function, exact up to rounding
        let result = integrate(|_| 3.0, -2.0, 2.0, 10);
        assert!((result - 12.0).abs() < 1e-12);

        // reversed bounds flip the sign
        let result = integrate(|x| x * x, 1.0, 0.0, 1000);
        assert!((result + 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_derive() {
        assert!((derive(|x| x * x, 3.0) - 6.0).abs() < 1e-6);
        assert!((derive(f64::sin, 0.0) - 1.0).abs() < 1e-6);
        assert!(derive(|_| 42.0, 7.0).abs() < 1e-12);
    }
}
