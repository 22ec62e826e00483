/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```should_panic
/// use gridq::assert_interval;
///
/// let alpha = 2.0;
/// assert_interval!(alpha, 0.0, 1.0);
/// ```
/// This will panic with the message "Invalid value for \`alpha\`. Must be in the interval \[0, 1\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn interval_accepts_bounds() {
        let gamma = 1.0;
        assert_interval!(gamma, 0.0, 1.0);
        let gamma = 0.0;
        assert_interval!(gamma, 0.0, 1.0);
    }

    #[test]
    #[should_panic(expected = "Invalid value for `alpha`")]
    fn interval_rejects_outside() {
        let alpha = -0.5;
        assert_interval!(alpha, 0.0, 1.0);
    }
}
