//! Euclidean distance between planar points.

/// Euclidean distance between `(x1, y1)` and `(x2, y2)`.
///
/// # Examples
///
/// ```
/// use mihmds::distance::euclidean;
///
/// assert!((euclidean(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-10);
/// ```
#[inline]
pub fn euclidean(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_345() {
        assert!((euclidean(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_euclidean_symmetric() {
        let a = euclidean(1.0, 2.0, 4.0, 6.0);
        let b = euclidean(4.0, 6.0, 1.0, 2.0);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_euclidean_zero() {
        assert_eq!(euclidean(7.5, -2.0, 7.5, -2.0), 0.0);
    }
}
