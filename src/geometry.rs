//! Pure landmark geometry: eye openness and head roll.
//!
//! Degenerate input never fails. A malformed eye sample reads as fully open
//! and a missing ear reads as level, so a single bad frame simply cannot
//! confirm a gesture.

use crate::constants::{EPSILON, EYE_SAMPLE_POINTS, FULLY_OPEN_RATIO};
use crate::landmarks::Point;

/// Eye aspect ratio of a six point eye sample.
///
/// Points are ordered p1 (corner), p2, p3 (upper lid), p4 (corner), p5, p6
/// (lower lid). The ratio is `(|p2-p6| + |p3-p5|) / (2 * |p1-p4|)`.
///
/// Returns [`FULLY_OPEN_RATIO`] when fewer than six points are supplied or
/// the corners coincide.
#[must_use]
pub fn eye_openness(points: &[Point]) -> f64 {
    if points.len() < EYE_SAMPLE_POINTS {
        return FULLY_OPEN_RATIO;
    }

    let horizontal = points[0].distance(&points[3]);
    if horizontal < EPSILON {
        return FULLY_OPEN_RATIO;
    }

    let vertical1 = points[1].distance(&points[5]);
    let vertical2 = points[2].distance(&points[4]);

    (vertical1 + vertical2) / (2.0 * horizontal)
}

/// Head roll in degrees from the line joining the ears.
///
/// Positive when the right ear sits lower in the image than the left ear.
/// Returns 0 when either ear is missing.
#[must_use]
pub fn head_roll_angle(left_ear: Option<Point>, right_ear: Option<Point>) -> f64 {
    let (Some(left), Some(right)) = (left_ear, right_ear) else {
        return 0.0;
    };

    let dy = right.y - left.y;
    let dx = right.x - left.x;

    dy.atan2(dx).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eye(width: f64, height: f64) -> Vec<Point> {
        let h = height / 2.0;
        vec![
            Point::new(0.0, 0.0),
            Point::new(width / 3.0, -h),
            Point::new(2.0 * width / 3.0, -h),
            Point::new(width, 0.0),
            Point::new(2.0 * width / 3.0, h),
            Point::new(width / 3.0, h),
        ]
    }

    #[test]
    fn test_eye_openness_regular() {
        // Both verticals equal the height, so the ratio is height / width
        let ratio = eye_openness(&eye(10.0, 3.0));
        assert!((ratio - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_eye_openness_closed() {
        assert!(eye_openness(&eye(10.0, 0.0)).abs() < 1e-12);
    }

    #[test]
    fn test_eye_openness_degenerate() {
        assert_eq!(eye_openness(&[]), FULLY_OPEN_RATIO);
        assert_eq!(eye_openness(&eye(10.0, 3.0)[..5]), FULLY_OPEN_RATIO);
        assert_eq!(eye_openness(&[Point::new(1.0, 1.0); 6]), FULLY_OPEN_RATIO);
    }

    #[test]
    fn test_head_roll_angle() {
        let left = Point::new(0.0, 0.0);
        assert!((head_roll_angle(Some(left), Some(Point::new(1.0, 1.0))) - 45.0).abs() < 1e-9);
        assert!((head_roll_angle(Some(left), Some(Point::new(1.0, -1.0))) + 45.0).abs() < 1e-9);
        assert_eq!(head_roll_angle(Some(left), Some(Point::new(1.0, 0.0))), 0.0);
    }

    #[test]
    fn test_head_roll_missing_ear() {
        assert_eq!(head_roll_angle(None, Some(Point::new(1.0, 1.0))), 0.0);
        assert_eq!(head_roll_angle(Some(Point::new(1.0, 1.0)), None), 0.0);
        assert_eq!(head_roll_angle(None, None), 0.0);
    }

    proptest! {
        #[test]
        fn prop_short_samples_are_fully_open(len in 0usize..6, x in -1e3f64..1e3, y in -1e3f64..1e3) {
            let points = vec![Point::new(x, y); len];
            prop_assert_eq!(eye_openness(&points), FULLY_OPEN_RATIO);
        }

        #[test]
        fn prop_openness_non_negative(width in 1.0f64..100.0, height in 0.0f64..100.0) {
            let ratio = eye_openness(&eye(width, height));
            prop_assert!(ratio >= 0.0);
            prop_assert!(ratio.is_finite());
        }

        #[test]
        fn prop_coincident_ears_are_level(x in -1e3f64..1e3, y in -1e3f64..1e3) {
            let p = Point::new(x, y);
            prop_assert_eq!(head_roll_angle(Some(p), Some(p)), 0.0);
        }
    }
}
