//! Championship points awarded for a finishing position.

const TOP_POSITIONS: [i32; 15] = [100, 80, 60, 50, 45, 40, 36, 32, 29, 26, 24, 22, 20, 18, 16];

/// Last position that still earns a point.
pub const LAST_SCORING_POSITION: usize = 30;

/// Points earned for a 1-based `position`; zero outside the scoring range.
pub fn points_for_position(position: usize) -> i32 {
    match position {
        0 => 0,
        p if p <= TOP_POSITIONS.len() => TOP_POSITIONS[p - 1],
        p if p <= LAST_SCORING_POSITION => (LAST_SCORING_POSITION - p + 1) as i32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 100)]
    #[case(2, 80)]
    #[case(15, 16)]
    #[case(16, 15)]
    #[case(30, 1)]
    #[case(31, 0)]
    #[case(0, 0)]
    fn awards_points_by_position(#[case] position: usize, #[case] expected: i32) {
        assert_eq!(points_for_position(position), expected);
    }

    #[test]
    fn table_never_increases_with_position() {
        let points: Vec<i32> = (1..=40).map(points_for_position).collect();
        assert!(points.windows(2).all(|w| w[0] >= w[1]));
    }
}
