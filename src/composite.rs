use serde::Serialize;

use crate::trailing::TrailingAverage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CompositeScore {
    Score(f64),
    /// At least one of the four averages is undefined.
    InsufficientData,
    /// Both teams' averages match on both sides; the weighted term has no denominator.
    NoSpread,
}

impl CompositeScore {
    pub fn value(self) -> Option<f64> {
        match self {
            CompositeScore::Score(v) => Some(v),
            _ => None,
        }
    }
}

pub fn composite_score(team1: &TrailingAverage, team2: &TrailingAverage) -> CompositeScore {
    match (team1.active, team1.passive, team2.active, team2.passive) {
        (Some(x), Some(y), Some(z), Some(w)) => composite_from_means(x, y, z, w),
        _ => CompositeScore::InsufficientData,
    }
}

/// `x, y` are team 1's active/passive means, `z, w` team 2's.
///
/// ```text
/// blend = ((x + z)|x - z| + (y + w)|y - w|) / (|x - z| + |y - w|)
/// score = (blend + (x + w) / 2 + (3y - z) / 2) / 2
/// ```
pub fn composite_from_means(x: f64, y: f64, z: f64, w: f64) -> CompositeScore {
    if ![x, y, z, w].iter().all(|v| v.is_finite()) {
        return CompositeScore::InsufficientData;
    }
    let dxz = (x - z).abs();
    let dyw = (y - w).abs();
    let denominator = dxz + dyw;
    if denominator == 0.0 {
        return CompositeScore::NoSpread;
    }
    let blend = ((x + z) * dxz + (y + w) * dyw) / denominator;
    CompositeScore::Score((blend + (x + w) / 2.0 + (3.0 * y - z) / 2.0) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avg(active: Option<f64>, passive: Option<f64>) -> TrailingAverage {
        TrailingAverage {
            active,
            passive,
            sample: 7,
        }
    }

    #[test]
    fn known_value() {
        // blend = (14.5 * 3.5 + 14.5 * 3.5) / 7 = 14.5
        let score = composite_from_means(9.0, 5.5, 5.5, 9.0);
        assert_eq!(score, CompositeScore::Score((14.5 + 9.0 + 5.5) / 2.0));
    }

    #[test]
    fn identical_averages_have_no_spread() {
        assert_eq!(composite_from_means(4.0, 2.0, 4.0, 2.0), CompositeScore::NoSpread);
        assert_eq!(
            composite_score(&avg(Some(4.0), Some(2.0)), &avg(Some(4.0), Some(2.0))).value(),
            None
        );
    }

    #[test]
    fn one_sided_spread_is_fine() {
        // Only the active side differs.
        let score = composite_from_means(6.0, 3.0, 2.0, 3.0).value().expect("defined");
        let blend = 8.0;
        let expected = (blend + (6.0 + 3.0) / 2.0 + (9.0 - 2.0) / 2.0) / 2.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn swapping_teams_shifts_by_half_the_total_difference() {
        // The blend term is symmetric, so the swap only moves the two linear terms.
        let (x, y, z, w) = (7.3, 4.1, 5.2, 6.6);
        let forward = composite_from_means(x, y, z, w).value().unwrap();
        let swapped = composite_from_means(z, w, x, y).value().unwrap();
        let expected = ((x + y) - (z + w)) / 2.0;
        assert!((forward - swapped - expected).abs() < 1e-12);
    }

    #[test]
    fn undefined_input_is_insufficient_data() {
        assert_eq!(
            composite_score(&avg(None, Some(1.0)), &avg(Some(2.0), Some(3.0))),
            CompositeScore::InsufficientData
        );
        assert_eq!(
            composite_from_means(f64::NAN, 1.0, 2.0, 3.0),
            CompositeScore::InsufficientData
        );
    }
}
