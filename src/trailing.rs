use serde::Serialize;

use crate::query::{MatchLine, chronological};

pub const TRAILING_WINDOW: usize = 7;

/// Means over the most recent games. `None` means there was nothing to average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrailingAverage {
    pub active: Option<f64>,
    pub passive: Option<f64>,
    pub sample: usize,
}

impl TrailingAverage {
    pub fn is_defined(&self) -> bool {
        self.active.is_some() && self.passive.is_some()
    }
}

pub fn trailing_average(lines: &[MatchLine]) -> TrailingAverage {
    trailing_average_over(lines, TRAILING_WINDOW)
}

pub fn trailing_average_over(lines: &[MatchLine], window: usize) -> TrailingAverage {
    let mut sorted: Vec<&MatchLine> = lines.iter().collect();
    sorted.sort_by(|a, b| chronological(a, b));
    let tail = &sorted[sorted.len().saturating_sub(window)..];
    TrailingAverage {
        active: mean(tail.iter().map(|l| l.active)),
        passive: mean(tail.iter().map(|l| l.passive)),
        sample: tail.len(),
    }
}

// Blank cells are skipped, the way a column mean ignores missing values.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::reshape::Venue;

    fn line(day: u32, active: Option<f64>, passive: Option<f64>) -> MatchLine {
        MatchLine {
            date: NaiveDate::from_ymd_opt(2024, 1, day),
            kickoff: "15:00".to_string(),
            opponent: format!("O{day}"),
            venue: Venue::Home,
            active,
            passive,
            result: None,
        }
    }

    #[test]
    fn uses_only_the_last_seven_by_date() {
        // Input deliberately newest-first; days 1..=3 fall outside the window.
        let lines: Vec<MatchLine> = (1..=10)
            .rev()
            .map(|d| line(d, Some(d as f64), Some(100.0)))
            .collect();
        let avg = trailing_average(&lines);
        assert_eq!(avg.sample, 7);
        assert_eq!(avg.active, Some((4..=10).sum::<u32>() as f64 / 7.0));
        assert_eq!(avg.passive, Some(100.0));
    }

    #[test]
    fn short_history_uses_everything() {
        let lines = vec![line(1, Some(10.0), Some(5.0)), line(8, Some(8.0), Some(6.0))];
        let avg = trailing_average(&lines);
        assert_eq!(avg.sample, 2);
        assert_eq!(avg.active, Some(9.0));
        assert_eq!(avg.passive, Some(5.5));
    }

    #[test]
    fn undated_rows_stay_in_the_window() {
        let mut lines: Vec<MatchLine> = (1..=8).map(|d| line(d, Some(1.0), Some(1.0))).collect();
        let mut undated = line(9, Some(50.0), Some(1.0));
        undated.date = None;
        lines.insert(0, undated);

        let avg = trailing_average(&lines);
        assert_eq!(avg.sample, 7);
        // Days 3..=8 plus the undated row.
        assert_eq!(avg.active, Some((6.0 + 50.0) / 7.0));
    }

    #[test]
    fn empty_is_undefined_not_zero() {
        let avg = trailing_average(&[]);
        assert_eq!(avg.sample, 0);
        assert_eq!(avg.active, None);
        assert_eq!(avg.passive, None);
        assert!(!avg.is_defined());
    }

    #[test]
    fn blank_cells_are_skipped() {
        let lines = vec![line(1, Some(4.0), None), line(2, None, None)];
        let avg = trailing_average(&lines);
        assert_eq!(avg.sample, 2);
        assert_eq!(avg.active, Some(4.0));
        assert_eq!(avg.passive, None);
    }
}
