use chrono::NaiveDate;
use serde::Serialize;

use crate::day::{DayWindow, previous_week_window, week_window};
use crate::models::DailyLog;

/// Average weight for this week and last. An average of 0 means no weighed days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightWeekStats {
    pub current_avg: f64,
    pub last_avg: f64,
    /// `current_avg - last_avg`. Only meaningful when both weeks have data.
    pub diff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Down,
    Flat,
    Up,
}

impl WeightWeekStats {
    #[must_use]
    pub fn has_comparison(&self) -> bool {
        self.current_avg > 0.0 && self.last_avg > 0.0
    }

    #[must_use]
    pub fn trend(&self) -> Option<WeightTrend> {
        if !self.has_comparison() {
            return None;
        }
        Some(if self.diff < 0.0 {
            WeightTrend::Down
        } else if self.diff > 0.0 {
            WeightTrend::Up
        } else {
            WeightTrend::Flat
        })
    }
}

/// Mean of the recorded weights inside `window`, or 0 if none were recorded.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_weight(logs: &[DailyLog], window: DayWindow) -> f64 {
    let (sum, count) = logs
        .iter()
        .filter(|l| window.contains(l.date) && l.has_weight())
        .fold((0.0, 0usize), |(sum, n), l| (sum + l.weight, n + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[must_use]
pub fn weekly_weight_stats(logs: &[DailyLog], today: NaiveDate) -> WeightWeekStats {
    let current_avg = average_weight(logs, week_window(today));
    let last_avg = average_weight(logs, previous_week_window(today));
    WeightWeekStats {
        current_avg,
        last_avg,
        diff: current_avg - last_avg,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

/// The `limit` most recent recorded weights, oldest first.
#[must_use]
pub fn weight_series(logs: &[DailyLog], limit: usize) -> Vec<WeightPoint> {
    let mut points: Vec<WeightPoint> = logs
        .iter()
        .filter(|l| l.has_weight())
        .map(|l| WeightPoint {
            date: l.date,
            weight: l.weight,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    let skip = points.len().saturating_sub(limit);
    points.split_off(skip)
}
