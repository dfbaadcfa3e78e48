use chrono::NaiveDate;
use serde::Serialize;

use crate::balance::{WeeklyBalance, weekly_nutrition_balance};
use crate::compliance::{DayCompliance, classify_day};
use crate::day::{DayWindow, week_window};
use crate::models::{DailyLog, UserGoals};
use crate::streak::{Badge, StreakCounts, badges, streak_counts};
use crate::weight::{WeightPoint, WeightWeekStats, weekly_weight_stats, weight_series};

/// Weigh-ins kept for the weight trend.
pub const RECENT_WEIGH_INS: usize = 14;

/// Everything the overview screen shows, derived from one snapshot of logs and goals.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub week: DayWindow,
    pub goals: Option<UserGoals>,
    pub log_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_log: Option<DailyLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today_compliance: Option<DayCompliance>,
    pub weekly_balance: Option<WeeklyBalance>,
    pub weight: WeightWeekStats,
    pub recent_weights: Vec<WeightPoint>,
    pub streaks: StreakCounts,
    pub badges: Vec<Badge>,
}

impl Dashboard {
    #[must_use]
    pub fn build(logs: &[DailyLog], goals: Option<&UserGoals>, today: NaiveDate) -> Self {
        let today_log = logs.iter().find(|l| l.date == today).cloned();
        let today_compliance = today_log.as_ref().and_then(|l| classify_day(l, goals));
        let streaks = streak_counts(logs, goals);
        Self {
            today,
            week: week_window(today),
            goals: goals.copied(),
            log_count: logs.len(),
            today_log,
            today_compliance,
            weekly_balance: weekly_nutrition_balance(logs, goals, today),
            weight: weekly_weight_stats(logs, today),
            recent_weights: weight_series(logs, RECENT_WEIGH_INS),
            badges: badges(&streaks),
            streaks,
        }
    }

    #[must_use]
    pub fn has_goals(&self) -> bool {
        self.goals.is_some()
    }
}
