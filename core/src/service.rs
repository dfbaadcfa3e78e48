use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::balance::{WeeklyBalance, weekly_nutrition_balance};
use crate::compliance::{DayCompliance, classify_day};
use crate::dashboard::Dashboard;
use crate::db::Database;
use crate::export::{build_backup, write_csv};
use crate::models::{
    Backup, DailyLog, LogField, RestoreSummary, UserGoals, validate_daily_log, validate_goals,
};
use crate::streak::{StreakCounts, streak_counts};
use crate::weight::{WeightWeekStats, weekly_weight_stats};

/// Result of saving a log: what was stored, what it replaced, and which fields moved.
#[derive(Debug, Clone, Serialize)]
pub struct SavedLog {
    pub log: DailyLog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<DailyLog>,
    pub changed: Vec<LogField>,
}

impl SavedLog {
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.previous.is_some()
    }
}

/// A stored day with its classification against the current goals.
#[derive(Debug, Clone, Serialize)]
pub struct LogReview {
    pub log: DailyLog,
    pub compliance: Option<DayCompliance>,
}

pub struct TrackerService {
    db: Database,
}

impl TrackerService {
    pub fn open(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    // --- Logs ---

    pub fn save_log(&self, log: &DailyLog) -> Result<SavedLog> {
        validate_daily_log(log)?;
        let previous = self.db.upsert_log(log)?;
        let changed = match &previous {
            Some(prev) => log.changed_fields(prev),
            None => Vec::new(),
        };
        if previous.is_some() {
            log::info!("updated log for {} ({} field(s) changed)", log.date, changed.len());
        } else {
            log::info!("added log for {}", log.date);
        }
        Ok(SavedLog {
            log: log.clone(),
            previous,
            changed,
        })
    }

    pub fn delete_log(&self, date: NaiveDate) -> Result<bool> {
        let deleted = self.db.delete_log(date)?;
        if deleted {
            log::info!("deleted log for {date}");
        }
        Ok(deleted)
    }

    pub fn get_log(&self, date: NaiveDate) -> Result<Option<DailyLog>> {
        self.db.get_log(date)
    }

    pub fn classify_log(&self, date: NaiveDate) -> Result<Option<LogReview>> {
        let Some(log) = self.db.get_log(date)? else {
            return Ok(None);
        };
        let goals = self.db.get_goals()?;
        Ok(Some(LogReview {
            compliance: classify_day(&log, goals.as_ref()),
            log,
        }))
    }

    /// Logs newest first, optionally limited to the most recent `limit`.
    pub fn history(&self, limit: Option<usize>) -> Result<Vec<DailyLog>> {
        self.db.list_logs(limit)
    }

    pub fn logs_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyLog>> {
        self.db.logs_between(start, end)
    }

    // --- Goals ---

    pub fn set_goals(&self, goals: &UserGoals) -> Result<UserGoals> {
        validate_goals(goals)?;
        let saved = self.db.set_goals(goals)?;
        log::info!(
            "goals set: {} kcal, {}g protein, {}g carbs, {}g fat",
            saved.calories,
            saved.protein,
            saved.carbs,
            saved.fat
        );
        Ok(saved)
    }

    pub fn goals(&self) -> Result<Option<UserGoals>> {
        self.db.get_goals()
    }

    /// Stored goals, or the defaults when none are set. Does not persist.
    pub fn goals_or_default(&self) -> Result<UserGoals> {
        Ok(self.db.get_goals()?.unwrap_or_default())
    }

    pub fn clear_goals(&self) -> Result<bool> {
        self.db.clear_goals()
    }

    // --- Derived metrics ---

    pub fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        let logs = self.db.list_logs(None)?;
        let goals = self.db.get_goals()?;
        log::debug!("building dashboard for {today} from {} log(s)", logs.len());
        Ok(Dashboard::build(&logs, goals.as_ref(), today))
    }

    pub fn weekly_balance(&self, today: NaiveDate) -> Result<Option<WeeklyBalance>> {
        let logs = self.db.list_logs(None)?;
        let goals = self.db.get_goals()?;
        Ok(weekly_nutrition_balance(&logs, goals.as_ref(), today))
    }

    pub fn weight_stats(&self, today: NaiveDate) -> Result<WeightWeekStats> {
        let logs = self.db.list_logs(None)?;
        Ok(weekly_weight_stats(&logs, today))
    }

    pub fn streaks(&self) -> Result<StreakCounts> {
        let logs = self.db.list_logs(None)?;
        let goals = self.db.get_goals()?;
        Ok(streak_counts(&logs, goals.as_ref()))
    }

    // --- Export / Import ---

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let logs = self.db.list_logs(None)?;
        write_csv(&logs, writer)
    }

    pub fn backup(&self) -> Result<Backup> {
        let logs = self.db.list_logs(None)?;
        let goals = self.db.get_goals()?;
        Ok(build_backup(&logs, goals, Local::now().to_rfc3339()))
    }

    /// Merge a backup into the store in one transaction. Invalid logs are skipped,
    /// valid ones replace any existing log for the same day.
    pub fn restore(&self, backup: &Backup) -> Result<RestoreSummary> {
        let mut summary = RestoreSummary::default();
        let goals = backup.goals.as_ref().filter(|g| match validate_goals(g) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("skipping goals from backup: {e:#}");
                false
            }
        });
        let mut valid = Vec::with_capacity(backup.logs.len());
        for log in &backup.logs {
            if let Err(e) = validate_daily_log(log) {
                log::warn!("skipping log for {}: {e:#}", log.date);
                summary.logs_skipped += 1;
                continue;
            }
            valid.push(log.clone());
        }

        let written = self
            .db
            .merge_records(goals, &valid)
            .context("Failed to restore backup")?;
        summary.logs_restored = i64::try_from(written).unwrap_or(i64::MAX);
        summary.goals_restored = goals.is_some();
        log::info!(
            "restored {} log(s), skipped {}",
            summary.logs_restored,
            summary.logs_skipped
        );
        Ok(summary)
    }

    /// Replace all logs with `logs`, installing `goals` first if none are set.
    /// Returns the goals in effect afterwards.
    pub fn load_demo(&self, logs: &[DailyLog], goals: &UserGoals) -> Result<UserGoals> {
        for log in logs {
            validate_daily_log(log)?;
        }
        let effective = match self.db.get_goals()? {
            Some(existing) => existing,
            None => self.set_goals(goals)?,
        };
        let count = self.db.replace_all_logs(logs)?;
        log::info!("loaded {count} demo log(s)");
        Ok(effective)
    }
}
