use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, params};

use crate::day::{DAY_FORMAT, format_day_id};
use crate::models::{DailyLog, UserGoals};

pub struct Database {
    conn: Connection,
}

const LOG_COLUMNS: &str = "date, weight, protein, carbs, fat, calories";

const UPSERT_LOG_SQL: &str =
    "INSERT INTO daily_logs (date, weight, protein, carbs, fat, calories, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
     ON CONFLICT(date) DO UPDATE SET
        weight = excluded.weight,
        protein = excluded.protein,
        carbs = excluded.carbs,
        fat = excluded.fat,
        calories = excluded.calories,
        updated_at = excluded.updated_at";

const UPSERT_GOALS_SQL: &str =
    "INSERT INTO user_goals (id, calories, protein, carbs, fat, updated_at)
     VALUES (1, ?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(id) DO UPDATE SET
        calories = excluded.calories,
        protein = excluded.protein,
        carbs = excluded.carbs,
        fat = excluded.fat,
        updated_at = excluded.updated_at";

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            log::debug!("migrating database schema to version 1");
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS daily_logs (
                    date TEXT PRIMARY KEY,
                    weight REAL NOT NULL DEFAULT 0,
                    protein REAL NOT NULL,
                    carbs REAL NOT NULL,
                    fat REAL NOT NULL,
                    calories REAL NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS user_goals (
                    id INTEGER PRIMARY KEY CHECK (id = 1),
                    calories REAL NOT NULL,
                    protein REAL NOT NULL,
                    carbs REAL NOT NULL,
                    fat REAL NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    fn daily_log_from_row(row: &rusqlite::Row) -> rusqlite::Result<DailyLog> {
        let date_str: String = row.get(0)?;
        let date = NaiveDate::parse_from_str(&date_str, DAY_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
        Ok(DailyLog {
            date,
            weight: row.get(1)?,
            protein: row.get(2)?,
            carbs: row.get(3)?,
            fat: row.get(4)?,
            calories: row.get(5)?,
        })
    }

    // --- Daily logs ---

    /// Insert or replace the log for `log.date`. Returns the entry it replaced, if any.
    pub fn upsert_log(&self, log: &DailyLog) -> Result<Option<DailyLog>> {
        let previous = self.get_log(log.date)?;
        log::debug!(
            "{} log for {}",
            if previous.is_some() { "replacing" } else { "inserting" },
            log.date
        );
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            UPSERT_LOG_SQL,
            params![
                format_day_id(log.date),
                log.weight,
                log.protein,
                log.carbs,
                log.fat,
                log.calories,
                now
            ],
        )?;
        Ok(previous)
    }

    pub fn get_log(&self, date: NaiveDate) -> Result<Option<DailyLog>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LOG_COLUMNS} FROM daily_logs WHERE date = ?1"))?;
        let mut rows = stmt.query(params![format_day_id(date)])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::daily_log_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Logs newest first, optionally limited to the `limit` most recent.
    pub fn list_logs(&self, limit: Option<usize>) -> Result<Vec<DailyLog>> {
        let query = match limit {
            Some(n) => format!("SELECT {LOG_COLUMNS} FROM daily_logs ORDER BY date DESC LIMIT {n}"),
            None => format!("SELECT {LOG_COLUMNS} FROM daily_logs ORDER BY date DESC"),
        };
        let mut stmt = self.conn.prepare(&query)?;
        let logs = stmt
            .query_map([], Self::daily_log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Logs with `start <= date <= end`, oldest first.
    pub fn logs_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LOG_COLUMNS} FROM daily_logs WHERE date >= ?1 AND date <= ?2 ORDER BY date"
        ))?;
        let logs = stmt
            .query_map(
                params![format_day_id(start), format_day_id(end)],
                Self::daily_log_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    pub fn delete_log(&self, date: NaiveDate) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM daily_logs WHERE date = ?1",
            params![format_day_id(date)],
        )?;
        Ok(rows > 0)
    }

    /// Replace every stored log with `logs` in one transaction.
    pub fn replace_all_logs(&self, logs: &[DailyLog]) -> Result<usize> {
        log::debug!("replacing all logs with {} new row(s)", logs.len());
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM daily_logs", [])?;
        let now = Local::now().to_rfc3339();
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO daily_logs
                    (date, weight, protein, carbs, fat, calories, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            )?;
            for log in logs {
                stmt.execute(params![
                    format_day_id(log.date),
                    log.weight,
                    log.protein,
                    log.carbs,
                    log.fat,
                    log.calories,
                    now
                ])?;
            }
        }
        tx.commit()?;
        self.count_logs()
    }

    pub fn count_logs(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM daily_logs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // --- Goals ---

    pub fn set_goals(&self, goals: &UserGoals) -> Result<UserGoals> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            UPSERT_GOALS_SQL,
            params![goals.calories, goals.protein, goals.carbs, goals.fat, now],
        )?;
        Ok(*goals)
    }

    /// Upsert `goals` (when given) and every log in one transaction. Nothing is
    /// written if any row fails.
    pub fn merge_records(&self, goals: Option<&UserGoals>, logs: &[DailyLog]) -> Result<usize> {
        log::debug!("merging {} log(s), goals: {}", logs.len(), goals.is_some());
        let tx = self.conn.unchecked_transaction()?;
        let now = Local::now().to_rfc3339();
        if let Some(g) = goals {
            tx.execute(
                UPSERT_GOALS_SQL,
                params![g.calories, g.protein, g.carbs, g.fat, now],
            )?;
        }
        {
            let mut stmt = tx.prepare(UPSERT_LOG_SQL)?;
            for log in logs {
                stmt.execute(params![
                    format_day_id(log.date),
                    log.weight,
                    log.protein,
                    log.carbs,
                    log.fat,
                    log.calories,
                    now
                ])
                .with_context(|| format!("Failed to write log for {}", log.date))?;
            }
        }
        tx.commit()?;
        Ok(logs.len())
    }

    pub fn get_goals(&self) -> Result<Option<UserGoals>> {
        let mut stmt = self
            .conn
            .prepare("SELECT calories, protein, carbs, fat FROM user_goals WHERE id = 1")?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            Ok(Some(UserGoals {
                calories: row.get(0)?,
                protein: row.get(1)?,
                carbs: row.get(2)?,
                fat: row.get(3)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn clear_goals(&self) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM user_goals", [])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_log(date: NaiveDate) -> DailyLog {
        DailyLog {
            date,
            weight: 82.4,
            protein: 160.0,
            carbs: 190.0,
            fat: 55.0,
            calories: 1900.0,
        }
    }

    #[test]
    fn test_upsert_and_get_log() {
        let db = Database::open_in_memory().unwrap();
        let log = sample_log(day(2024, 6, 10));
        let previous = db.upsert_log(&log).unwrap();
        assert!(previous.is_none());

        let fetched = db.get_log(log.date).unwrap().unwrap();
        assert_eq!(fetched, log);
        assert!(db.get_log(day(2024, 6, 11)).unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let db = Database::open_in_memory().unwrap();
        let first = sample_log(day(2024, 6, 10));
        db.upsert_log(&first).unwrap();

        let mut second = first.clone();
        second.calories = 2300.0;
        let previous = db.upsert_log(&second).unwrap();

        assert_eq!(previous, Some(first));
        assert_eq!(db.count_logs().unwrap(), 1);
        let fetched = db.get_log(second.date).unwrap().unwrap();
        assert_eq!(fetched.calories, 2300.0);
    }

    #[test]
    fn test_list_logs_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for d in [5, 1, 9, 3] {
            db.upsert_log(&sample_log(day(2024, 6, d))).unwrap();
        }
        let logs = db.list_logs(None).unwrap();
        let dates: Vec<_> = logs.iter().map(|l| l.date).collect();
        assert_eq!(
            dates,
            vec![day(2024, 6, 9), day(2024, 6, 5), day(2024, 6, 3), day(2024, 6, 1)]
        );

        let recent = db.list_logs(Some(2)).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, day(2024, 6, 9));
    }

    #[test]
    fn test_logs_between_inclusive() {
        let db = Database::open_in_memory().unwrap();
        for d in 1..=10 {
            db.upsert_log(&sample_log(day(2024, 6, d))).unwrap();
        }
        let logs = db.logs_between(day(2024, 6, 3), day(2024, 6, 5)).unwrap();
        let dates: Vec<_> = logs.iter().map(|l| l.date).collect();
        assert_eq!(dates, vec![day(2024, 6, 3), day(2024, 6, 4), day(2024, 6, 5)]);
    }

    #[test]
    fn test_delete_log() {
        let db = Database::open_in_memory().unwrap();
        let log = sample_log(day(2024, 6, 10));
        db.upsert_log(&log).unwrap();
        assert!(db.delete_log(log.date).unwrap());
        assert!(!db.delete_log(log.date).unwrap());
        assert_eq!(db.count_logs().unwrap(), 0);
    }

    #[test]
    fn test_replace_all_logs() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_log(&sample_log(day(2023, 1, 1))).unwrap();

        let fresh = vec![sample_log(day(2024, 6, 1)), sample_log(day(2024, 6, 2))];
        let count = db.replace_all_logs(&fresh).unwrap();
        assert_eq!(count, 2);
        assert!(db.get_log(day(2023, 1, 1)).unwrap().is_none());
    }

    #[test]
    fn test_goals_set_get_clear() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_goals().unwrap().is_none());

        db.set_goals(&UserGoals::default()).unwrap();
        assert_eq!(db.get_goals().unwrap(), Some(UserGoals::default()));

        let updated = UserGoals {
            calories: 1800.0,
            ..UserGoals::default()
        };
        db.set_goals(&updated).unwrap();
        assert_eq!(db.get_goals().unwrap(), Some(updated));

        assert!(db.clear_goals().unwrap());
        assert!(!db.clear_goals().unwrap());
        assert!(db.get_goals().unwrap().is_none());
    }

    #[test]
    fn test_merge_records_upserts_goals_and_logs() {
        let db = Database::open_in_memory().unwrap();
        let mut existing = sample_log(day(2024, 6, 1));
        db.upsert_log(&existing).unwrap();

        existing.calories = 2222.0;
        let logs = vec![existing.clone(), sample_log(day(2024, 6, 2))];
        let goals = UserGoals::default();
        assert_eq!(db.merge_records(Some(&goals), &logs).unwrap(), 2);

        assert_eq!(db.count_logs().unwrap(), 2);
        assert_eq!(db.get_log(day(2024, 6, 1)).unwrap(), Some(existing));
        assert_eq!(db.get_goals().unwrap(), Some(goals));
    }

    #[test]
    fn test_merge_records_rolls_back_on_failure() {
        let db = Database::open_in_memory().unwrap();
        // NaN binds as NULL and trips the NOT NULL constraint
        let mut broken = sample_log(day(2024, 6, 2));
        broken.calories = f64::NAN;
        let logs = vec![sample_log(day(2024, 6, 1)), broken];

        assert!(db.merge_records(Some(&UserGoals::default()), &logs).is_err());
        assert_eq!(db.count_logs().unwrap(), 0);
        assert!(db.get_goals().unwrap().is_none());
    }

    #[test]
    fn test_open_file_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        {
            let db = Database::open(&path).unwrap();
            db.upsert_log(&sample_log(day(2024, 6, 10))).unwrap();
            db.set_goals(&UserGoals::default()).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_logs().unwrap(), 1);
        assert!(db.get_goals().unwrap().is_some());
    }
}
