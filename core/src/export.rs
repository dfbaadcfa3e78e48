use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::day::format_day_id;
use crate::models::{BACKUP_VERSION, Backup, DailyLog, UserGoals};

pub const CSV_HEADERS: [&str; 6] = [
    "Date",
    "Weight (kg)",
    "Calories",
    "Protein (g)",
    "Carbs (g)",
    "Fat (g)",
];

#[must_use]
pub fn csv_file_name(today: NaiveDate) -> String {
    format!("nutrition_logs_{}.csv", format_day_id(today))
}

/// Write `logs` as CSV, oldest first. Returns the number of data rows written.
pub fn write_csv<W: Write>(logs: &[DailyLog], writer: W) -> Result<usize> {
    let mut sorted: Vec<&DailyLog> = logs.iter().collect();
    sorted.sort_by_key(|l| l.date);

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for log in &sorted {
        wtr.write_record([
            format_day_id(log.date),
            log.weight.to_string(),
            log.calories.to_string(),
            log.protein.to_string(),
            log.carbs.to_string(),
            log.fat.to_string(),
        ])?;
    }
    wtr.flush().context("Failed to write CSV")?;
    Ok(sorted.len())
}

#[must_use]
pub fn build_backup(logs: &[DailyLog], goals: Option<UserGoals>, exported_at: String) -> Backup {
    let mut logs = logs.to_vec();
    logs.sort_by_key(|l| l.date);
    Backup {
        version: BACKUP_VERSION,
        exported_at,
        goals,
        logs,
    }
}

pub fn parse_backup(json: &str) -> Result<Backup> {
    let backup: Backup = serde_json::from_str(json).context("Invalid backup file")?;
    if backup.version > BACKUP_VERSION {
        bail!(
            "Backup version {} is newer than supported version {BACKUP_VERSION}",
            backup.version
        );
    }
    Ok(backup)
}
