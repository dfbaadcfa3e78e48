use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use dolevtrack_core::day::today;
use dolevtrack_core::export::{csv_file_name, parse_backup};
use dolevtrack_core::service::TrackerService;

pub(crate) fn cmd_export_csv(
    svc: &TrackerService,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(csv_file_name(today())));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let rows = svc.export_csv(BufWriter::new(file))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "rows": rows })
        );
    } else {
        println!("Exported {rows} log(s) to {}", path.display());
    }
    Ok(())
}

/// Without `--output` the backup goes to stdout.
pub(crate) fn cmd_export_json(svc: &TrackerService, output: Option<PathBuf>) -> Result<()> {
    let backup = svc.backup()?;
    let text = serde_json::to_string_pretty(&backup)?;

    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            eprintln!(
                "Backed up {} log(s) to {}",
                backup.logs.len(),
                path.display()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub(crate) fn cmd_import_json(svc: &TrackerService, path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let backup = parse_backup(&text)?;
    let summary = svc.restore(&backup)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Import complete.\n");
        println!("  Logs restored: {}", summary.logs_restored);
        println!("  Logs skipped:  {}", summary.logs_skipped);
        println!(
            "  Goals:         {}",
            if summary.goals_restored { "restored" } else { "unchanged" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dolevtrack_core::models::{DailyLog, UserGoals};

    fn seeded() -> TrackerService {
        let svc = TrackerService::new_in_memory().unwrap();
        svc.set_goals(&UserGoals::default()).unwrap();
        svc.save_log(&DailyLog {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            weight: 80.0,
            protein: 160.0,
            carbs: 190.0,
            fat: 55.0,
            calories: 1900.0,
        })
        .unwrap();
        svc
    }

    #[test]
    fn test_export_csv_to_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        cmd_export_csv(&seeded(), Some(path.clone()), true).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Date,Weight (kg),Calories,Protein (g),Carbs (g),Fat (g)"));
        assert!(text.contains("2024-06-01,80,1900,160,190,55"));
    }

    #[test]
    fn test_export_then_import_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("backup.json");
        cmd_export_json(&seeded(), Some(path.clone())).unwrap();

        let fresh = TrackerService::new_in_memory().unwrap();
        cmd_import_json(&fresh, &path, true).unwrap();
        assert_eq!(fresh.history(None).unwrap().len(), 1);
        assert_eq!(fresh.goals().unwrap(), Some(UserGoals::default()));
    }

    #[test]
    fn test_import_missing_file() {
        let svc = TrackerService::new_in_memory().unwrap();
        assert!(cmd_import_json(&svc, Path::new("/nonexistent/backup.json"), false).is_err());
    }
}
