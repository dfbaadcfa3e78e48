use anyhow::{Result, bail};
use std::process;

use dolevtrack_core::compliance::{Compliance, classify_day};
use dolevtrack_core::day::format_day_id;
use dolevtrack_core::models::{DailyLog, Nutrient};
use dolevtrack_core::service::TrackerService;

use super::helpers::{compliance_mark, fmt_amount, fmt_weight, json_error, parse_date};

/// Values given on the command line. Missing ones fall back to the existing log.
pub(crate) struct LogInput {
    pub weight: Option<f64>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

fn merge_input(
    date: chrono::NaiveDate,
    input: &LogInput,
    existing: Option<&DailyLog>,
) -> Result<DailyLog> {
    let pick = |given: Option<f64>, nutrient: Nutrient| -> Result<f64> {
        match (given, existing) {
            (Some(v), _) => Ok(v),
            (None, Some(prev)) => Ok(prev.nutrient(nutrient)),
            (None, None) => bail!("--{nutrient} is required for a new log"),
        }
    };
    Ok(DailyLog {
        date,
        weight: input
            .weight
            .or_else(|| existing.map(|e| e.weight))
            .unwrap_or(0.0),
        calories: pick(input.calories, Nutrient::Calories)?,
        protein: pick(input.protein, Nutrient::Protein)?,
        carbs: pick(input.carbs, Nutrient::Carbs)?,
        fat: pick(input.fat, Nutrient::Fat)?,
    })
}

pub(crate) fn cmd_log(
    svc: &TrackerService,
    input: &LogInput,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let existing = svc.get_log(date)?;
    let log = merge_input(date, input, existing.as_ref())?;
    let saved = svc.save_log(&log)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
        return Ok(());
    }

    let day = format_day_id(saved.log.date);
    if saved.is_update() {
        if saved.changed.is_empty() {
            println!("Log for {day} unchanged");
        } else {
            let fields: Vec<&str> = saved.changed.iter().map(|f| f.as_str()).collect();
            println!("Updated log for {day} ({})", fields.join(", "));
        }
    } else {
        println!("Added log for {day}");
    }
    let l = &saved.log;
    let goals = svc.goals()?;
    let compliance = classify_day(l, goals.as_ref());
    let mark = |n: Nutrient| compliance_mark(compliance.map(|c| c.get(n)));
    println!(
        "  {} kcal {} | P:{}g {} C:{}g {} F:{}g {} | Weight: {}",
        fmt_amount(l.calories),
        mark(Nutrient::Calories),
        fmt_amount(l.protein),
        mark(Nutrient::Protein),
        fmt_amount(l.carbs),
        mark(Nutrient::Carbs),
        fmt_amount(l.fat),
        mark(Nutrient::Fat),
        fmt_weight(l.weight)
    );
    match compliance {
        Some(c) if c.perfect_day => println!("  ★ Perfect day"),
        Some(_) => {}
        None => eprintln!("No goals set. Use `dolevtrack goals set` to track progress."),
    }

    Ok(())
}

pub(crate) fn cmd_show(svc: &TrackerService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let day = format_day_id(date);

    let Some(review) = svc.classify_log(date)? else {
        if json {
            println!("{}", json_error(&format!("No log for {day}")));
        } else {
            eprintln!("No log for {day}");
        }
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&review)?);
        return Ok(());
    }

    let l = &review.log;
    println!("=== {day} ===\n");
    println!("  Weight:   {} kg", fmt_weight(l.weight));
    for n in Nutrient::ALL {
        let mark = review.compliance.map(|c| c.get(n));
        let status = mark.map(Compliance::as_str).unwrap_or_default();
        println!(
            "  {:<9} {:>7} {:<4} {} {status}",
            format!("{}:", n.label()),
            fmt_amount(l.nutrient(n)),
            n.unit(),
            compliance_mark(mark)
        );
    }
    match review.compliance {
        Some(c) if c.perfect_day => println!("\n  ★ Perfect day"),
        Some(_) => {}
        None => {
            println!("\n  No goals set. Use `dolevtrack goals set` to see how this day compares.");
        }
    }

    Ok(())
}

pub(crate) fn cmd_delete(svc: &TrackerService, date: &str, json: bool) -> Result<()> {
    let date = parse_date(Some(date.to_string()))?;
    let day = format_day_id(date);
    if svc.delete_log(date)? {
        if json {
            println!("{}", serde_json::json!({ "deleted": day }));
        } else {
            println!("Deleted log for {day}");
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("No log for {day}")));
        } else {
            eprintln!("No log for {day}");
        }
        process::exit(2);
    }
}
