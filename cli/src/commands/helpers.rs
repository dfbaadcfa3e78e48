use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use dolevtrack_core::compliance::{Compliance, classify_day};
use dolevtrack_core::day::{format_day_id, parse_day_id, today};
use dolevtrack_core::models::{DailyLog, UserGoals};

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(today()),
        Some(s) => match s.as_str() {
            "today" => Ok(today()),
            "yesterday" => Ok(today() - chrono::Duration::days(1)),
            "tomorrow" => Ok(today() + chrono::Duration::days(1)),
            _ => parse_day_id(&s).context("Dates can also be today, yesterday or tomorrow"),
        },
    }
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

/// Whole numbers without a decimal point, anything else to one decimal.
pub(crate) fn fmt_amount(v: f64) -> String {
    let v = no_neg_zero(v);
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

pub(crate) fn fmt_weight(kg: f64) -> String {
    if kg > 0.0 {
        format!("{kg:.1}")
    } else {
        "-".to_string()
    }
}

pub(crate) fn compliance_mark(c: Option<Compliance>) -> &'static str {
    match c {
        Some(Compliance::Good) => "✓",
        Some(Compliance::Warning) => "~",
        Some(Compliance::Bad) => "✗",
        None => "",
    }
}

pub(crate) fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Table of logs in the order given, with per-nutrient markers when goals are set.
pub(crate) fn print_log_table(logs: &[DailyLog], goals: Option<&UserGoals>) {
    #[derive(Tabled)]
    struct LogRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight")]
        weight: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "")]
        perfect: String,
    }

    let rows: Vec<LogRow> = logs
        .iter()
        .map(|l| {
            let c = classify_day(l, goals);
            let cell = |v: f64, unit: &str, mark: Option<Compliance>| {
                format!("{}{unit} {}", fmt_amount(v), compliance_mark(mark))
                    .trim_end()
                    .to_string()
            };
            LogRow {
                date: format_day_id(l.date),
                weight: fmt_weight(l.weight),
                calories: cell(l.calories, "", c.map(|c| c.calories)),
                protein: cell(l.protein, "g", c.map(|c| c.protein)),
                carbs: cell(l.carbs, "g", c.map(|c| c.carbs)),
                fat: cell(l.fat, "g", c.map(|c| c.fat)),
                perfect: if c.is_some_and(|c| c.perfect_day) {
                    "★".to_string()
                } else {
                    String::new()
                },
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
