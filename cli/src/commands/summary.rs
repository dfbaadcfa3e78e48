use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use dolevtrack_core::dashboard::Dashboard;
use dolevtrack_core::day::{format_day_id, today};
use dolevtrack_core::models::Nutrient;
use dolevtrack_core::service::TrackerService;
use dolevtrack_core::weight::WeightTrend;

use super::helpers::{fmt_amount, no_neg_zero, print_log_table, progress_bar};

pub(crate) fn cmd_history(svc: &TrackerService, limit: Option<usize>, json: bool) -> Result<()> {
    let logs = svc.history(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }

    if logs.is_empty() {
        eprintln!("No logs yet. Use `dolevtrack log` to record a day.");
        process::exit(2);
    }

    let goals = svc.goals()?;
    print_log_table(&logs, goals.as_ref());
    if goals.is_some() {
        println!("✓ on goal  ~ close  ✗ off goal  ★ perfect day");
    }

    Ok(())
}

pub(crate) fn cmd_stats(svc: &TrackerService, json: bool) -> Result<()> {
    let dashboard = svc.dashboard(today())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    print_weekly_balance(&dashboard);
    let week_logs = svc.logs_between(dashboard.week.start, dashboard.week.end)?;
    if !week_logs.is_empty() {
        println!();
        print_log_table(&week_logs, dashboard.goals.as_ref());
    }
    println!();
    print_weight(&dashboard);
    println!();
    println!(
        "  Streaks: protein {} day(s), calories {} day(s)",
        dashboard.streaks.protein, dashboard.streaks.calories
    );
    println!("  Logged days: {}", dashboard.log_count);

    Ok(())
}

fn print_weekly_balance(dashboard: &Dashboard) {
    #[derive(Tabled)]
    struct BalanceRow {
        #[tabled(rename = "Nutrient")]
        nutrient: String,
        #[tabled(rename = "Eaten")]
        current: String,
        #[tabled(rename = "Weekly goal")]
        total: String,
        #[tabled(rename = "Left")]
        remaining: String,
        #[tabled(rename = "Progress")]
        progress: String,
    }

    println!("=== Week {} ===\n", dashboard.week);

    let Some(balance) = &dashboard.weekly_balance else {
        println!("  No goals set. Use `dolevtrack goals set` to track weekly balance.");
        return;
    };

    let rows: Vec<BalanceRow> = Nutrient::ALL
        .iter()
        .map(|&n| {
            let b = balance.get(n);
            let unit = if n == Nutrient::Calories { "" } else { "g" };
            BalanceRow {
                nutrient: n.label().to_string(),
                current: format!("{}{unit}", fmt_amount(b.current.round())),
                total: format!("{}{unit}", fmt_amount(b.total.round())),
                remaining: format!("{}{unit}", fmt_amount(no_neg_zero(b.remaining().round()))),
                progress: format!("{} {:>3}%", progress_bar(b.percent, 20), b.percent),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    let calories = &balance.calories;
    if calories.is_over_budget() {
        println!(
            "  Over the weekly calorie budget by {} kcal ({}%)",
            fmt_amount((calories.balance.current - calories.balance.total).round()),
            calories.raw_percent
        );
    }
}

fn print_weight(dashboard: &Dashboard) {
    let w = &dashboard.weight;
    let avg = |v: f64| {
        if v > 0.0 {
            format!("{v:.1} kg")
        } else {
            "no data".to_string()
        }
    };
    println!("  Weight this week: {}", avg(w.current_avg));
    println!("  Weight last week: {}", avg(w.last_avg));
    match w.trend() {
        Some(WeightTrend::Down) => println!("  Change: ↓ {:.1} kg", w.diff.abs()),
        Some(WeightTrend::Up) => println!("  Change: ↑ {:.1} kg", w.diff),
        Some(WeightTrend::Flat) => println!("  Change: no change"),
        None => {}
    }

    if !dashboard.recent_weights.is_empty() {
        println!("  Recent weigh-ins:");
        for p in &dashboard.recent_weights {
            println!("    {}  {:.1} kg", format_day_id(p.date), p.weight);
        }
    }
}
