use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use dolevtrack_core::service::TrackerService;
use dolevtrack_core::streak::{StreakKind, badges, next_milestone};

pub(crate) fn cmd_badges(svc: &TrackerService, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct BadgeRow {
        #[tabled(rename = "Streak")]
        kind: &'static str,
        #[tabled(rename = "Days")]
        milestone: u32,
        #[tabled(rename = "Status")]
        status: &'static str,
    }

    let has_goals = svc.goals()?.is_some();
    let streaks = svc.streaks()?;
    let all = badges(&streaks);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "has_goals": has_goals,
                "streaks": streaks,
                "badges": all,
            })
        );
        return Ok(());
    }

    if !has_goals {
        eprintln!("No goals set. Use `dolevtrack goals set` before earning badges.");
    }

    let rows: Vec<BadgeRow> = all
        .iter()
        .map(|b| BadgeRow {
            kind: b.kind.label(),
            milestone: b.milestone,
            status: if b.unlocked { "🏆 unlocked" } else { "🔒 locked" },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    for kind in StreakKind::ALL {
        let streak = streaks.get(kind);
        match next_milestone(streak) {
            Some(next) => println!(
                "  {}: {streak} day(s), {} more to the {next}-day badge",
                kind.label(),
                next - streak
            ),
            None => println!("  {}: {streak} day(s), every badge unlocked", kind.label()),
        }
    }

    Ok(())
}
