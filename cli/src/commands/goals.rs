use anyhow::Result;

use dolevtrack_core::models::UserGoals;
use dolevtrack_core::service::TrackerService;

use super::helpers::fmt_amount;

fn print_goals(goals: &UserGoals) {
    println!(
        "Daily goals: {} kcal | Protein: {}g  Carbs: {}g  Fat: {}g",
        fmt_amount(goals.calories),
        fmt_amount(goals.protein),
        fmt_amount(goals.carbs),
        fmt_amount(goals.fat)
    );
}

/// Unspecified values keep the current goal, or the default when none is set.
fn merge_goals(
    base: &UserGoals,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
) -> UserGoals {
    UserGoals {
        calories: calories.unwrap_or(base.calories),
        protein: protein.unwrap_or(base.protein),
        carbs: carbs.unwrap_or(base.carbs),
        fat: fat.unwrap_or(base.fat),
    }
}

pub(crate) fn cmd_goals_set(
    svc: &TrackerService,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    json: bool,
) -> Result<()> {
    let base = svc.goals_or_default()?;
    let goals = svc.set_goals(&merge_goals(&base, calories, protein, carbs, fat))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&goals)?);
    } else {
        print_goals(&goals);
    }

    Ok(())
}

pub(crate) fn cmd_goals_show(svc: &TrackerService, json: bool) -> Result<()> {
    let goals = svc.goals()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&goals)?);
    } else if let Some(goals) = goals {
        print_goals(&goals);
    } else {
        eprintln!("No goals set. Use `dolevtrack goals set` to set them.");
    }

    Ok(())
}

pub(crate) fn cmd_goals_clear(svc: &TrackerService, json: bool) -> Result<()> {
    let cleared = svc.clear_goals()?;

    if json {
        println!("{}", serde_json::json!({ "cleared": cleared }));
    } else if cleared {
        println!("Goals cleared");
    } else {
        eprintln!("No goals were set");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_goals_partial() {
        let base = UserGoals::default();
        let g = merge_goals(&base, Some(1800.0), None, None, Some(70.0));
        assert_eq!(g.calories, 1800.0);
        assert_eq!(g.protein, 150.0);
        assert_eq!(g.carbs, 200.0);
        assert_eq!(g.fat, 70.0);
    }

    #[test]
    fn test_merge_goals_none_keeps_base() {
        let base = UserGoals {
            calories: 2500.0,
            protein: 180.0,
            carbs: 250.0,
            fat: 80.0,
        };
        assert_eq!(merge_goals(&base, None, None, None, None), base);
    }
}
