use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rand::Rng;

use dolevtrack_core::day::today;
use dolevtrack_core::models::{DailyLog, UserGoals};
use dolevtrack_core::service::TrackerService;

pub(crate) const DEMO_DAYS: i64 = 100;
const START_WEIGHT: f64 = 90.0;
const WEIGHT_LOSS: f64 = 10.0;

/// `days` consecutive logs ending on `last_day`: weight drifts down from 90 kg with
/// small noise, protein at or above goal, calories at or below goal.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn generate_demo_logs<R: Rng + ?Sized>(
    rng: &mut R,
    goals: &UserGoals,
    last_day: NaiveDate,
    days: i64,
) -> Vec<DailyLog> {
    (0..days)
        .rev()
        .map(|i| {
            let progress = (days - i) as f64 / days as f64;
            let weight = START_WEIGHT - WEIGHT_LOSS * progress + rng.random_range(-0.4..0.4);
            DailyLog {
                date: last_day - Duration::days(i),
                weight: (weight * 10.0).round() / 10.0,
                protein: (goals.protein + rng.random_range(0.0..20.0))
                    .floor()
                    .max(goals.protein),
                calories: (goals.calories - rng.random_range(0.0..100.0))
                    .floor()
                    .max(0.0),
                carbs: (goals.carbs + rng.random_range(-10.0..10.0)).floor().max(0.0),
                fat: (goals.fat + rng.random_range(-5.0..5.0)).floor().max(0.0),
            }
        })
        .collect()
}

pub(crate) fn cmd_demo(svc: &TrackerService, json: bool) -> Result<()> {
    let goals = svc.goals_or_default()?;
    let logs = generate_demo_logs(&mut rand::rng(), &goals, today(), DEMO_DAYS);
    let goals = svc.load_demo(&logs, &goals)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "logs": logs.len(), "goals": goals })
        );
    } else {
        println!("Loaded {} days of demo data (existing logs replaced)", logs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dolevtrack_core::streak::streak_counts;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn last_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    #[test]
    fn test_demo_logs_are_consecutive_and_end_on_last_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let logs = generate_demo_logs(&mut rng, &UserGoals::default(), last_day(), DEMO_DAYS);
        assert_eq!(logs.len(), 100);
        assert_eq!(logs.last().unwrap().date, last_day());
        assert_eq!(logs[0].date, last_day() - Duration::days(99));
        for pair in logs.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn test_demo_logs_meet_goals() {
        let mut rng = StdRng::seed_from_u64(42);
        let goals = UserGoals {
            protein: 150.5,
            ..UserGoals::default()
        };
        let logs = generate_demo_logs(&mut rng, &goals, last_day(), DEMO_DAYS);
        let streaks = streak_counts(&logs, Some(&goals));
        assert_eq!(streaks.protein, 100);
        assert_eq!(streaks.calories, 100);
    }

    #[test]
    fn test_demo_weight_trends_down() {
        let mut rng = StdRng::seed_from_u64(1);
        let logs = generate_demo_logs(&mut rng, &UserGoals::default(), last_day(), DEMO_DAYS);
        let first = logs.first().unwrap().weight;
        let last = logs.last().unwrap().weight;
        assert!(first > 89.0 && first < 90.5);
        assert!(last > 79.5 && last < 80.5);
        assert!(logs.iter().all(|l| l.has_weight()));
    }

    #[test]
    fn test_cmd_demo_replaces_logs() {
        let svc = TrackerService::new_in_memory().unwrap();
        cmd_demo(&svc, true).unwrap();
        assert_eq!(svc.history(None).unwrap().len(), 100);
        assert_eq!(svc.goals().unwrap(), Some(UserGoals::default()));
    }
}
