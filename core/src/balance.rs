use chrono::NaiveDate;
use serde::Serialize;

use crate::day::{DayWindow, week_window};
use crate::models::{DailyLog, Nutrient, UserGoals};

pub const DAYS_PER_WEEK: f64 = 7.0;

/// Consumption against a weekly target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientBalance {
    pub current: f64,
    pub total: f64,
    /// Rounded share of `total`, clamped to 0..=100.
    pub percent: u32,
}

impl NutrientBalance {
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.total - self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalorieBalance {
    #[serde(flatten)]
    pub balance: NutrientBalance,
    /// Rounded share of the weekly budget without the upper clamp.
    pub raw_percent: i64,
}

impl CalorieBalance {
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.raw_percent > 100
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyBalance {
    pub window: DayWindow,
    pub calories: CalorieBalance,
    pub protein: NutrientBalance,
    pub carbs: NutrientBalance,
    pub fat: NutrientBalance,
}

impl WeeklyBalance {
    #[must_use]
    pub fn get(&self, nutrient: Nutrient) -> &NutrientBalance {
        match nutrient {
            Nutrient::Calories => &self.calories.balance,
            Nutrient::Protein => &self.protein,
            Nutrient::Carbs => &self.carbs,
            Nutrient::Fat => &self.fat,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
}

impl Totals {
    fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
        }
    }
}

fn sum_window(logs: &[DailyLog], window: DayWindow) -> Totals {
    logs.iter()
        .filter(|l| window.contains(l.date))
        .fold(Totals::default(), |mut t, l| {
            t.calories += l.calories;
            t.protein += l.protein;
            t.carbs += l.carbs;
            t.fat += l.fat;
            t
        })
}

/// `round(current / total * 100)`, or 0 when there is no positive target.
#[allow(clippy::cast_possible_truncation)]
fn rounded_percent(current: f64, total: f64) -> i64 {
    if total > 0.0 && total.is_finite() {
        (current / total * 100.0).round() as i64
    } else {
        0
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn balance(current: f64, daily_goal: f64) -> NutrientBalance {
    let total = daily_goal * DAYS_PER_WEEK;
    NutrientBalance {
        current,
        total,
        percent: rounded_percent(current, total).clamp(0, 100) as u32,
    }
}

/// Sunday-to-Saturday consumption against seven times each daily goal.
/// Returns `None` when no goals are set.
#[must_use]
pub fn weekly_nutrition_balance(
    logs: &[DailyLog],
    goals: Option<&UserGoals>,
    today: NaiveDate,
) -> Option<WeeklyBalance> {
    let goals = goals?;
    let window = week_window(today);
    let totals = sum_window(logs, window);
    let of = |n: Nutrient| balance(totals.get(n), goals.get(n));

    let calories = of(Nutrient::Calories);
    Some(WeeklyBalance {
        window,
        calories: CalorieBalance {
            raw_percent: rounded_percent(calories.current, calories.total),
            balance: calories,
        },
        protein: of(Nutrient::Protein),
        carbs: of(Nutrient::Carbs),
        fat: of(Nutrient::Fat),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn log(date: NaiveDate, calories: f64, protein: f64) -> DailyLog {
        DailyLog {
            date,
            weight: 0.0,
            protein,
            carbs: 100.0,
            fat: 30.0,
            calories,
        }
    }

    // 2024-06-12 is a Wednesday; its week runs 06-09 through 06-15
    fn wednesday() -> NaiveDate {
        day(2024, 6, 12)
    }

    #[test]
    fn test_no_logs() {
        let goals = UserGoals::default();
        let b = weekly_nutrition_balance(&[], Some(&goals), wednesday()).unwrap();
        assert!(b.calories.balance.current.abs() < f64::EPSILON);
        assert!((b.calories.balance.total - 14000.0).abs() < f64::EPSILON);
        assert_eq!(b.calories.balance.percent, 0);
        assert_eq!(b.calories.raw_percent, 0);
        assert!((b.protein.total - 1050.0).abs() < f64::EPSILON);
        assert!((b.carbs.total - 1400.0).abs() < f64::EPSILON);
        assert!((b.fat.total - 420.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_goals() {
        let logs = vec![log(wednesday(), 1900.0, 160.0)];
        assert!(weekly_nutrition_balance(&logs, None, wednesday()).is_none());
    }

    #[test]
    fn test_sums_only_current_week() {
        let goals = UserGoals::default();
        let logs = vec![
            log(day(2024, 6, 8), 5000.0, 500.0), // previous Saturday
            log(day(2024, 6, 9), 2000.0, 150.0), // Sunday
            log(day(2024, 6, 15), 1500.0, 100.0), // Saturday
            log(day(2024, 6, 16), 5000.0, 500.0), // next Sunday
        ];
        let b = weekly_nutrition_balance(&logs, Some(&goals), wednesday()).unwrap();
        assert!((b.calories.balance.current - 3500.0).abs() < f64::EPSILON);
        assert!((b.protein.current - 250.0).abs() < f64::EPSILON);
        assert_eq!(b.calories.balance.percent, 25);
        assert_eq!(b.window.start, day(2024, 6, 9));
    }

    #[test]
    fn test_percent_rounds() {
        let goals = UserGoals::default();
        // 1050 / 1050 protein target
        let logs = vec![log(wednesday(), 1000.0, 1050.0)];
        let b = weekly_nutrition_balance(&logs, Some(&goals), wednesday()).unwrap();
        assert_eq!(b.protein.percent, 100);
        // 1000 / 14000 = 7.14%
        assert_eq!(b.calories.balance.percent, 7);
    }

    #[test]
    fn test_over_budget_clamps_percent_but_keeps_raw() {
        let goals = UserGoals::default();
        let logs = vec![
            log(day(2024, 6, 10), 8000.0, 1500.0),
            log(day(2024, 6, 11), 8000.0, 0.0),
        ];
        let b = weekly_nutrition_balance(&logs, Some(&goals), wednesday()).unwrap();
        assert_eq!(b.calories.balance.percent, 100);
        assert_eq!(b.calories.raw_percent, 114);
        assert!(b.calories.is_over_budget());
        assert_eq!(b.protein.percent, 100);
        assert!(b.calories.balance.remaining() < 0.0);
    }

    #[test]
    fn test_zero_goal_gives_zero_percent() {
        let goals = UserGoals {
            calories: 0.0,
            ..UserGoals::default()
        };
        let logs = vec![log(wednesday(), 1900.0, 160.0)];
        let b = weekly_nutrition_balance(&logs, Some(&goals), wednesday()).unwrap();
        assert_eq!(b.calories.balance.percent, 0);
        assert_eq!(b.calories.raw_percent, 0);
    }

    #[test]
    fn test_same_inputs_same_output() {
        let goals = UserGoals::default();
        let logs = vec![log(wednesday(), 1900.0, 160.0)];
        let a = weekly_nutrition_balance(&logs, Some(&goals), wednesday());
        let b = weekly_nutrition_balance(&logs, Some(&goals), wednesday());
        assert_eq!(a, b);
    }

    #[test]
    fn test_get_by_nutrient() {
        let goals = UserGoals::default();
        let b = weekly_nutrition_balance(&[], Some(&goals), wednesday()).unwrap();
        assert!((b.get(Nutrient::Calories).total - 14000.0).abs() < f64::EPSILON);
        assert!((b.get(Nutrient::Fat).total - 420.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_calorie_balance_serializes_flat() {
        let goals = UserGoals::default();
        let b = weekly_nutrition_balance(&[], Some(&goals), wednesday()).unwrap();
        let json = serde_json::to_value(b).unwrap();
        assert_eq!(json["calories"]["total"], 14000.0);
        assert_eq!(json["calories"]["raw_percent"], 0);
        assert_eq!(json["window"]["start"], "2024-06-09");
    }
}
