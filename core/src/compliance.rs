use serde::Serialize;

use crate::models::{DailyLog, Nutrient, UserGoals};

/// Calories over goal still counted as acceptable.
pub const CALORIE_TOLERANCE: f64 = 150.0;
/// Carbs/fat grams over goal before a day turns bad.
pub const MACRO_TOLERANCE: f64 = 10.0;
/// Protein grams under goal before a day turns bad.
pub const PROTEIN_TOLERANCE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compliance {
    Good,
    Warning,
    Bad,
}

impl Compliance {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Compliance::Good => "good",
            Compliance::Warning => "warning",
            Compliance::Bad => "bad",
        }
    }
}

/// A value that should stay at or below its goal.
fn ceiling(value: f64, goal: f64, tolerance: f64) -> Compliance {
    if value <= goal {
        Compliance::Good
    } else if value <= goal + tolerance {
        Compliance::Warning
    } else {
        Compliance::Bad
    }
}

/// A value that should reach at least its goal.
fn floor(value: f64, goal: f64, tolerance: f64) -> Compliance {
    if value >= goal {
        Compliance::Good
    } else if value >= goal - tolerance {
        Compliance::Warning
    } else {
        Compliance::Bad
    }
}

/// Classify one day's value of `nutrient` against the daily goal.
/// Returns `None` when no goals are set.
#[must_use]
pub fn classify(nutrient: Nutrient, value: f64, goals: Option<&UserGoals>) -> Option<Compliance> {
    goals.map(|g| grade(nutrient, value, g))
}

fn grade(nutrient: Nutrient, value: f64, goals: &UserGoals) -> Compliance {
    let goal = goals.get(nutrient);
    match nutrient {
        Nutrient::Calories => ceiling(value, goal, CALORIE_TOLERANCE),
        Nutrient::Protein => floor(value, goal, PROTEIN_TOLERANCE),
        Nutrient::Carbs | Nutrient::Fat => ceiling(value, goal, MACRO_TOLERANCE),
    }
}

#[must_use]
pub fn meets_protein_goal(log: &DailyLog, goals: &UserGoals) -> bool {
    log.protein >= goals.protein
}

#[must_use]
pub fn meets_calorie_goal(log: &DailyLog, goals: &UserGoals) -> bool {
    log.calories <= goals.calories + CALORIE_TOLERANCE
}

/// Calories within tolerance and protein at or above goal.
#[must_use]
pub fn is_perfect_day(log: &DailyLog, goals: Option<&UserGoals>) -> bool {
    goals.is_some_and(|g| meets_calorie_goal(log, g) && meets_protein_goal(log, g))
}

/// Per-nutrient classification of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCompliance {
    pub calories: Compliance,
    pub protein: Compliance,
    pub carbs: Compliance,
    pub fat: Compliance,
    pub perfect_day: bool,
}

impl DayCompliance {
    #[must_use]
    pub fn get(&self, nutrient: Nutrient) -> Compliance {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
        }
    }
}

#[must_use]
pub fn classify_day(log: &DailyLog, goals: Option<&UserGoals>) -> Option<DayCompliance> {
    let g = goals?;
    let of = |n: Nutrient| grade(n, log.nutrient(n), g);
    Some(DayCompliance {
        calories: of(Nutrient::Calories),
        protein: of(Nutrient::Protein),
        carbs: of(Nutrient::Carbs),
        fat: of(Nutrient::Fat),
        perfect_day: is_perfect_day(log, Some(g)),
    })
}
