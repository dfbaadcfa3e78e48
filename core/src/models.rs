use std::fmt;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's record. At most one exists per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    /// Body weight in kg. 0 means not recorded that day.
    #[serde(default)]
    pub weight: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

impl DailyLog {
    #[must_use]
    pub fn has_weight(&self) -> bool {
        self.weight > 0.0
    }

    #[must_use]
    pub fn nutrient(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
        }
    }

    #[must_use]
    pub fn field(&self, field: LogField) -> f64 {
        match field {
            LogField::Weight => self.weight,
            LogField::Calories => self.calories,
            LogField::Protein => self.protein,
            LogField::Carbs => self.carbs,
            LogField::Fat => self.fat,
        }
    }

    /// Fields whose value differs from `previous`, in display order.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn changed_fields(&self, previous: &DailyLog) -> Vec<LogField> {
        LogField::ALL
            .iter()
            .copied()
            .filter(|f| self.field(*f) != previous.field(*f))
            .collect()
    }
}

/// Per-day targets. Weekly targets are these times seven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for UserGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fat: 60.0,
        }
    }
}

impl UserGoals {
    #[must_use]
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fat => self.fat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Nutrient {
    pub const ALL: [Nutrient; 4] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Protein => "protein",
            Nutrient::Carbs => "carbs",
            Nutrient::Fat => "fat",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::Protein => "Protein",
            Nutrient::Carbs => "Carbs",
            Nutrient::Fat => "Fat",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editable fields of a `DailyLog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogField {
    Weight,
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl LogField {
    pub const ALL: [LogField; 5] = [
        LogField::Weight,
        LogField::Calories,
        LogField::Protein,
        LogField::Carbs,
        LogField::Fat,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogField::Weight => "weight",
            LogField::Calories => "calories",
            LogField::Protein => "protein",
            LogField::Carbs => "carbs",
            LogField::Fat => "fat",
        }
    }
}

impl fmt::Display for LogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_daily_log(log: &DailyLog) -> Result<()> {
    for field in LogField::ALL {
        let value = log.field(field);
        if !value.is_finite() {
            bail!("{field} must be a finite number");
        }
        if value < 0.0 {
            bail!("{field} must not be negative");
        }
    }
    Ok(())
}

pub fn validate_goals(goals: &UserGoals) -> Result<()> {
    for nutrient in Nutrient::ALL {
        let value = goals.get(nutrient);
        if !value.is_finite() || value <= 0.0 {
            bail!("{nutrient} goal must be greater than 0");
        }
    }
    Ok(())
}

// --- Backup types ---

pub const BACKUP_VERSION: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub version: i64,
    pub exported_at: String,
    #[serde(default)]
    pub goals: Option<UserGoals>,
    #[serde(default)]
    pub logs: Vec<DailyLog>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestoreSummary {
    pub logs_restored: i64,
    pub logs_skipped: i64,
    pub goals_restored: bool,
}
