use serde::Serialize;

use crate::compliance::{meets_calorie_goal, meets_protein_goal};
use crate::day::days_apart;
use crate::models::{DailyLog, UserGoals};

/// Streak lengths that unlock a badge.
pub const MILESTONES: [u32; 6] = [1, 10, 30, 50, 70, 100];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakCounts {
    pub protein: u32,
    pub calories: u32,
}

impl StreakCounts {
    #[must_use]
    pub fn get(&self, kind: StreakKind) -> u32 {
        match kind {
            StreakKind::Protein => self.protein,
            StreakKind::Calories => self.calories,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    Protein,
    Calories,
}

impl StreakKind {
    pub const ALL: [StreakKind; 2] = [StreakKind::Protein, StreakKind::Calories];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StreakKind::Protein => "Protein",
            StreakKind::Calories => "Calories",
        }
    }
}

/// Consecutive qualifying days, counted back from the most recent log.
///
/// The most recent log must qualify or the streak is 0. Walking backwards, a log on
/// the same day as the last counted one is skipped, a log on the previous day extends
/// the streak only if it qualifies, and any larger gap ends the walk.
pub fn streak_length<F>(logs: &[DailyLog], meets: F) -> u32
where
    F: Fn(&DailyLog) -> bool,
{
    let mut sorted: Vec<&DailyLog> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let Some((&latest, rest)) = sorted.split_first() else {
        return 0;
    };
    if !meets(latest) {
        return 0;
    }

    let mut streak = 1;
    let mut anchor = latest.date;
    for &log in rest {
        match days_apart(anchor, log.date) {
            0 => {}
            1 if meets(log) => {
                streak += 1;
                anchor = log.date;
            }
            _ => break,
        }
    }
    streak
}

#[must_use]
pub fn streak_counts(logs: &[DailyLog], goals: Option<&UserGoals>) -> StreakCounts {
    let Some(goals) = goals else {
        return StreakCounts::default();
    };
    StreakCounts {
        protein: streak_length(logs, |l| meets_protein_goal(l, goals)),
        calories: streak_length(logs, |l| meets_calorie_goal(l, goals)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub kind: StreakKind,
    pub milestone: u32,
    pub unlocked: bool,
}

/// One badge per streak kind and milestone, in milestone order.
#[must_use]
pub fn badges(streaks: &StreakCounts) -> Vec<Badge> {
    StreakKind::ALL
        .iter()
        .flat_map(|&kind| {
            let streak = streaks.get(kind);
            MILESTONES.iter().map(move |&milestone| Badge {
                kind,
                milestone,
                unlocked: streak >= milestone,
            })
        })
        .collect()
}

/// Smallest milestone not yet reached, if any.
#[must_use]
pub fn next_milestone(streak: u32) -> Option<u32> {
    MILESTONES.iter().copied().find(|&m| m > streak)
}
