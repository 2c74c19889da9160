use crate::domain::model::{Achievement, ACHIEVEMENTS};

pub fn is_unlocked(achievement: &Achievement, points: i64) -> bool {
    points >= achievement.requirement
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementProgress {
    pub points: i64,
    pub statuses: Vec<AchievementStatus>,
}

impl AchievementProgress {
    /// Evaluates the full catalog, keeping catalog order.
    pub fn evaluate(points: i64) -> Self {
        let statuses = ACHIEVEMENTS
            .iter()
            .map(|achievement| AchievementStatus {
                achievement: *achievement,
                completed: is_unlocked(achievement, points),
            })
            .collect();

        Self { points, statuses }
    }

    pub fn completed(&self) -> usize {
        self.statuses.iter().filter(|s| s.completed).count()
    }

    pub fn total(&self) -> usize {
        self.statuses.len()
    }
}
