use crate::errors::{DomainError, DomainResult};
use crate::time::Time;
use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Привычка с дневной целью и серией достижений
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: EntityId,
    pub name: String,
    pub goal: u64,
    pub progress: u64,
    pub streak: u64,
    pub last_updated: Time,
}

impl Habit {
    pub fn new(name: impl Into<String>, goal: u64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            goal,
            progress: 0,
            streak: 0,
            last_updated: 0,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyField("Name"));
        }
        if self.goal == 0 {
            return Err(DomainError::InvalidGoal(self.goal));
        }
        Ok(())
    }

    pub fn is_goal_reached(&self) -> bool {
        self.progress >= self.goal
    }

    /// Записать прогресс; серия растёт только при пересечении цели
    pub fn record_progress(&mut self, progress: u64, now: Time) {
        let was_reached = self.is_goal_reached();
        self.progress = progress;
        self.last_updated = now;
        if !was_reached && self.is_goal_reached() {
            self.streak += 1;
        }
    }

    /// Процент выполнения цели, не больше 100
    pub fn completion_percent(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        (self.progress as f64 / self.goal as f64 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_increments_once_per_crossing() {
        let mut habit = Habit::new("Water", 3);
        habit.record_progress(1, 10);
        habit.record_progress(2, 20);
        assert_eq!(habit.streak, 0);

        habit.record_progress(3, 30);
        assert_eq!(habit.streak, 1);
        assert!(habit.is_goal_reached());

        // Прогресс сверх цели не увеличивает серию повторно
        habit.record_progress(4, 40);
        assert_eq!(habit.streak, 1);
        assert_eq!(habit.last_updated, 40);
    }

    #[test]
    fn test_validation() {
        assert!(Habit::new("", 1).validate().is_err());
        assert_eq!(
            Habit::new("Read", 0).validate(),
            Err(DomainError::InvalidGoal(0))
        );
        assert!(Habit::new("Read", 1).validate().is_ok());
    }

    #[test]
    fn test_completion_percent_capped() {
        let mut habit = Habit::new("Steps", 2);
        habit.record_progress(5, 1);
        assert_eq!(habit.completion_percent(), 100.0);
    }
}
