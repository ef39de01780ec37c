use super::{FormError, FormResult};
use domain::Habit;

pub const GOAL_REACHED: &str = "Goal reached! Congratulations";
pub const PROGRESS_UPDATED: &str = "Progress updated";

#[derive(Debug, Clone, Default)]
pub struct HabitForm {
    pub name: String,
    pub goal: String,
}

impl HabitForm {
    pub fn to_habit(&self) -> FormResult<Habit> {
        if self.name.trim().is_empty() || self.goal.trim().is_empty() {
            return Err(FormError::new("Please fill in all fields"));
        }
        let goal = self
            .goal
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|goal| *goal > 0)
            .ok_or_else(|| FormError::new("Goal must be a positive whole number"))?;

        Ok(Habit::new(self.name.trim(), goal))
    }
}

/// Счётчики карточек вкладки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HabitCounts {
    pub total: usize,
    pub active: usize,
    pub goal_reached: usize,
}

impl HabitCounts {
    pub fn from_habits(habits: &[Habit]) -> Self {
        let goal_reached = habits.iter().filter(|h| h.is_goal_reached()).count();
        Self {
            total: habits.len(),
            active: habits.len() - goal_reached,
            goal_reached,
        }
    }
}

/// Следующее значение прогресса (+1) и сообщение для пользователя.
/// Привычку с достигнутой целью продвигать нельзя.
pub fn bump(habit: &Habit) -> FormResult<(u64, &'static str)> {
    if habit.is_goal_reached() {
        return Err(FormError::new(format!(
            "Goal already reached for {} ({}/{})",
            habit.name, habit.progress, habit.goal
        )));
    }
    let next = habit.progress.saturating_add(1);
    let message = if next >= habit.goal {
        GOAL_REACHED
    } else {
        PROGRESS_UPDATED
    };
    Ok((next, message))
}
