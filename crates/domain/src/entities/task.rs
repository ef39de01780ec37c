//! Task Domain Entity - задачи To-Do списка
//!
//! Приоритет хранится числом (как в RPC-интерфейсе): 1 = High, 2 = Medium,
//! всё остальное считается Low.

use crate::errors::{DomainError, DomainResult};
use crate::time::Time;
use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Приоритет задачи
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskPriority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl TaskPriority {
    pub fn from_level(level: u64) -> Self {
        match level {
            1 => TaskPriority::High,
            2 => TaskPriority::Medium,
            _ => TaskPriority::Low,
        }
    }

    pub fn level(&self) -> u64 {
        *self as u64
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::High => write!(f, "High"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::Low => write!(f, "Low"),
        }
    }
}

/// Задача To-Do списка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: u64,
    pub is_complete: bool,
    pub timestamp: Time,
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        priority: TaskPriority,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            category: category.into(),
            priority: priority.level(),
            is_complete: false,
            timestamp: 0,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyField("Title"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::EmptyField("Category"));
        }
        Ok(())
    }

    pub fn priority(&self) -> TaskPriority {
        TaskPriority::from_level(self.priority)
    }

    pub fn priority_label(&self) -> String {
        self.priority().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_labels() {
        let mut task = Task::new("Ship", "", "Work", TaskPriority::High);
        assert_eq!(task.priority_label(), "High");
        task.priority = 2;
        assert_eq!(task.priority_label(), "Medium");
        task.priority = 3;
        assert_eq!(task.priority_label(), "Low");
        task.priority = 42;
        assert_eq!(task.priority_label(), "Low");
    }

    #[test]
    fn test_validation_requires_title_and_category() {
        assert!(Task::new("", "", "Work", TaskPriority::Low).validate().is_err());
        assert_eq!(
            Task::new("Ship", "", " ", TaskPriority::Low).validate(),
            Err(DomainError::EmptyField("Category"))
        );
    }
}
